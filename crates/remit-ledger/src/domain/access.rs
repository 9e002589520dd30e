//! # Access Control
//!
//! Single owner plus the global pause/kill switch.
//!
//! ```text
//! Active --pause--> Paused --kill--> Killed
//!        <-resume--
//! ```
//!
//! `Killed` is terminal and rejects every mutating operation.

use super::errors::RemittanceError;
use super::value_objects::Address;
use serde::{Deserialize, Serialize};

/// Global switch position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwitchState {
    /// Accepting deposits.
    #[default]
    Active,
    /// Deposits blocked; claims and refunds still served.
    Paused,
    /// Everything blocked, permanently.
    Killed,
}

impl SwitchState {
    /// Check if transition is valid.
    pub fn can_transition_to(&self, next: SwitchState) -> bool {
        matches!(
            (self, next),
            (Self::Active, Self::Paused) | (Self::Paused, Self::Active) | (Self::Paused, Self::Killed)
        )
    }
}

/// Owner identity and switch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControl {
    owner: Address,
    state: SwitchState,
}

impl AccessControl {
    /// Create with the given owner.
    pub fn new(owner: Address, start_paused: bool) -> Self {
        let state = if start_paused {
            SwitchState::Paused
        } else {
            SwitchState::Active
        };
        Self { owner, state }
    }

    /// Contract owner.
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Current switch position.
    pub fn state(&self) -> SwitchState {
        self.state
    }

    /// Killed counts as paused.
    pub fn is_paused(&self) -> bool {
        matches!(self.state, SwitchState::Paused | SwitchState::Killed)
    }

    /// Whether the contract has been killed.
    pub fn is_killed(&self) -> bool {
        self.state == SwitchState::Killed
    }

    /// Fail unless `caller` is the owner.
    pub fn require_owner(&self, caller: Address) -> Result<(), RemittanceError> {
        if caller != self.owner {
            return Err(RemittanceError::NotOwner);
        }
        Ok(())
    }

    /// Fail once killed.
    pub fn require_alive(&self) -> Result<(), RemittanceError> {
        if self.is_killed() {
            return Err(RemittanceError::ContractKilled);
        }
        Ok(())
    }

    /// Fail unless deposits are open.
    pub fn require_deposits_open(&self) -> Result<(), RemittanceError> {
        match self.state {
            SwitchState::Active => Ok(()),
            SwitchState::Paused => Err(RemittanceError::ContractPaused),
            SwitchState::Killed => Err(RemittanceError::ContractKilled),
        }
    }

    /// Owner gate followed by the liveness gate.
    pub fn require_admin(&self, caller: Address) -> Result<(), RemittanceError> {
        self.require_owner(caller)?;
        self.require_alive()
    }

    /// `Active -> Paused`.
    pub fn pause(&mut self, caller: Address) -> Result<(), RemittanceError> {
        self.require_admin(caller)?;
        if self.state == SwitchState::Paused {
            return Err(RemittanceError::ContractPaused);
        }
        self.transition_to(SwitchState::Paused)
    }

    /// `Paused -> Active`.
    pub fn resume(&mut self, caller: Address) -> Result<(), RemittanceError> {
        self.require_admin(caller)?;
        if self.state != SwitchState::Paused {
            return Err(RemittanceError::NotPaused);
        }
        self.transition_to(SwitchState::Active)
    }

    /// `Paused -> Killed`. Irreversible.
    pub fn kill(&mut self, caller: Address) -> Result<(), RemittanceError> {
        self.require_admin(caller)?;
        if self.state != SwitchState::Paused {
            return Err(RemittanceError::NotPaused);
        }
        self.transition_to(SwitchState::Killed)
    }

    fn transition_to(&mut self, next: SwitchState) -> Result<(), RemittanceError> {
        debug_assert!(self.state.can_transition_to(next));
        self.state = next;
        Ok(())
    }
}
