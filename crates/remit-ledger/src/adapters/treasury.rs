//! Treasury Adapter
//!
//! Implements `Treasury` port with in-memory custody and balances.

use crate::domain::{Address, TransferError, U256};
use crate::ports::outbound::Treasury;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// In-memory value custody for testing.
///
/// Addresses start with a zero balance unless funded. Transfers to an
/// address on the reject list fail, which simulates a recipient that
/// refuses incoming value.
#[derive(Default)]
pub struct InMemoryTreasury {
    custody: RwLock<U256>,
    balances: RwLock<HashMap<Address, U256>>,
    rejecting: RwLock<HashSet<Address>>,
}

impl InMemoryTreasury {
    /// Create an empty treasury.
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit an external balance.
    pub fn fund(&self, account: Address, amount: U256) {
        let mut balances = self.balances.write();
        let balance = balances.entry(account).or_default();
        *balance = balance.saturating_add(amount);
    }

    /// Balance of an external account.
    pub fn balance_of(&self, account: &Address) -> U256 {
        self.balances.read().get(account).copied().unwrap_or_default()
    }

    /// Value currently held in escrow.
    pub fn custody(&self) -> U256 {
        *self.custody.read()
    }

    /// Make transfers to `recipient` fail.
    pub fn reject_transfers_to(&self, recipient: Address) {
        self.rejecting.write().insert(recipient);
    }

    /// Let transfers to `recipient` succeed again.
    pub fn accept_transfers_to(&self, recipient: &Address) {
        self.rejecting.write().remove(recipient);
    }
}

#[async_trait]
impl Treasury for InMemoryTreasury {
    async fn receive(&self, from: Address, amount: U256) -> Result<(), TransferError> {
        // Lock order: custody, then balances
        let mut custody = self.custody.write();
        let mut balances = self.balances.write();
        let balance = balances.entry(from).or_default();
        if *balance < amount {
            return Err(TransferError::InsufficientBalance {
                required: amount,
                available: *balance,
            });
        }

        *custody = custody
            .checked_add(amount)
            .ok_or(TransferError::Overflow)?;
        *balance -= amount;

        debug!("[remit] Custody received {} from {}", amount, from);
        Ok(())
    }

    async fn send(&self, recipient: Address, amount: U256) -> Result<(), TransferError> {
        if self.rejecting.read().contains(&recipient) {
            warn!("[remit] Transfer to {} rejected", recipient);
            return Err(TransferError::Rejected {
                recipient: format!("{recipient:?}"),
                reason: "recipient refuses value".to_string(),
            });
        }

        let mut custody = self.custody.write();
        if *custody < amount {
            return Err(TransferError::InsufficientCustody {
                required: amount,
                available: *custody,
            });
        }

        let mut balances = self.balances.write();
        let balance = balances.entry(recipient).or_default();
        *balance = balance.checked_add(amount).ok_or(TransferError::Overflow)?;
        *custody -= amount;

        debug!("[remit] Custody sent {} to {}", amount, recipient);
        Ok(())
    }
}
