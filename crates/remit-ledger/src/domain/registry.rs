//! # Configuration Registry
//!
//! Owner-mutable parameters consulted at deposit time. Changes apply to
//! subsequent deposits only: each payment captures its commission, expiry
//! and refund deadline when it is created.

use super::errors::RemittanceError;
use super::invariants::invariant_window_bound;
use super::value_objects::U256;
use serde::{Deserialize, Serialize};
use std::env;

/// Seconds in a day.
pub const DAY_SECS: u64 = 86_400;

/// Default flat commission per deposit.
pub const DEFAULT_COMMISSION: u64 = 10_000;

/// Default maximum claim window (30 days).
pub const DEFAULT_DEADLINE_DELTA_SECS: u64 = 30 * DAY_SECS;

/// Default refund window after expiry (30 days).
pub const DEFAULT_REFUND_WINDOW_SECS: u64 = 30 * DAY_SECS;

/// Construction-time ledger configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Flat commission retained on every deposit.
    pub commission: U256,
    /// Maximum claim window a deposit may request, in seconds.
    pub deadline_delta_secs: u64,
    /// Refund window after expiry, in seconds. `None` never lapses.
    pub refund_window_secs: Option<u64>,
    /// Start in the paused state.
    pub start_paused: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            commission: U256::from(DEFAULT_COMMISSION),
            deadline_delta_secs: DEFAULT_DEADLINE_DELTA_SECS,
            refund_window_secs: Some(DEFAULT_REFUND_WINDOW_SECS),
            start_paused: false,
        }
    }
}

impl LedgerConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `REMIT_COMMISSION`: Decimal commission (default: 10000)
    /// - `REMIT_DEADLINE_DELTA_SECS`: Maximum claim window (default: 30 days)
    /// - `REMIT_REFUND_WINDOW_SECS`: Refund window, or `none` (default: 30 days)
    /// - `REMIT_START_PAUSED`: Start paused (default: false)
    pub fn from_env() -> Result<Self, RemittanceError> {
        let defaults = Self::default();

        let commission = match env::var("REMIT_COMMISSION") {
            Ok(v) => U256::from_dec_str(v.trim())
                .map_err(|e| RemittanceError::InvalidConfig(format!("REMIT_COMMISSION: {e:?}")))?,
            Err(_) => defaults.commission,
        };

        let deadline_delta_secs = match env::var("REMIT_DEADLINE_DELTA_SECS") {
            Ok(v) => parse_secs("REMIT_DEADLINE_DELTA_SECS", &v)?,
            Err(_) => defaults.deadline_delta_secs,
        };

        let refund_window_secs = match env::var("REMIT_REFUND_WINDOW_SECS") {
            Ok(v) if v.trim().eq_ignore_ascii_case("none") => None,
            Ok(v) => Some(parse_secs("REMIT_REFUND_WINDOW_SECS", &v)?),
            Err(_) => defaults.refund_window_secs,
        };

        let start_paused = env::var("REMIT_START_PAUSED")
            .map(|v| remit_telemetry::parse_flag(&v))
            .unwrap_or(defaults.start_paused);

        let config = Self {
            commission,
            deadline_delta_secs,
            refund_window_secs,
            start_paused,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that would make every deposit fail.
    pub fn validate(&self) -> Result<(), RemittanceError> {
        if self.deadline_delta_secs == 0 {
            return Err(RemittanceError::InvalidConfig(
                "deadline delta must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_secs(name: &str, value: &str) -> Result<u64, RemittanceError> {
    value
        .trim()
        .parse()
        .map_err(|e| RemittanceError::InvalidConfig(format!("{name}: {e}")))
}

/// Window assigned to a new payment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaymentWindow {
    /// Earliest refund time.
    pub expires: u64,
    /// Last refund time, if bounded.
    pub refund_deadline: Option<u64>,
}

/// Live parameter set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    commission: U256,
    deadline_delta: u64,
    refund_window: Option<u64>,
}

impl Registry {
    /// Build from configuration.
    pub fn from_config(config: &LedgerConfig) -> Self {
        Self {
            commission: config.commission,
            deadline_delta: config.deadline_delta_secs,
            refund_window: config.refund_window_secs,
        }
    }

    /// Flat commission per deposit.
    pub fn commission(&self) -> U256 {
        self.commission
    }

    /// Maximum claim window in seconds.
    pub fn deadline_delta(&self) -> u64 {
        self.deadline_delta
    }

    /// Refund window after expiry in seconds.
    pub fn refund_window(&self) -> Option<u64> {
        self.refund_window
    }

    /// Replace the commission. Returns the previous value.
    pub fn set_commission(&mut self, commission: U256) -> U256 {
        std::mem::replace(&mut self.commission, commission)
    }

    /// Replace the maximum claim window. Returns the previous value.
    pub fn set_deadline_delta(&mut self, secs: u64) -> Result<u64, RemittanceError> {
        if secs == 0 {
            return Err(RemittanceError::InvalidConfig(
                "deadline delta must be positive".to_string(),
            ));
        }
        Ok(std::mem::replace(&mut self.deadline_delta, secs))
    }

    /// Replace the refund window. Returns the previous value.
    pub fn set_refund_window(&mut self, secs: Option<u64>) -> Option<u64> {
        std::mem::replace(&mut self.refund_window, secs)
    }

    /// Compute expiry and refund deadline for a deposit made at `now`.
    pub fn window_for(&self, now: u64, duration: u64) -> Result<PaymentWindow, RemittanceError> {
        invariant_window_bound(duration, self.deadline_delta)?;
        let expires = now.saturating_add(duration);
        Ok(PaymentWindow {
            expires,
            refund_deadline: self.refund_window.map(|w| expires.saturating_add(w)),
        })
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::from_config(&LedgerConfig::default())
    }
}
