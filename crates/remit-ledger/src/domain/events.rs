//! # Ledger Events
//!
//! Every successful state change publishes one event through the
//! `EventSink` port.

use super::value_objects::{Address, PaymentId, SecretField, U256};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// All events emitted by the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemittanceEvent {
    // =========================================================================
    // PAYMENT LIFECYCLE
    // =========================================================================
    /// Funds escrowed.
    Deposited {
        /// New payment.
        payment_id: PaymentId,
        /// Funding address.
        payer: Address,
        /// Address allowed to claim.
        intermediary: Address,
        /// Net amount held.
        amount: U256,
        /// Commission retained.
        commission: U256,
        /// Earliest refund time.
        expires: u64,
    },

    /// Funds released to the intermediary.
    Claimed {
        /// Resolved payment.
        payment_id: PaymentId,
        /// Recipient.
        intermediary: Address,
        /// Amount released.
        amount: U256,
    },

    /// Funds returned to the payer.
    Refunded {
        /// Resolved payment.
        payment_id: PaymentId,
        /// Recipient.
        payer: Address,
        /// Amount returned.
        amount: U256,
    },

    /// A stored password hash was replaced.
    PasswordChanged {
        /// Affected payment.
        payment_id: PaymentId,
        /// Which password.
        field: SecretField,
    },

    // =========================================================================
    // ADMINISTRATION
    // =========================================================================
    /// Commission updated.
    CommissionChanged {
        /// Previous value.
        previous: U256,
        /// New value.
        current: U256,
    },

    /// Maximum claim window updated.
    DeadlineDeltaChanged {
        /// Previous value in seconds.
        previous: u64,
        /// New value in seconds.
        current: u64,
    },

    /// Refund window updated.
    RefundWindowChanged {
        /// Previous value in seconds.
        previous: Option<u64>,
        /// New value in seconds.
        current: Option<u64>,
    },

    /// Deposits suspended.
    Paused {
        /// Owner that paused.
        by: Address,
    },

    /// Deposits re-enabled.
    Resumed {
        /// Owner that resumed.
        by: Address,
    },

    /// Contract permanently disabled.
    Killed {
        /// Owner that killed.
        by: Address,
    },
}

impl RemittanceEvent {
    /// Stable event name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Deposited { .. } => "deposited",
            Self::Claimed { .. } => "claimed",
            Self::Refunded { .. } => "refunded",
            Self::PasswordChanged { .. } => "password_changed",
            Self::CommissionChanged { .. } => "commission_changed",
            Self::DeadlineDeltaChanged { .. } => "deadline_delta_changed",
            Self::RefundWindowChanged { .. } => "refund_window_changed",
            Self::Paused { .. } => "paused",
            Self::Resumed { .. } => "resumed",
            Self::Killed { .. } => "killed",
        }
    }

    /// Payment the event refers to, if any.
    #[must_use]
    pub fn payment_id(&self) -> Option<PaymentId> {
        match self {
            Self::Deposited { payment_id, .. }
            | Self::Claimed { payment_id, .. }
            | Self::Refunded { payment_id, .. }
            | Self::PasswordChanged { payment_id, .. } => Some(*payment_id),
            _ => None,
        }
    }
}

/// Event plus delivery metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Correlates the event with the log lines of the operation.
    pub correlation_id: Uuid,
    /// Ledger time at emission.
    pub timestamp: u64,
    /// The event.
    pub event: RemittanceEvent,
}

impl EventEnvelope {
    /// Wrap an event.
    pub fn new(correlation_id: Uuid, timestamp: u64, event: RemittanceEvent) -> Self {
        Self {
            correlation_id,
            timestamp,
            event,
        }
    }
}
