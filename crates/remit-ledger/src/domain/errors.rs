//! # Domain Errors
//!
//! Every rejected operation maps to exactly one variant with a stable
//! reason code. Rejections never leave partial state behind.

use super::value_objects::{PaymentId, SecretField, U256};
use thiserror::Error;

/// Coarse error category for client-side branching.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Wrong owner, payer or intermediary.
    Authorization,
    /// Operation invalid for the current payment or contract status.
    State,
    /// Outside the permitted time window.
    Timing,
    /// Value or identifier rejected.
    Value,
    /// Password hash mismatch.
    Secret,
    /// Store or treasury failure.
    Infrastructure,
}

/// Failure reported by the treasury port.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TransferError {
    /// Recipient refused the value.
    #[error("Transfer to {recipient} rejected: {reason}")]
    Rejected {
        /// Recipient address (hex).
        recipient: String,
        /// Reason given by the treasury.
        reason: String,
    },

    /// Custody does not hold enough value.
    #[error("Insufficient custody: required {required}, available {available}")]
    InsufficientCustody {
        /// Amount requested.
        required: U256,
        /// Amount held.
        available: U256,
    },

    /// Sender cannot cover the amount.
    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance {
        /// Amount requested.
        required: U256,
        /// Sender balance.
        available: U256,
    },

    /// Balance arithmetic overflowed.
    #[error("Balance overflow")]
    Overflow,
}

/// Failure reported by the payment store port.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Insert collided with an existing record.
    #[error("Record already exists: {0}")]
    AlreadyExists(PaymentId),

    /// Update targeted a missing record.
    #[error("Record missing: {0}")]
    Missing(PaymentId),

    /// Backend failure.
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Errors returned by ledger operations.
#[derive(Debug, Error)]
pub enum RemittanceError {
    /// Caller is not the contract owner.
    #[error("Caller is not the owner")]
    NotOwner,

    /// Caller is not the payer of this payment.
    #[error("Only payer allowed")]
    NotPayer,

    /// Caller is not the intermediary, or the identifier is unknown.
    #[error("Wrong credentials")]
    NotAuthorized,

    /// Payment already claimed or refunded.
    #[error("Payment already resolved")]
    AlreadyResolved,

    /// Contract has been killed.
    #[error("Contract killed")]
    ContractKilled,

    /// Contract is paused.
    #[error("Contract paused")]
    ContractPaused,

    /// Operation requires a paused contract.
    #[error("Contract not paused")]
    NotPaused,

    /// Refund requested before expiry.
    #[error("Deposit has not yet expired (now {now}, expires {expires})")]
    TooEarly {
        /// Current time.
        now: u64,
        /// Payment expiry.
        expires: u64,
    },

    /// Refund right has lapsed.
    #[error("Refund window lapsed (now {now}, deadline {deadline})")]
    WindowLapsed {
        /// Current time.
        now: u64,
        /// Last second a refund was accepted.
        deadline: u64,
    },

    /// Requested claim window exceeds the configured maximum.
    #[error("Expiry window too long: {requested}s > {max}s")]
    WindowTooLong {
        /// Requested duration in seconds.
        requested: u64,
        /// Configured maximum in seconds.
        max: u64,
    },

    /// Deposit does not exceed the commission.
    #[error("You need to at least cover the commission: value {value}, commission {commission}")]
    InsufficientValue {
        /// Deposited value.
        value: U256,
        /// Current commission.
        commission: U256,
    },

    /// Identifier already used by a payment in any status.
    #[error("This password has already been used: {0}")]
    DuplicateIdentifier(PaymentId),

    /// A supplied password does not match the stored hash.
    #[error("Wrong {0} password")]
    SecretMismatch(SecretField),

    /// No payment with this identifier.
    #[error("Payment not found: {0}")]
    PaymentNotFound(PaymentId),

    /// Passphrase longer than the 32-byte password slot.
    #[error("Password too long: {len} bytes (max 32)")]
    PasswordTooLong {
        /// Passphrase length in bytes.
        len: usize,
    },

    /// Configuration rejected.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Treasury transfer failed; operation reverted.
    #[error("Transfer failed: {0}")]
    Transfer(#[from] TransferError),

    /// Payment store failed; operation reverted.
    #[error("Store failure: {0}")]
    Store(#[from] StoreError),

    /// The task running the operation panicked or was shut down.
    #[error("Operation task failed: {0}")]
    TaskFailed(String),
}

impl RemittanceError {
    /// Error category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotOwner | Self::NotPayer | Self::NotAuthorized => ErrorKind::Authorization,
            Self::AlreadyResolved
            | Self::ContractKilled
            | Self::ContractPaused
            | Self::NotPaused
            | Self::PaymentNotFound(_) => ErrorKind::State,
            Self::TooEarly { .. } | Self::WindowLapsed { .. } | Self::WindowTooLong { .. } => {
                ErrorKind::Timing
            }
            Self::InsufficientValue { .. }
            | Self::DuplicateIdentifier(_)
            | Self::PasswordTooLong { .. }
            | Self::InvalidConfig(_) => ErrorKind::Value,
            Self::SecretMismatch(_) => ErrorKind::Secret,
            Self::Transfer(_) | Self::Store(_) | Self::TaskFailed(_) => ErrorKind::Infrastructure,
        }
    }

    /// Stable reason code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotOwner => "not_owner",
            Self::NotPayer => "not_payer",
            Self::NotAuthorized => "not_authorized",
            Self::AlreadyResolved => "already_resolved",
            Self::ContractKilled => "contract_killed",
            Self::ContractPaused => "contract_paused",
            Self::NotPaused => "not_paused",
            Self::TooEarly { .. } => "too_early",
            Self::WindowLapsed { .. } => "window_lapsed",
            Self::WindowTooLong { .. } => "window_too_long",
            Self::InsufficientValue { .. } => "insufficient_value",
            Self::DuplicateIdentifier(_) => "duplicate_identifier",
            Self::SecretMismatch(SecretField::Payee) => "payee_secret_mismatch",
            Self::SecretMismatch(SecretField::Intermediary) => "intermediary_secret_mismatch",
            Self::PaymentNotFound(_) => "payment_not_found",
            Self::PasswordTooLong { .. } => "password_too_long",
            Self::InvalidConfig(_) => "invalid_config",
            Self::Transfer(_) => "transfer_failed",
            Self::Store(_) => "store_failure",
            Self::TaskFailed(_) => "task_failed",
        }
    }
}
