//! # Domain Entities
//!
//! The escrowed payment record.

use super::errors::RemittanceError;
use super::value_objects::{Address, Hash, PaymentId, PaymentStatus, SecretField, U256};
use serde::{Deserialize, Serialize};

/// An escrowed payment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier.
    pub id: PaymentId,
    /// Address that funded the payment; holds refund rights.
    pub payer: Address,
    /// Only address allowed to claim.
    pub intermediary: Address,
    /// Net amount held (deposit minus commission). Zero once resolved.
    pub amount: U256,
    /// Current status.
    pub status: PaymentStatus,
    /// Hash of the payee password.
    pub payee_password_hash: Hash,
    /// Hash of the intermediary password.
    pub intermediary_password_hash: Hash,
    /// Deposit timestamp.
    pub created_at: u64,
    /// Unix timestamp from which refund is allowed.
    pub expires: u64,
    /// Last timestamp at which refund is allowed, if bounded.
    pub refund_deadline: Option<u64>,
}

/// Parameters for creating a payment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaymentParams {
    /// Unique identifier.
    pub id: PaymentId,
    /// Funding address.
    pub payer: Address,
    /// Claiming address.
    pub intermediary: Address,
    /// Net amount.
    pub amount: U256,
    /// Hash of the payee password.
    pub payee_password_hash: Hash,
    /// Hash of the intermediary password.
    pub intermediary_password_hash: Hash,
    /// Creation timestamp.
    pub created_at: u64,
    /// Expiry timestamp.
    pub expires: u64,
    /// Refund deadline.
    pub refund_deadline: Option<u64>,
}

/// Deposit arguments supplied by the payer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositRequest {
    /// Address allowed to claim.
    pub intermediary: Address,
    /// Hash of the payee password (see `password_hash`).
    pub payee_password_hash: Hash,
    /// Hash of the intermediary password.
    pub intermediary_password_hash: Hash,
    /// Claim window in seconds from now.
    pub duration_secs: u64,
}

impl Payment {
    /// Create a new pending payment.
    pub fn new(params: PaymentParams) -> Self {
        Self {
            id: params.id,
            payer: params.payer,
            intermediary: params.intermediary,
            amount: params.amount,
            status: PaymentStatus::Pending,
            payee_password_hash: params.payee_password_hash,
            intermediary_password_hash: params.intermediary_password_hash,
            created_at: params.created_at,
            expires: params.expires,
            refund_deadline: params.refund_deadline,
        }
    }

    /// Whether the claim window has passed.
    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.expires
    }

    /// Whether the refund right has lapsed.
    pub fn is_refund_lapsed(&self, now: u64) -> bool {
        self.refund_deadline.is_some_and(|deadline| now > deadline)
    }

    /// Check if refund is allowed right now (status and timing only).
    pub fn can_refund(&self, now: u64) -> bool {
        self.status == PaymentStatus::Pending && self.is_expired(now) && !self.is_refund_lapsed(now)
    }

    /// Stored hash for a password field.
    pub fn password_hash(&self, field: SecretField) -> &Hash {
        match field {
            SecretField::Payee => &self.payee_password_hash,
            SecretField::Intermediary => &self.intermediary_password_hash,
        }
    }

    /// Overwrite a stored password hash.
    pub fn set_password_hash(&mut self, field: SecretField, hash: Hash) {
        match field {
            SecretField::Payee => self.payee_password_hash = hash,
            SecretField::Intermediary => self.intermediary_password_hash = hash,
        }
    }

    /// Fail unless the payment is still pending.
    pub fn require_pending(&self) -> Result<(), RemittanceError> {
        match self.status {
            PaymentStatus::Pending => Ok(()),
            PaymentStatus::Claimed | PaymentStatus::Refunded => {
                Err(RemittanceError::AlreadyResolved)
            }
        }
    }

    /// Move to a terminal status and zero the balance.
    ///
    /// Returns the amount that must now leave escrow.
    pub fn resolve(&mut self, next: PaymentStatus) -> Result<U256, RemittanceError> {
        if !self.status.can_transition_to(next) {
            return Err(RemittanceError::AlreadyResolved);
        }
        self.status = next;
        Ok(std::mem::take(&mut self.amount))
    }
}
