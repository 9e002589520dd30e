//! # Inbound Ports
//!
//! API trait defining what the remittance ledger can do.

use crate::domain::{
    Address, DepositRequest, Hash, Password, Payment, PaymentId, RemittanceError, U256,
};
use async_trait::async_trait;

/// Remittance API - inbound port.
///
/// `caller` is the authenticated address of whoever invokes the operation
/// and `value` is what they attached to it.
#[async_trait]
pub trait RemittanceApi: Send + Sync {
    // =========================================================================
    // PAYMENT LIFECYCLE
    // =========================================================================

    /// Escrow `value` minus commission. Returns the new payment identifier.
    async fn deposit(
        &self,
        caller: Address,
        value: U256,
        request: DepositRequest,
    ) -> Result<PaymentId, RemittanceError>;

    /// Release a payment to its intermediary. Returns the amount sent.
    async fn claim(
        &self,
        caller: Address,
        payment_id: PaymentId,
        payee_password: Password,
        intermediary_password: Password,
    ) -> Result<U256, RemittanceError>;

    /// Return an expired payment to its payer. Returns the amount sent.
    async fn refund(&self, caller: Address, payment_id: PaymentId)
        -> Result<U256, RemittanceError>;

    /// Replace the payee password hash.
    async fn change_payee_password(
        &self,
        caller: Address,
        payment_id: PaymentId,
        new_hash: Hash,
    ) -> Result<(), RemittanceError>;

    /// Replace the intermediary password hash.
    async fn change_intermediary_password(
        &self,
        caller: Address,
        payment_id: PaymentId,
        new_hash: Hash,
    ) -> Result<(), RemittanceError>;

    // =========================================================================
    // ADMINISTRATION (owner only)
    // =========================================================================

    /// Set the flat commission for subsequent deposits.
    async fn change_commission(&self, caller: Address, commission: U256)
        -> Result<(), RemittanceError>;

    /// Set the maximum claim window for subsequent deposits.
    async fn change_deadline_delta(&self, caller: Address, secs: u64)
        -> Result<(), RemittanceError>;

    /// Set the refund window for subsequent deposits. `None` never lapses.
    async fn change_refund_window(
        &self,
        caller: Address,
        secs: Option<u64>,
    ) -> Result<(), RemittanceError>;

    /// Suspend deposits.
    async fn pause(&self, caller: Address) -> Result<(), RemittanceError>;

    /// Re-enable deposits.
    async fn resume(&self, caller: Address) -> Result<(), RemittanceError>;

    /// Permanently disable the ledger. Requires a paused ledger.
    async fn kill(&self, caller: Address) -> Result<(), RemittanceError>;

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Current commission.
    async fn commission(&self) -> U256;

    /// Current maximum claim window in seconds.
    async fn deadline_delta(&self) -> u64;

    /// Current refund window in seconds.
    async fn refund_window(&self) -> Option<u64>;

    /// Whether deposits are suspended. True once killed.
    async fn is_paused(&self) -> bool;

    /// Whether the ledger has been killed.
    async fn is_killed(&self) -> bool;

    /// Contract owner.
    async fn owner(&self) -> Address;

    /// Total commission retained so far.
    async fn collected_commission(&self) -> U256;

    /// Look up a payment record.
    async fn payment(&self, payment_id: PaymentId) -> Result<Option<Payment>, RemittanceError>;

    /// Derive the identifier for a password pair on this instance.
    fn compute_id(
        &self,
        intermediary: Address,
        payee_password: &Password,
        intermediary_password: &Password,
    ) -> PaymentId;
}
