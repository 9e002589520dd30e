//! # Outbound Ports
//!
//! Traits for the ledger's external collaborators: record storage, value
//! custody, time and event delivery.

use crate::domain::{Address, EventEnvelope, Payment, PaymentId, StoreError, TransferError, U256};
use async_trait::async_trait;

/// Payment record storage - outbound port.
///
/// Calls are made while the service holds its operation lock, so
/// implementations only need to be internally consistent.
pub trait PaymentStore: Send + Sync + 'static {
    /// Fetch a record.
    fn get(&self, id: &PaymentId) -> Result<Option<Payment>, StoreError>;

    /// Store a new record. Fails if the identifier is taken.
    fn insert(&self, payment: Payment) -> Result<(), StoreError>;

    /// Overwrite an existing record. Fails if it is missing.
    fn put(&self, payment: Payment) -> Result<(), StoreError>;

    /// Delete a record, returning it if present.
    fn remove(&self, id: &PaymentId) -> Result<Option<Payment>, StoreError>;
}

/// Value custody - outbound port.
#[async_trait]
pub trait Treasury: Send + Sync + 'static {
    /// Take `amount` from `from` into custody.
    async fn receive(&self, from: Address, amount: U256) -> Result<(), TransferError>;

    /// Move `amount` from custody to `recipient`.
    async fn send(&self, recipient: Address, amount: U256) -> Result<(), TransferError>;
}

/// Time source - outbound port.
pub trait Clock: Send + Sync + 'static {
    /// Current unix time in seconds.
    fn now(&self) -> u64;
}

/// Event delivery - outbound port.
pub trait EventSink: Send + Sync + 'static {
    /// Publish an event. Delivery failures are the sink's concern.
    fn publish(&self, envelope: EventEnvelope);
}
