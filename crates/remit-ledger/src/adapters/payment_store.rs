//! Payment Store Adapter
//!
//! Implements `PaymentStore` port with an in-memory map.

use crate::domain::{Payment, PaymentId, PaymentStatus, StoreError};
use crate::ports::outbound::PaymentStore;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

/// In-memory payment store for testing and embedding.
#[derive(Default)]
pub struct InMemoryPaymentStore {
    payments: RwLock<HashMap<PaymentId, Payment>>,
}

impl InMemoryPaymentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records in any status.
    pub fn len(&self) -> usize {
        self.payments.read().len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.payments.read().is_empty()
    }

    /// Number of records in the given status.
    pub fn count_with_status(&self, status: PaymentStatus) -> usize {
        self.payments
            .read()
            .values()
            .filter(|p| p.status == status)
            .count()
    }
}

impl PaymentStore for InMemoryPaymentStore {
    fn get(&self, id: &PaymentId) -> Result<Option<Payment>, StoreError> {
        Ok(self.payments.read().get(id).cloned())
    }

    fn insert(&self, payment: Payment) -> Result<(), StoreError> {
        let mut payments = self.payments.write();
        if payments.contains_key(&payment.id) {
            return Err(StoreError::AlreadyExists(payment.id));
        }
        debug!("[remit] Stored payment {}", payment.id.short());
        payments.insert(payment.id, payment);
        Ok(())
    }

    fn put(&self, payment: Payment) -> Result<(), StoreError> {
        let mut payments = self.payments.write();
        let slot = payments
            .get_mut(&payment.id)
            .ok_or(StoreError::Missing(payment.id))?;
        debug!(
            "[remit] Updated payment {} -> {:?}",
            payment.id.short(),
            payment.status
        );
        *slot = payment;
        Ok(())
    }

    fn remove(&self, id: &PaymentId) -> Result<Option<Payment>, StoreError> {
        Ok(self.payments.write().remove(id))
    }
}
