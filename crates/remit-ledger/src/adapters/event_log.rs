//! Event Log Adapter
//!
//! Implements `EventSink` port by appending to an in-memory log.

use crate::domain::{EventEnvelope, PaymentId, RemittanceEvent};
use crate::ports::outbound::EventSink;
use parking_lot::RwLock;
use tracing::debug;

/// Append-only in-memory event log.
#[derive(Default)]
pub struct InMemoryEventLog {
    entries: RwLock<Vec<EventEnvelope>>,
}

impl InMemoryEventLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every envelope, oldest first.
    pub fn envelopes(&self) -> Vec<EventEnvelope> {
        self.entries.read().clone()
    }

    /// Snapshot of the events without metadata.
    pub fn events(&self) -> Vec<RemittanceEvent> {
        self.entries.read().iter().map(|e| e.event.clone()).collect()
    }

    /// Events that refer to one payment.
    pub fn events_for(&self, payment_id: &PaymentId) -> Vec<RemittanceEvent> {
        self.entries
            .read()
            .iter()
            .filter(|e| e.event.payment_id().as_ref() == Some(payment_id))
            .map(|e| e.event.clone())
            .collect()
    }

    /// Most recent event.
    pub fn last(&self) -> Option<RemittanceEvent> {
        self.entries.read().last().map(|e| e.event.clone())
    }

    /// Number of events logged.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether nothing has been logged.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl EventSink for InMemoryEventLog {
    fn publish(&self, envelope: EventEnvelope) {
        debug!(
            "[remit] Event {} ({})",
            envelope.event.name(),
            envelope.correlation_id
        );
        self.entries.write().push(envelope);
    }
}
