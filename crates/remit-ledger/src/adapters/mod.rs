//! # Adapters Layer (Hexagonal Architecture)
//!
//! In-memory implementations of the outbound ports.

mod clock;
mod event_log;
mod payment_store;
mod treasury;

pub use clock::{ManualClock, SystemClock};
pub use event_log::InMemoryEventLog;
pub use payment_store::InMemoryPaymentStore;
pub use treasury::InMemoryTreasury;
