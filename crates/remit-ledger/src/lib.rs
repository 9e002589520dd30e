//! # Remit Ledger
//!
//! Password-gated remittance escrow.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! A payer escrows value for an intermediary. The intermediary claims it by
//! presenting two passwords (its own and the payee's); if nobody claims, the
//! payer takes it back once the payment expires:
//! - Keccak-256 identifiers bound to the intermediary and ledger instance
//! - Flat commission retained on every deposit
//! - Bounded claim window and refund window
//! - Owner-controlled pause and irreversible kill switch
//!
//! ## Security Properties
//!
//! | Property | Mechanism |
//! |----------|-----------|
//! | Exactly-once payout | Terminal status persisted before value moves |
//! | No identifier reuse | Records are never deleted once settled |
//! | Cross-instance isolation | Instance address in every preimage |
//! | Atomic settlement | Prior record restored if the transfer fails |
//!
//! ## Module Structure
//!
//! ```text
//! remit-ledger/
//! ├── domain/          # Payment, AccessControl, Registry, events, errors
//! ├── algorithms/      # Identifier hashing, payment state machine
//! ├── ports/           # RemittanceApi, PaymentStore, Treasury, Clock, EventSink
//! ├── adapters/        # In-memory port implementations
//! └── service.rs       # RemittanceService
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::{
    InMemoryEventLog, InMemoryPaymentStore, InMemoryTreasury, ManualClock, SystemClock,
};
pub use algorithms::{
    compute_id, compute_id_from_passwords, keccak256, password_hash, payment_id_for,
    LedgerContext,
};
pub use domain::{
    AccessControl, Address, DepositRequest, ErrorKind, EventEnvelope, Hash, LedgerConfig,
    Password, Payment, PaymentId, PaymentStatus, Registry, RemittanceError, RemittanceEvent,
    SecretField, StoreError, SwitchState, TransferError, U256, DAY_SECS, DEFAULT_COMMISSION,
    DEFAULT_DEADLINE_DELTA_SECS, DEFAULT_REFUND_WINDOW_SECS, PASSWORD_LEN,
};
pub use ports::{Clock, EventSink, PaymentStore, RemittanceApi, Treasury};
pub use service::{RemittanceService, ServiceConfig, ServiceStats};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
