//! # Algorithms Module
//!
//! Identifier derivation and the payment state machine.

pub mod identity;
pub mod ledger;

pub use identity::{
    compute_id, compute_id_from_passwords, keccak256, password_hash, payment_id_for,
};
pub use ledger::LedgerContext;
