//! # Domain Module
//!
//! Core domain types for the escrow ledger.

pub mod access;
pub mod entities;
pub mod errors;
pub mod events;
pub mod invariants;
pub mod password;
pub mod registry;
pub mod value_objects;

pub use access::*;
pub use entities::*;
pub use errors::*;
pub use events::*;
pub use invariants::*;
pub use password::{Password, PASSWORD_LEN};
pub use registry::*;
pub use value_objects::*;
