//! # Integration Tests
//!
//! Full flows through `RemittanceApi` against in-memory adapters.

pub mod admin;
pub mod concurrency;
