//! # Domain Invariants
//!
//! Business rules for the escrow ledger.

use super::entities::Payment;
use super::errors::RemittanceError;
use super::value_objects::{Address, Hash, PaymentId, U256};

/// Invariant: Deposit strictly exceeds the commission.
///
/// A deposit equal to the commission would escrow nothing.
pub fn invariant_commission_covered(value: U256, commission: U256) -> Result<U256, RemittanceError> {
    if value <= commission {
        return Err(RemittanceError::InsufficientValue { value, commission });
    }
    Ok(value - commission)
}

/// Invariant: Claim window does not exceed the configured maximum.
pub fn invariant_window_bound(duration: u64, max: u64) -> Result<(), RemittanceError> {
    if duration > max {
        return Err(RemittanceError::WindowTooLong {
            requested: duration,
            max,
        });
    }
    Ok(())
}

/// Invariant: Identifiers are single-use for the lifetime of the ledger.
///
/// Any existing record blocks reuse, whatever its status.
pub fn invariant_unique_identifier(
    id: PaymentId,
    existing: Option<&Payment>,
) -> Result<(), RemittanceError> {
    if existing.is_some() {
        return Err(RemittanceError::DuplicateIdentifier(id));
    }
    Ok(())
}

/// Invariant: Only the recorded intermediary can claim.
pub fn invariant_authorized_claimer(payment: &Payment, caller: &Address) -> bool {
    payment.intermediary == *caller
}

/// Invariant: Only the payer can refund or rotate passwords.
pub fn invariant_payer(payment: &Payment, caller: &Address) -> bool {
    payment.payer == *caller
}

/// Invariant: Candidate password hash equals the stored hash.
pub fn invariant_secret_matches(candidate: &Hash, stored: &Hash) -> bool {
    candidate == stored
}
