//! # Identity Hashing
//!
//! Keccak-256 derivation of password hashes and payment identifiers.
//!
//! Field order and widths are fixed:
//!
//! ```text
//! password_hash = keccak256(instance[20] || password[32])
//! payment_id    = keccak256(intermediary[20] || payee_hash[32]
//!                           || intermediary_hash[32] || instance[20])
//! ```
//!
//! The instance address is part of both preimages, so the same passwords
//! used against another deployment yield unrelated hashes and identifiers.

use crate::domain::{Address, DepositRequest, Hash, Password, PaymentId};
use sha3::{Digest, Keccak256};

/// Keccak-256 over the concatenation of `parts`.
pub fn keccak256(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Hash a password for storage or comparison.
pub fn password_hash(instance: &Address, password: &Password) -> Hash {
    Hash(keccak256(&[instance.as_bytes(), password.as_bytes()]))
}

/// Derive a payment identifier from stored password hashes.
pub fn compute_id(
    intermediary: &Address,
    payee_hash: &Hash,
    intermediary_hash: &Hash,
    instance: &Address,
) -> PaymentId {
    PaymentId(keccak256(&[
        intermediary.as_bytes(),
        payee_hash.as_bytes(),
        intermediary_hash.as_bytes(),
        instance.as_bytes(),
    ]))
}

/// Derive a payment identifier straight from candidate passwords.
///
/// Lets a claimant turn secret knowledge into an identifier locally,
/// without submitting the passwords anywhere.
pub fn compute_id_from_passwords(
    intermediary: &Address,
    payee_password: &Password,
    intermediary_password: &Password,
    instance: &Address,
) -> PaymentId {
    compute_id(
        intermediary,
        &password_hash(instance, payee_password),
        &password_hash(instance, intermediary_password),
        instance,
    )
}

/// Identifier a deposit request will be stored under.
pub fn payment_id_for(request: &DepositRequest, instance: &Address) -> PaymentId {
    compute_id(
        &request.intermediary,
        &request.payee_password_hash,
        &request.intermediary_password_hash,
        instance,
    )
}
