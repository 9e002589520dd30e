//! # Payment Ledger
//!
//! Pure state transitions for the payment lifecycle.
//!
//! ```text
//! Pending --claim--> Claimed
//!    |
//!    +----refund--> Refunded
//! ```
//!
//! Each function runs its checks in a fixed order and mutates the record
//! only after every check has passed. Persistence and value movement are
//! left to the service.

use super::identity::{password_hash, payment_id_for};
use crate::domain::{
    invariant_authorized_claimer, invariant_commission_covered, invariant_payer,
    invariant_secret_matches, invariant_unique_identifier, AccessControl, Address,
    DepositRequest, Hash, Password, Payment, PaymentId, PaymentParams, PaymentStatus, Registry,
    RemittanceError, SecretField, U256,
};

/// Read-only view of contract state for one operation.
#[derive(Clone, Copy, Debug)]
pub struct LedgerContext<'a> {
    /// Owner and switch.
    pub access: &'a AccessControl,
    /// Live parameters.
    pub registry: &'a Registry,
    /// Address of this ledger instance.
    pub instance: Address,
    /// Current unix time in seconds.
    pub now: u64,
}

/// Outcome of an accepted deposit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepositReceipt {
    /// The new pending payment.
    pub payment: Payment,
    /// Commission retained by the contract.
    pub commission: U256,
}

/// Create a pending payment.
///
/// `existing` is whatever the store holds under the derived identifier.
pub fn deposit(
    ctx: &LedgerContext<'_>,
    payer: Address,
    value: U256,
    request: &DepositRequest,
    existing: Option<&Payment>,
) -> Result<DepositReceipt, RemittanceError> {
    ctx.access.require_deposits_open()?;

    let commission = ctx.registry.commission();
    let amount = invariant_commission_covered(value, commission)?;
    let window = ctx.registry.window_for(ctx.now, request.duration_secs)?;

    let id = payment_id_for(request, &ctx.instance);
    invariant_unique_identifier(id, existing)?;

    let payment = Payment::new(PaymentParams {
        id,
        payer,
        intermediary: request.intermediary,
        amount,
        payee_password_hash: request.payee_password_hash,
        intermediary_password_hash: request.intermediary_password_hash,
        created_at: ctx.now,
        expires: window.expires,
        refund_deadline: window.refund_deadline,
    });

    Ok(DepositReceipt {
        payment,
        commission,
    })
}

/// Release a payment to its intermediary.
///
/// An unknown identifier is indistinguishable from a wrong caller.
/// Returns the amount to transfer.
pub fn claim(
    ctx: &LedgerContext<'_>,
    payment: Option<&mut Payment>,
    caller: Address,
    payee_password: &Password,
    intermediary_password: &Password,
) -> Result<U256, RemittanceError> {
    ctx.access.require_alive()?;

    let payment = match payment {
        Some(p) if invariant_authorized_claimer(p, &caller) => p,
        _ => return Err(RemittanceError::NotAuthorized),
    };
    payment.require_pending()?;

    verify_password(ctx, payment, SecretField::Payee, payee_password)?;
    verify_password(ctx, payment, SecretField::Intermediary, intermediary_password)?;

    payment.resolve(PaymentStatus::Claimed)
}

/// Return an expired payment to its payer.
///
/// Returns the amount to transfer.
pub fn refund(
    ctx: &LedgerContext<'_>,
    id: PaymentId,
    payment: Option<&mut Payment>,
    caller: Address,
) -> Result<U256, RemittanceError> {
    let payment = payer_record(ctx, id, payment, caller)?;

    if !payment.is_expired(ctx.now) {
        return Err(RemittanceError::TooEarly {
            now: ctx.now,
            expires: payment.expires,
        });
    }
    if let Some(deadline) = payment.refund_deadline {
        if payment.is_refund_lapsed(ctx.now) {
            return Err(RemittanceError::WindowLapsed {
                now: ctx.now,
                deadline,
            });
        }
    }

    payment.resolve(PaymentStatus::Refunded)
}

/// Replace one stored password hash.
///
/// Returns the hash that was replaced.
pub fn change_password(
    ctx: &LedgerContext<'_>,
    id: PaymentId,
    payment: Option<&mut Payment>,
    caller: Address,
    field: SecretField,
    new_hash: Hash,
) -> Result<Hash, RemittanceError> {
    let payment = payer_record(ctx, id, payment, caller)?;
    let previous = *payment.password_hash(field);
    payment.set_password_hash(field, new_hash);
    Ok(previous)
}

// =============================================================================
// Shared checks
// =============================================================================

/// Liveness, existence, payer and pending checks shared by payer operations.
fn payer_record<'p>(
    ctx: &LedgerContext<'_>,
    id: PaymentId,
    payment: Option<&'p mut Payment>,
    caller: Address,
) -> Result<&'p mut Payment, RemittanceError> {
    ctx.access.require_alive()?;
    let payment = payment.ok_or(RemittanceError::PaymentNotFound(id))?;
    if !invariant_payer(payment, &caller) {
        return Err(RemittanceError::NotPayer);
    }
    payment.require_pending()?;
    Ok(payment)
}

fn verify_password(
    ctx: &LedgerContext<'_>,
    payment: &Payment,
    field: SecretField,
    candidate: &Password,
) -> Result<(), RemittanceError> {
    let candidate = password_hash(&ctx.instance, candidate);
    if !invariant_secret_matches(&candidate, payment.password_hash(field)) {
        return Err(RemittanceError::SecretMismatch(field));
    }
    Ok(())
}
