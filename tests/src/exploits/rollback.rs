//! # Failed Payout Rollback
//!
//! A recipient that refuses incoming value makes the transfer fail after
//! the ledger already marked the payment resolved. If the ledger kept that
//! state the funds would be stuck in custody with no path out.
//!
//! ## Defense
//!
//! The prior record is written back when the transfer fails, so the
//! payment stays claimable or refundable.

#[cfg(test)]
mod tests {
    use crate::harness::*;
    use remit_ledger::{
        ErrorKind, PaymentStatus, RemittanceApi, RemittanceError, TransferError,
    };

    #[tokio::test]
    async fn test_rejected_claim_payout_restores_payment() {
        let h = Harness::new();
        let id = h
            .ledger
            .deposit(ALICE, units(100_000), h.request(BOB, "p", "i", 60))
            .await
            .unwrap();
        h.treasury.reject_transfers_to(BOB);

        let err = h.ledger.claim(BOB, id, pw("p"), pw("i")).await.unwrap_err();
        assert!(matches!(
            err,
            RemittanceError::Transfer(TransferError::Rejected { .. })
        ));
        assert_eq!(err.kind(), ErrorKind::Infrastructure);

        let payment = h.ledger.payment(id).await.unwrap().unwrap();
        assert_eq!(payment.status, PaymentStatus::Pending);
        assert_eq!(payment.amount, units(90_000));
        assert_eq!(h.treasury.custody(), units(100_000));

        // Once the recipient accepts value again the claim goes through
        h.treasury.accept_transfers_to(&BOB);
        assert_eq!(
            h.ledger.claim(BOB, id, pw("p"), pw("i")).await.unwrap(),
            units(90_000)
        );
    }

    #[tokio::test]
    async fn test_rejected_refund_leaves_claim_open() {
        let h = Harness::new();
        let id = h
            .ledger
            .deposit(ALICE, units(100_000), h.request(BOB, "p", "i", 60))
            .await
            .unwrap();
        h.clock.advance_time(70);
        h.treasury.reject_transfers_to(ALICE);

        assert!(matches!(
            h.ledger.refund(ALICE, id).await,
            Err(RemittanceError::Transfer(_))
        ));
        assert!(h.ledger.claim(BOB, id, pw("p"), pw("i")).await.is_ok());
    }

    #[tokio::test]
    async fn test_failed_deposit_funding_leaves_nothing() {
        let h = Harness::new();
        let request = h.request(BOB, "p", "i", 60);
        let id = h.ledger.compute_id(BOB, &pw("p"), &pw("i"));

        // Mallory was never funded
        assert!(matches!(
            h.ledger.deposit(MALLORY, units(100_000), request.clone()).await,
            Err(RemittanceError::Transfer(TransferError::InsufficientBalance { .. }))
        ));
        assert_eq!(h.ledger.payment(id).await.unwrap(), None);
        assert_eq!(h.ledger.collected_commission().await, units(0));

        // The identifier is still free for a funded payer
        assert_eq!(
            h.ledger.deposit(ALICE, units(100_000), request).await.unwrap(),
            id
        );
    }
}
