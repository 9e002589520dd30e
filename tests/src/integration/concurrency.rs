//! # Concurrent Access
//!
//! Many tasks racing against one ledger on a multi-threaded runtime.

#[cfg(test)]
mod tests {
    use crate::harness::*;
    use futures::future::join_all;
    use remit_ledger::{PaymentStatus, RemittanceApi, RemittanceError};
    use std::sync::Arc;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_racing_claims_pay_out_once() {
        let h = Harness::new();
        let id = h
            .ledger
            .deposit(ALICE, units(100_000), h.request(BOB, "p", "i", 60))
            .await
            .unwrap();

        let tasks = (0..16).map(|_| {
            let ledger = Arc::clone(&h.ledger);
            tokio::spawn(async move { ledger.claim(BOB, id, pw("p"), pw("i")).await })
        });
        let results: Vec<_> = join_all(tasks)
            .await
            .into_iter()
            .map(|joined| joined.expect("task panicked"))
            .collect();

        let successes = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| matches!(e, RemittanceError::AlreadyResolved)));
        assert_eq!(h.treasury.balance_of(&BOB), units(90_000));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_claim_and_refund_race() {
        let h = Harness::new();
        let id = h
            .ledger
            .deposit(ALICE, units(100_000), h.request(BOB, "p", "i", 60))
            .await
            .unwrap();
        h.clock.advance_time(70);

        let claimer = {
            let ledger = Arc::clone(&h.ledger);
            tokio::spawn(async move { ledger.claim(BOB, id, pw("p"), pw("i")).await })
        };
        let refunder = {
            let ledger = Arc::clone(&h.ledger);
            tokio::spawn(async move { ledger.refund(ALICE, id).await })
        };

        let claim = claimer.await.unwrap();
        let refund = refunder.await.unwrap();
        assert!(claim.is_ok() ^ refund.is_ok());

        let paid_out = h.treasury.balance_of(&BOB)
            + (h.treasury.balance_of(&ALICE) - units(INITIAL_BALANCE - 100_000));
        assert_eq!(paid_out, units(90_000));

        let status = h.ledger.payment(id).await.unwrap().unwrap().status;
        assert!(status.is_terminal());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_parallel_deposits_all_accounted() {
        let h = Harness::new();

        let tasks = (0..32u64).map(|n| {
            let ledger = Arc::clone(&h.ledger);
            let request = h.request(BOB, &format!("payee-{n}"), "shared", 60);
            tokio::spawn(async move { ledger.deposit(ALICE, units(50_000), request).await })
        });
        let ids: Vec<_> = join_all(tasks)
            .await
            .into_iter()
            .map(|joined| joined.unwrap().unwrap())
            .collect();

        assert_eq!(ids.len(), 32);
        assert_eq!(h.store.count_with_status(PaymentStatus::Pending), 32);
        assert_eq!(h.treasury.custody(), units(32 * 50_000));
        assert_eq!(h.ledger.collected_commission().await, units(32 * 10_000));
        assert_eq!(h.ledger.stats().deposits, 32);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_duplicate_deposit_race() {
        let h = Harness::new();

        let tasks = (0..8).map(|_| {
            let ledger = Arc::clone(&h.ledger);
            let request = h.request(BOB, "same", "same", 60);
            tokio::spawn(async move { ledger.deposit(ALICE, units(100_000), request).await })
        });
        let results: Vec<_> = join_all(tasks)
            .await
            .into_iter()
            .map(|joined| joined.unwrap())
            .collect();

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(h.treasury.custody(), units(100_000));
        assert_eq!(h.store.len(), 1);
    }
}
