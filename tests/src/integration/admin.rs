//! # Owner Operations
//!
//! Parameter changes and the pause/kill switch, seen from the outside.

#[cfg(test)]
mod tests {
    use crate::harness::*;
    use remit_ledger::{
        Clock, LedgerConfig, PaymentStatus, RemittanceApi, RemittanceError, RemittanceEvent,
        DAY_SECS,
    };

    #[tokio::test]
    async fn test_defaults() {
        let h = Harness::new();
        assert_eq!(h.ledger.owner().await, OWNER);
        assert_eq!(h.ledger.commission().await, units(10_000));
        assert_eq!(h.ledger.deadline_delta().await, 30 * DAY_SECS);
        assert_eq!(h.ledger.refund_window().await, Some(30 * DAY_SECS));
        assert!(!h.ledger.is_paused().await);
        assert!(!h.ledger.is_killed().await);
    }

    #[tokio::test]
    async fn test_start_paused() {
        let h = Harness::with_ledger_config(LedgerConfig {
            start_paused: true,
            ..LedgerConfig::default()
        });
        assert!(h.ledger.is_paused().await);
        assert!(matches!(
            h.ledger
                .deposit(ALICE, units(100_000), h.request(BOB, "p", "i", 60))
                .await,
            Err(RemittanceError::ContractPaused)
        ));
        h.ledger.resume(OWNER).await.unwrap();
        assert!(h
            .ledger
            .deposit(ALICE, units(100_000), h.request(BOB, "p", "i", 60))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_commission_change_applies_to_new_deposits() {
        let h = Harness::new();
        let first = h
            .ledger
            .deposit(ALICE, units(100_000), h.request(BOB, "a", "b", 60))
            .await
            .unwrap();

        assert!(matches!(
            h.ledger.change_commission(ALICE, units(1)).await,
            Err(RemittanceError::NotOwner)
        ));
        h.ledger.change_commission(OWNER, units(20_000)).await.unwrap();

        let second = h
            .ledger
            .deposit(ALICE, units(100_000), h.request(BOB, "c", "d", 60))
            .await
            .unwrap();

        assert_eq!(h.ledger.payment(first).await.unwrap().unwrap().amount, units(90_000));
        assert_eq!(h.ledger.payment(second).await.unwrap().unwrap().amount, units(80_000));
        assert_eq!(h.ledger.collected_commission().await, units(30_000));
        assert_eq!(
            h.events.last(),
            Some(RemittanceEvent::Deposited {
                payment_id: second,
                payer: ALICE,
                intermediary: BOB,
                amount: units(80_000),
                commission: units(20_000),
                expires: h.clock.now() + 60,
            })
        );
    }

    #[tokio::test]
    async fn test_zero_commission() {
        let h = Harness::new();
        h.ledger.change_commission(OWNER, units(0)).await.unwrap();
        assert!(matches!(
            h.ledger
                .deposit(ALICE, units(0), h.request(BOB, "a", "b", 60))
                .await,
            Err(RemittanceError::InsufficientValue { .. })
        ));
        let id = h
            .ledger
            .deposit(ALICE, units(1), h.request(BOB, "a", "b", 60))
            .await
            .unwrap();
        assert_eq!(h.ledger.payment(id).await.unwrap().unwrap().amount, units(1));
    }

    #[tokio::test]
    async fn test_deadline_delta_change() {
        let h = Harness::new();
        assert!(matches!(
            h.ledger.change_deadline_delta(MALLORY, 60).await,
            Err(RemittanceError::NotOwner)
        ));
        assert!(matches!(
            h.ledger.change_refund_window(MALLORY, None).await,
            Err(RemittanceError::NotOwner)
        ));
        assert_eq!(h.ledger.refund_window().await, Some(30 * DAY_SECS));

        h.ledger.change_deadline_delta(OWNER, 60).await.unwrap();
        assert!(matches!(
            h.ledger
                .deposit(ALICE, units(100_000), h.request(BOB, "a", "b", 61))
                .await,
            Err(RemittanceError::WindowTooLong { requested: 61, max: 60 })
        ));
        assert!(matches!(
            h.ledger.change_deadline_delta(OWNER, 0).await,
            Err(RemittanceError::InvalidConfig(_))
        ));
        assert_eq!(h.ledger.deadline_delta().await, 60);
    }

    #[tokio::test]
    async fn test_refund_window_change_is_captured_at_deposit() {
        let h = Harness::new();
        let bounded = h
            .ledger
            .deposit(ALICE, units(100_000), h.request(BOB, "a", "b", 60))
            .await
            .unwrap();

        h.ledger.change_refund_window(OWNER, None).await.unwrap();
        let unbounded = h
            .ledger
            .deposit(ALICE, units(100_000), h.request(BOB, "c", "d", 60))
            .await
            .unwrap();

        h.clock.advance_time(365 * DAY_SECS);
        assert!(matches!(
            h.ledger.refund(ALICE, bounded).await,
            Err(RemittanceError::WindowLapsed { .. })
        ));
        assert!(h.ledger.refund(ALICE, unbounded).await.is_ok());
    }

    #[tokio::test]
    async fn test_pause_blocks_deposits_not_settlement() {
        let h = Harness::new();
        let claimable = h
            .ledger
            .deposit(ALICE, units(100_000), h.request(BOB, "a", "b", 60))
            .await
            .unwrap();
        let refundable = h
            .ledger
            .deposit(ALICE, units(100_000), h.request(BOB, "c", "d", 60))
            .await
            .unwrap();

        assert!(matches!(h.ledger.pause(MALLORY).await, Err(RemittanceError::NotOwner)));
        h.ledger.pause(OWNER).await.unwrap();
        assert!(h.ledger.is_paused().await);
        assert!(matches!(
            h.ledger.pause(OWNER).await,
            Err(RemittanceError::ContractPaused)
        ));

        assert!(matches!(
            h.ledger
                .deposit(ALICE, units(100_000), h.request(BOB, "e", "f", 60))
                .await,
            Err(RemittanceError::ContractPaused)
        ));

        h.ledger.claim(BOB, claimable, pw("a"), pw("b")).await.unwrap();
        h.clock.advance_time(70);
        h.ledger.refund(ALICE, refundable).await.unwrap();
    }

    #[tokio::test]
    async fn test_kill_requires_pause_and_is_final() {
        let h = Harness::new();
        let id = h
            .ledger
            .deposit(ALICE, units(100_000), h.request(BOB, "a", "b", 60))
            .await
            .unwrap();

        assert!(matches!(h.ledger.kill(OWNER).await, Err(RemittanceError::NotPaused)));
        assert!(matches!(h.ledger.resume(OWNER).await, Err(RemittanceError::NotPaused)));

        h.ledger.pause(OWNER).await.unwrap();
        assert!(matches!(h.ledger.kill(MALLORY).await, Err(RemittanceError::NotOwner)));
        h.ledger.kill(OWNER).await.unwrap();
        assert!(h.ledger.is_killed().await);
        assert!(h.ledger.is_paused().await);

        // Everything that mutates is now closed
        assert!(matches!(h.ledger.resume(OWNER).await, Err(RemittanceError::ContractKilled)));
        assert!(matches!(h.ledger.pause(OWNER).await, Err(RemittanceError::ContractKilled)));
        assert!(matches!(h.ledger.kill(OWNER).await, Err(RemittanceError::ContractKilled)));
        assert!(matches!(
            h.ledger.change_commission(OWNER, units(1)).await,
            Err(RemittanceError::ContractKilled)
        ));
        assert!(matches!(
            h.ledger.change_refund_window(OWNER, None).await,
            Err(RemittanceError::ContractKilled)
        ));
        assert!(matches!(
            h.ledger.change_deadline_delta(OWNER, 60).await,
            Err(RemittanceError::ContractKilled)
        ));
        assert!(matches!(
            h.ledger.change_deadline_delta(MALLORY, 60).await,
            Err(RemittanceError::NotOwner)
        ));
        assert!(matches!(
            h.ledger.claim(BOB, id, pw("a"), pw("b")).await,
            Err(RemittanceError::ContractKilled)
        ));
        h.clock.advance_time(70);
        assert!(matches!(
            h.ledger.refund(ALICE, id).await,
            Err(RemittanceError::ContractKilled)
        ));
        assert!(matches!(
            h.ledger
                .change_payee_password(ALICE, id, hash_for(&INSTANCE, "x"))
                .await,
            Err(RemittanceError::ContractKilled)
        ));
        assert!(matches!(
            h.ledger
                .deposit(ALICE, units(100_000), h.request(BOB, "z", "z", 60))
                .await,
            Err(RemittanceError::ContractKilled)
        ));

        // Non-owner still learns nothing beyond NotOwner
        assert!(matches!(h.ledger.pause(MALLORY).await, Err(RemittanceError::NotOwner)));

        // Reads still work and the escrowed value stays put
        let payment = h.ledger.payment(id).await.unwrap().unwrap();
        assert_eq!(payment.status, PaymentStatus::Pending);
        assert_eq!(h.treasury.custody(), units(100_000));
    }

    #[tokio::test]
    async fn test_admin_events() {
        let h = Harness::new();
        h.ledger.change_commission(OWNER, units(5)).await.unwrap();
        h.ledger.pause(OWNER).await.unwrap();
        h.ledger.resume(OWNER).await.unwrap();

        assert_eq!(
            h.events.events(),
            vec![
                RemittanceEvent::CommissionChanged {
                    previous: units(10_000),
                    current: units(5),
                },
                RemittanceEvent::Paused { by: OWNER },
                RemittanceEvent::Resumed { by: OWNER },
            ]
        );
    }
}
