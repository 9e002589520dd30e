//! # Re-entrancy During Payout
//!
//! A malicious recipient gets control while value is moving out of
//! custody. It inspects the ledger's storage and fires a second claim for
//! the same payment from inside the transfer.
//!
//! ## Defense
//!
//! The terminal status and zeroed amount are stored before the treasury
//! is called, and the second claim queues behind the operation lock. It
//! then finds the payment resolved.

#[cfg(test)]
mod tests {
    use crate::harness::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use remit_ledger::{
        Address, InMemoryPaymentStore, InMemoryTreasury, LedgerConfig, Payment, PaymentId,
        PaymentStatus, PaymentStore, RemittanceApi, RemittanceError, ServiceConfig,
        TransferError, Treasury, U256,
    };
    use std::sync::{Arc, OnceLock, Weak};
    use tokio::task::JoinHandle;

    type Reentry = JoinHandle<Result<U256, RemittanceError>>;

    /// Treasury controlled by the attacker's recipient.
    #[derive(Default)]
    struct HostileTreasury {
        inner: InMemoryTreasury,
        store: OnceLock<Arc<InMemoryPaymentStore>>,
        ledger: OnceLock<Weak<Ledger<HostileTreasury>>>,
        target: OnceLock<PaymentId>,
        observed: Mutex<Vec<Payment>>,
        reentry: Mutex<Option<Reentry>>,
    }

    impl HostileTreasury {
        fn arm(&self, h: &Harness<HostileTreasury>, target: PaymentId) {
            let _ = self.store.set(h.store.clone());
            let _ = self.ledger.set(Arc::downgrade(&h.ledger));
            let _ = self.target.set(target);
        }
    }

    #[async_trait]
    impl Treasury for HostileTreasury {
        async fn receive(&self, from: Address, amount: U256) -> Result<(), TransferError> {
            self.inner.receive(from, amount).await
        }

        async fn send(&self, recipient: Address, amount: U256) -> Result<(), TransferError> {
            if let (Some(store), Some(id)) = (self.store.get(), self.target.get()) {
                if let Ok(Some(payment)) = store.get(id) {
                    self.observed.lock().push(payment);
                }
            }

            {
                let mut reentry = self.reentry.lock();
                if reentry.is_none() {
                    if let (Some(ledger), Some(id)) =
                        (self.ledger.get().and_then(Weak::upgrade), self.target.get().copied())
                    {
                        *reentry = Some(tokio::spawn(async move {
                            ledger.claim(BOB, id, pw("p"), pw("i")).await
                        }));
                    }
                }
            }

            self.inner.send(recipient, amount).await
        }
    }

    fn hostile_harness() -> Harness<HostileTreasury> {
        let treasury = Arc::new(HostileTreasury::default());
        treasury
            .inner
            .fund(ALICE, units(INITIAL_BALANCE));
        Harness::with_treasury(
            treasury,
            ServiceConfig {
                owner: OWNER,
                instance: INSTANCE,
                ledger: LedgerConfig::default(),
            },
        )
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_record_resolved_before_claim_payout() {
        let h = hostile_harness();
        let id = h
            .ledger
            .deposit(ALICE, units(100_000), h.request(BOB, "p", "i", 60))
            .await
            .unwrap();
        h.treasury.arm(&h, id);

        h.ledger.claim(BOB, id, pw("p"), pw("i")).await.unwrap();

        let observed = h.treasury.observed.lock().clone();
        let first = observed.first().expect("payout observed");
        assert_eq!(first.status, PaymentStatus::Claimed);
        assert_eq!(first.amount, units(0));

        let reentry = h.treasury.reentry.lock().take().expect("re-entry fired");
        assert!(matches!(
            reentry.await.unwrap(),
            Err(RemittanceError::AlreadyResolved)
        ));
        assert_eq!(h.treasury.inner.balance_of(&BOB), units(90_000));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_record_resolved_before_refund_payout() {
        let h = hostile_harness();
        let id = h
            .ledger
            .deposit(ALICE, units(100_000), h.request(BOB, "p", "i", 60))
            .await
            .unwrap();
        h.treasury.arm(&h, id);
        h.clock.advance_time(70);

        h.ledger.refund(ALICE, id).await.unwrap();

        let observed = h.treasury.observed.lock().clone();
        assert_eq!(observed[0].status, PaymentStatus::Refunded);
        assert_eq!(observed[0].amount, units(0));

        // The intermediary's claim from inside the refund payout loses
        let reentry = h.treasury.reentry.lock().take().expect("re-entry fired");
        assert!(matches!(
            reentry.await.unwrap(),
            Err(RemittanceError::AlreadyResolved)
        ));
        assert_eq!(h.treasury.inner.balance_of(&BOB), units(0));
        assert_eq!(h.treasury.inner.custody(), units(10_000));
    }
}
