//! # Remittance Service
//!
//! Wires the ledger state machine to its ports and implements
//! `RemittanceApi`.
//!
//! ## Concurrency
//!
//! Every operation holds one service-wide async mutex for its full
//! duration, including the treasury await, so state transitions are
//! applied one at a time.
//!
//! Deposit, claim and refund run on a spawned task that owns the lock.
//! A caller that stops polling (timeout, `select!`, dropped request)
//! detaches from the task instead of cancelling it, so a record update
//! and its treasury transfer always finish together.
//!
//! ## Settlement
//!
//! Claim and refund persist the terminal record (amount zeroed) before
//! value leaves custody. If the treasury refuses the transfer the prior
//! record is written back and the call fails, leaving no trace of the
//! attempt.

use crate::algorithms::{compute_id_from_passwords, ledger, payment_id_for, LedgerContext};
use crate::domain::{
    AccessControl, Address, DepositRequest, EventEnvelope, Hash, LedgerConfig, Password, Payment,
    PaymentId, Registry, RemittanceError, RemittanceEvent, SecretField, U256,
};
use crate::ports::inbound::RemittanceApi;
use crate::ports::outbound::{Clock, EventSink, PaymentStore, Treasury};

use async_trait::async_trait;
use parking_lot::RwLock;
use remit_telemetry::{
    log_event, log_payment_event, record_rejection, OperationTimer, DEPOSITS_ACCEPTED,
    PAYMENTS_CLAIMED, PAYMENTS_PENDING, PAYMENTS_REFUNDED, VALUE_RELEASED,
};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, instrument, Instrument};
use uuid::Uuid;

const COMPONENT: &str = "remit-ledger";

/// Remittance service configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Address allowed to run owner operations.
    pub owner: Address,
    /// Address of this ledger instance, mixed into every hash.
    pub instance: Address,
    /// Initial parameters.
    pub ledger: LedgerConfig,
}

impl ServiceConfig {
    /// Configuration with default ledger parameters.
    pub fn new(owner: Address, instance: Address) -> Self {
        Self {
            owner,
            instance,
            ledger: LedgerConfig::default(),
        }
    }
}

/// Statistics for the remittance service.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ServiceStats {
    /// Deposits accepted.
    pub deposits: u64,
    /// Payments claimed.
    pub claims: u64,
    /// Payments refunded.
    pub refunds: u64,
    /// Password hashes replaced.
    pub password_changes: u64,
    /// Owner operations applied.
    pub admin_changes: u64,
    /// Operations rejected for any reason.
    pub rejected: u64,
}

/// Mutable contract state guarded by the operation lock.
#[derive(Debug)]
struct ContractState {
    access: AccessControl,
    registry: Registry,
    collected_commission: U256,
}

impl ContractState {
    fn context(&self, instance: Address, now: u64) -> LedgerContext<'_> {
        LedgerContext {
            access: &self.access,
            registry: &self.registry,
            instance,
            now,
        }
    }
}

/// The remittance ledger service.
pub struct RemittanceService<S, T, C, E>
where
    S: PaymentStore,
    T: Treasury,
    C: Clock,
    E: EventSink,
{
    core: Arc<LedgerCore<S, T, C, E>>,
}

impl<S, T, C, E> RemittanceService<S, T, C, E>
where
    S: PaymentStore,
    T: Treasury,
    C: Clock,
    E: EventSink,
{
    /// Create a new service.
    pub fn new(
        config: ServiceConfig,
        store: Arc<S>,
        treasury: Arc<T>,
        clock: Arc<C>,
        events: Arc<E>,
    ) -> Result<Self, RemittanceError> {
        LedgerCore::new(config, store, treasury, clock, events).map(|core| Self {
            core: Arc::new(core),
        })
    }

    /// Address of this ledger instance.
    pub fn instance(&self) -> Address {
        self.core.instance
    }

    /// Get current service statistics.
    pub fn stats(&self) -> ServiceStats {
        self.core.stats.read().clone()
    }
}

/// Ports and state shared with operation tasks.
struct LedgerCore<S, T, C, E>
where
    S: PaymentStore,
    T: Treasury,
    C: Clock,
    E: EventSink,
{
    instance: Address,
    store: Arc<S>,
    treasury: Arc<T>,
    clock: Arc<C>,
    events: Arc<E>,
    state: Mutex<ContractState>,
    stats: RwLock<ServiceStats>,
}

impl<S, T, C, E> LedgerCore<S, T, C, E>
where
    S: PaymentStore,
    T: Treasury,
    C: Clock,
    E: EventSink,
{
    fn new(
        config: ServiceConfig,
        store: Arc<S>,
        treasury: Arc<T>,
        clock: Arc<C>,
        events: Arc<E>,
    ) -> Result<Self, RemittanceError> {
        config.ledger.validate()?;

        log_event!(
            info,
            COMPONENT,
            "Remittance ledger initialized",
            owner = %config.owner,
            instance = %config.instance,
            commission = %config.ledger.commission,
            start_paused = config.ledger.start_paused
        );

        Ok(Self {
            instance: config.instance,
            store,
            treasury,
            clock,
            events,
            state: Mutex::new(ContractState {
                access: AccessControl::new(config.owner, config.ledger.start_paused),
                registry: Registry::from_config(&config.ledger),
                collected_commission: U256::zero(),
            }),
            stats: RwLock::new(ServiceStats::default()),
        })
    }

    // =========================================================================
    // PAYMENT LIFECYCLE
    // =========================================================================

    #[instrument(skip(self, request), fields(correlation_id = %correlation_id, caller = %caller))]
    async fn do_deposit(
        &self,
        correlation_id: Uuid,
        caller: Address,
        value: U256,
        request: DepositRequest,
    ) -> Result<PaymentId, RemittanceError> {
        let mut state = self.state.lock().await;
        state.access.require_deposits_open()?;
        let now = self.clock.now();

        let id = payment_id_for(&request, &self.instance);
        let existing = self.store.get(&id)?;
        let receipt = ledger::deposit(
            &state.context(self.instance, now),
            caller,
            value,
            &request,
            existing.as_ref(),
        )?;
        let payment = receipt.payment;

        self.store.insert(payment.clone())?;
        if let Err(e) = self.treasury.receive(caller, value).await {
            self.store.remove(&id)?;
            return Err(e.into());
        }
        state.collected_commission = state.collected_commission.saturating_add(receipt.commission);

        self.stats.write().deposits += 1;
        DEPOSITS_ACCEPTED.inc();
        PAYMENTS_PENDING.inc();

        log_payment_event!(
            info,
            COMPONENT,
            "Deposit accepted",
            id,
            amount = %payment.amount,
            commission = %receipt.commission,
            expires = payment.expires
        );

        self.emit(
            correlation_id,
            now,
            RemittanceEvent::Deposited {
                payment_id: id,
                payer: caller,
                intermediary: payment.intermediary,
                amount: payment.amount,
                commission: receipt.commission,
                expires: payment.expires,
            },
        );

        Ok(id)
    }

    #[instrument(
        skip(self, payee_password, intermediary_password),
        fields(correlation_id = %correlation_id, caller = %caller, payment_id = %payment_id)
    )]
    async fn do_claim(
        &self,
        correlation_id: Uuid,
        caller: Address,
        payment_id: PaymentId,
        payee_password: &Password,
        intermediary_password: &Password,
    ) -> Result<U256, RemittanceError> {
        let state = self.state.lock().await;
        let now = self.clock.now();

        let prior = self.store.get(&payment_id)?;
        let mut record = prior.clone();
        let amount = ledger::claim(
            &state.context(self.instance, now),
            record.as_mut(),
            caller,
            payee_password,
            intermediary_password,
        )?;
        let (Some(prior), Some(updated)) = (prior, record) else {
            return Err(RemittanceError::PaymentNotFound(payment_id));
        };

        self.settle(prior, updated, caller, amount).await?;

        self.stats.write().claims += 1;
        PAYMENTS_CLAIMED.inc();
        PAYMENTS_PENDING.dec();
        VALUE_RELEASED
            .with_label_values(&["claim"])
            .inc_by(metric_value(amount));

        log_payment_event!(info, COMPONENT, "Payment claimed", payment_id, amount = %amount);

        self.emit(
            correlation_id,
            now,
            RemittanceEvent::Claimed {
                payment_id,
                intermediary: caller,
                amount,
            },
        );

        Ok(amount)
    }

    #[instrument(skip(self), fields(correlation_id = %correlation_id, caller = %caller, payment_id = %payment_id))]
    async fn do_refund(
        &self,
        correlation_id: Uuid,
        caller: Address,
        payment_id: PaymentId,
    ) -> Result<U256, RemittanceError> {
        let state = self.state.lock().await;
        let now = self.clock.now();

        let prior = self.store.get(&payment_id)?;
        let mut record = prior.clone();
        let amount = ledger::refund(
            &state.context(self.instance, now),
            payment_id,
            record.as_mut(),
            caller,
        )?;
        let (Some(prior), Some(updated)) = (prior, record) else {
            return Err(RemittanceError::PaymentNotFound(payment_id));
        };

        self.settle(prior, updated, caller, amount).await?;

        self.stats.write().refunds += 1;
        PAYMENTS_REFUNDED.inc();
        PAYMENTS_PENDING.dec();
        VALUE_RELEASED
            .with_label_values(&["refund"])
            .inc_by(metric_value(amount));

        log_payment_event!(info, COMPONENT, "Payment refunded", payment_id, amount = %amount);

        self.emit(
            correlation_id,
            now,
            RemittanceEvent::Refunded {
                payment_id,
                payer: caller,
                amount,
            },
        );

        Ok(amount)
    }

    #[instrument(skip(self, new_hash), fields(correlation_id = %correlation_id, caller = %caller, payment_id = %payment_id))]
    async fn do_change_password(
        &self,
        correlation_id: Uuid,
        caller: Address,
        payment_id: PaymentId,
        field: SecretField,
        new_hash: Hash,
    ) -> Result<(), RemittanceError> {
        let state = self.state.lock().await;
        let now = self.clock.now();

        let mut record = self.store.get(&payment_id)?;
        ledger::change_password(
            &state.context(self.instance, now),
            payment_id,
            record.as_mut(),
            caller,
            field,
            new_hash,
        )?;
        let updated = record.ok_or(RemittanceError::PaymentNotFound(payment_id))?;
        self.store.put(updated)?;

        self.stats.write().password_changes += 1;
        log_payment_event!(info, COMPONENT, "Password changed", payment_id, field = %field);

        self.emit(
            correlation_id,
            now,
            RemittanceEvent::PasswordChanged { payment_id, field },
        );
        Ok(())
    }

    /// Persist the resolved record, then move value out of custody.
    ///
    /// On transfer failure the prior record is written back.
    async fn settle(
        &self,
        prior: Payment,
        updated: Payment,
        recipient: Address,
        amount: U256,
    ) -> Result<(), RemittanceError> {
        let id = prior.id;
        self.store.put(updated)?;

        if let Err(transfer) = self.treasury.send(recipient, amount).await {
            if let Err(restore) = self.store.put(prior) {
                error!(
                    payment_id = %id,
                    error = %restore,
                    "Failed to restore payment after rejected transfer"
                );
                return Err(restore.into());
            }
            return Err(transfer.into());
        }
        Ok(())
    }

    // =========================================================================
    // ADMINISTRATION
    // =========================================================================

    /// Run an owner operation under the lock and publish its event.
    async fn administer<F>(
        &self,
        operation: &'static str,
        caller: Address,
        apply: F,
    ) -> Result<(), RemittanceError>
    where
        F: FnOnce(&mut ContractState) -> Result<RemittanceEvent, RemittanceError> + Send,
    {
        let correlation_id = Uuid::new_v4();
        let _timer = OperationTimer::start(operation);

        let mut state = self.state.lock().await;
        let event = state
            .access
            .require_admin(caller)
            .and_then(|()| apply(&mut *state))
            .map_err(|e| self.rejected(operation, correlation_id, e))?;

        self.stats.write().admin_changes += 1;
        log_event!(
            info,
            COMPONENT,
            "Owner operation applied",
            operation = operation,
            event = event.name(),
            correlation_id = %correlation_id
        );

        self.emit(correlation_id, self.clock.now(), event);
        Ok(())
    }

    // =========================================================================
    // SUPPORT
    // =========================================================================

    fn emit(&self, correlation_id: Uuid, timestamp: u64, event: RemittanceEvent) {
        self.events
            .publish(EventEnvelope::new(correlation_id, timestamp, event));
    }

    fn rejected(
        &self,
        operation: &'static str,
        correlation_id: Uuid,
        err: RemittanceError,
    ) -> RemittanceError {
        self.stats.write().rejected += 1;
        record_rejection(operation, err.code());
        log_event!(
            warn,
            COMPONENT,
            "Operation rejected",
            operation = operation,
            code = err.code(),
            correlation_id = %correlation_id,
            error = %err
        );
        err
    }
}

/// Amount as a metric sample, saturating above `u128::MAX`.
fn metric_value(amount: U256) -> f64 {
    if amount > U256::from(u128::MAX) {
        f64::MAX
    } else {
        amount.as_u128() as f64
    }
}

/// Run a value-moving operation on its own task and wait for it.
///
/// The task keeps running if the caller is dropped.
async fn detached<R, F>(operation: F) -> Result<R, RemittanceError>
where
    R: Send + 'static,
    F: Future<Output = Result<R, RemittanceError>> + Send + 'static,
{
    tokio::spawn(operation.in_current_span())
        .await
        .map_err(|e| RemittanceError::TaskFailed(e.to_string()))?
}

#[async_trait]
impl<S, T, C, E> RemittanceApi for RemittanceService<S, T, C, E>
where
    S: PaymentStore,
    T: Treasury,
    C: Clock,
    E: EventSink,
{
    async fn deposit(
        &self,
        caller: Address,
        value: U256,
        request: DepositRequest,
    ) -> Result<PaymentId, RemittanceError> {
        let core = Arc::clone(&self.core);
        detached(async move {
            let correlation_id = Uuid::new_v4();
            let _timer = OperationTimer::start("deposit");
            core.do_deposit(correlation_id, caller, value, request)
                .await
                .map_err(|e| core.rejected("deposit", correlation_id, e))
        })
        .await
    }

    async fn claim(
        &self,
        caller: Address,
        payment_id: PaymentId,
        payee_password: Password,
        intermediary_password: Password,
    ) -> Result<U256, RemittanceError> {
        let core = Arc::clone(&self.core);
        detached(async move {
            let correlation_id = Uuid::new_v4();
            let _timer = OperationTimer::start("claim");
            core.do_claim(
                correlation_id,
                caller,
                payment_id,
                &payee_password,
                &intermediary_password,
            )
            .await
            .map_err(|e| core.rejected("claim", correlation_id, e))
        })
        .await
    }

    async fn refund(
        &self,
        caller: Address,
        payment_id: PaymentId,
    ) -> Result<U256, RemittanceError> {
        let core = Arc::clone(&self.core);
        detached(async move {
            let correlation_id = Uuid::new_v4();
            let _timer = OperationTimer::start("refund");
            core.do_refund(correlation_id, caller, payment_id)
                .await
                .map_err(|e| core.rejected("refund", correlation_id, e))
        })
        .await
    }

    async fn change_payee_password(
        &self,
        caller: Address,
        payment_id: PaymentId,
        new_hash: Hash,
    ) -> Result<(), RemittanceError> {
        let correlation_id = Uuid::new_v4();
        let _timer = OperationTimer::start("change_payee_password");
        self.core
            .do_change_password(correlation_id, caller, payment_id, SecretField::Payee, new_hash)
            .await
            .map_err(|e| self.core.rejected("change_payee_password", correlation_id, e))
    }

    async fn change_intermediary_password(
        &self,
        caller: Address,
        payment_id: PaymentId,
        new_hash: Hash,
    ) -> Result<(), RemittanceError> {
        let correlation_id = Uuid::new_v4();
        let _timer = OperationTimer::start("change_intermediary_password");
        self.core
            .do_change_password(
                correlation_id,
                caller,
                payment_id,
                SecretField::Intermediary,
                new_hash,
            )
            .await
            .map_err(|e| self.core.rejected("change_intermediary_password", correlation_id, e))
    }

    async fn change_commission(
        &self,
        caller: Address,
        commission: U256,
    ) -> Result<(), RemittanceError> {
        self.core.administer("change_commission", caller, move |state| {
            let previous = state.registry.set_commission(commission);
            Ok(RemittanceEvent::CommissionChanged {
                previous,
                current: commission,
            })
        })
        .await
    }

    async fn change_deadline_delta(&self, caller: Address, secs: u64) -> Result<(), RemittanceError> {
        self.core.administer("change_deadline_delta", caller, move |state| {
            let previous = state.registry.set_deadline_delta(secs)?;
            Ok(RemittanceEvent::DeadlineDeltaChanged {
                previous,
                current: secs,
            })
        })
        .await
    }

    async fn change_refund_window(
        &self,
        caller: Address,
        secs: Option<u64>,
    ) -> Result<(), RemittanceError> {
        self.core.administer("change_refund_window", caller, move |state| {
            let previous = state.registry.set_refund_window(secs);
            Ok(RemittanceEvent::RefundWindowChanged {
                previous,
                current: secs,
            })
        })
        .await
    }

    async fn pause(&self, caller: Address) -> Result<(), RemittanceError> {
        self.core.administer("pause", caller, move |state| {
            state.access.pause(caller)?;
            Ok(RemittanceEvent::Paused { by: caller })
        })
        .await
    }

    async fn resume(&self, caller: Address) -> Result<(), RemittanceError> {
        self.core.administer("resume", caller, move |state| {
            state.access.resume(caller)?;
            Ok(RemittanceEvent::Resumed { by: caller })
        })
        .await
    }

    async fn kill(&self, caller: Address) -> Result<(), RemittanceError> {
        self.core.administer("kill", caller, move |state| {
            state.access.kill(caller)?;
            Ok(RemittanceEvent::Killed { by: caller })
        })
        .await
    }

    async fn commission(&self) -> U256 {
        self.core.state.lock().await.registry.commission()
    }

    async fn deadline_delta(&self) -> u64 {
        self.core.state.lock().await.registry.deadline_delta()
    }

    async fn refund_window(&self) -> Option<u64> {
        self.core.state.lock().await.registry.refund_window()
    }

    async fn is_paused(&self) -> bool {
        self.core.state.lock().await.access.is_paused()
    }

    async fn is_killed(&self) -> bool {
        self.core.state.lock().await.access.is_killed()
    }

    async fn owner(&self) -> Address {
        self.core.state.lock().await.access.owner()
    }

    async fn collected_commission(&self) -> U256 {
        self.core.state.lock().await.collected_commission
    }

    async fn payment(&self, payment_id: PaymentId) -> Result<Option<Payment>, RemittanceError> {
        let _state = self.core.state.lock().await;
        Ok(self.core.store.get(&payment_id)?)
    }

    fn compute_id(
        &self,
        intermediary: Address,
        payee_password: &Password,
        intermediary_password: &Password,
    ) -> PaymentId {
        compute_id_from_passwords(
            &intermediary,
            payee_password,
            intermediary_password,
            &self.core.instance,
        )
    }
}
