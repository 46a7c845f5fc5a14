//! Transaction Engine (C6, §4.6): the atomic start/stop state machine for a
//! charging session, plus the server-initiated stop protocol used by the
//! HTTP control surface, the Billing Streamer's auto-stop, and the
//! Background Monitor's safety net.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;
use tokio::sync::oneshot;
use tokio::time::timeout;
use tracing::{info, warn};

use crate::application::commands::{remote_stop_transaction, CommandSender};
use crate::application::live_status::SharedLiveStatusCache;
use crate::application::smart_charging::{SharePolicyResult, SharedSmartChargingCoordinator};
use crate::application::tariff_resolver::TariffResolver;
use crate::domain::id_tag::AuthorizationStatus;
use crate::domain::repository::RepositoryProvider;
use crate::domain::transaction::{allocate_transaction_id, Transaction};
use crate::domain::whitelist;
use crate::shared::{DomainError, DomainResult};

/// How long the server waits for a CP's own StopTransaction after sending a
/// RemoteStopTransaction before giving up (§4.6: "waits up to 15 s").
const SERVER_STOP_WAIT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, PartialEq)]
pub enum StartDecision {
    Accepted { transaction_id: i64 },
    /// IdTag unknown, expired, or CardWhitelist excludes this CP.
    Invalid,
    /// IdTag explicitly blocked, card balance non-positive, or Smart
    /// Charging admission would starve an existing session.
    Blocked,
}

pub struct TransactionEngine {
    repositories: Arc<dyn RepositoryProvider>,
    live_status: SharedLiveStatusCache,
    smart_charging: SharedSmartChargingCoordinator,
    tariff_resolver: Arc<TariffResolver>,
    command_sender: Arc<CommandSender>,
    /// Completion futures for StopTransaction, keyed by transaction id —
    /// fulfilled by `stop_transaction` and awaited by `server_initiated_stop`.
    pending_stops: DashMap<i64, oneshot::Sender<()>>,
    /// Auto-stop dedup set (§4.7 step 7, §4.9): prevents issuing a second
    /// RemoteStopTransaction for a transaction already being stopped.
    stop_requested: DashMap<i64, ()>,
}

pub type SharedTransactionEngine = Arc<TransactionEngine>;

impl TransactionEngine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        repositories: Arc<dyn RepositoryProvider>,
        live_status: SharedLiveStatusCache,
        smart_charging: SharedSmartChargingCoordinator,
        tariff_resolver: Arc<TariffResolver>,
        command_sender: Arc<CommandSender>,
    ) -> Self {
        Self {
            repositories,
            live_status,
            smart_charging,
            tariff_resolver,
            command_sender,
            pending_stops: DashMap::new(),
            stop_requested: DashMap::new(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn shared(
        repositories: Arc<dyn RepositoryProvider>,
        live_status: SharedLiveStatusCache,
        smart_charging: SharedSmartChargingCoordinator,
        tariff_resolver: Arc<TariffResolver>,
        command_sender: Arc<CommandSender>,
    ) -> SharedTransactionEngine {
        Arc::new(Self::new(
            repositories,
            live_status,
            smart_charging,
            tariff_resolver,
            command_sender,
        ))
    }

    /// Start path (§4.6 steps 1-7).
    pub async fn start_transaction(
        &self,
        charge_point_id: &str,
        connector_id: i32,
        id_tag: &str,
        meter_start: i64,
        timestamp: DateTime<Utc>,
    ) -> DomainResult<StartDecision> {
        // Step 1: IdTag must exist and be Accepted.
        let Some(tag) = self.repositories.id_tags().find_by_id(id_tag).await? else {
            return Ok(StartDecision::Invalid);
        };
        match tag.effective_status(Utc::now()) {
            AuthorizationStatus::Accepted => {}
            AuthorizationStatus::Blocked => return Ok(StartDecision::Blocked),
            AuthorizationStatus::Expired | AuthorizationStatus::Invalid => {
                return Ok(StartDecision::Invalid)
            }
        }

        let rules = self.repositories.id_tags().whitelist_for(id_tag).await?;
        if !whitelist::is_allowed(&rules, charge_point_id) {
            return Ok(StartDecision::Blocked);
        }

        // Step 2: Card must exist with a strictly positive balance.
        let Some(card) = self.repositories.cards().find_by_id(id_tag).await? else {
            return Ok(StartDecision::Blocked);
        };
        if !card.has_positive_balance() {
            return Ok(StartDecision::Blocked);
        }

        // Step 3: Smart Charging admission (community-wide active count).
        let active_count = self.repositories.transactions().find_all_active().await?.len() as u32;
        let settings = self.repositories.community_settings().get().await?;
        if settings.enabled {
            let policy = self.smart_charging.check_admission(active_count + 1).await?;
            if policy == SharePolicyResult::Blocked {
                return Ok(StartDecision::Blocked);
            }
        }

        // Step 4: allocate id, insert transaction.
        let transaction_id = allocate_transaction_id();
        let tx = Transaction::new(transaction_id, charge_point_id, connector_id, id_tag, meter_start, timestamp);
        self.repositories.transactions().insert(tx).await?;

        // Step 5: fresh Live Status Cache.
        self.live_status.clear(charge_point_id);

        info!(charge_point_id, connector_id, transaction_id, id_tag, "transaction started");

        // Step 7: rebalance asynchronously (never blocks the reply).
        let coordinator = Arc::clone(&self.smart_charging);
        tokio::spawn(async move {
            coordinator.rebalance("transaction-start").await;
        });

        Ok(StartDecision::Accepted { transaction_id })
    }

    /// Stop path (§4.6 steps 1-9). Returns the final cost on success.
    pub async fn stop_transaction(
        &self,
        transaction_id: i64,
        meter_stop: i64,
        timestamp: DateTime<Utc>,
        reason: Option<String>,
    ) -> DomainResult<Decimal> {
        let Some(tx) = self.repositories.transactions().find_by_id(transaction_id).await? else {
            return Err(DomainError::NotFound {
                entity: "Transaction",
                field: "id",
                value: transaction_id.to_string(),
            });
        };

        // Step 3: final cost, preferring the full segmented replay.
        let samples = self.repositories.transactions().meter_samples_for(transaction_id).await?;
        let segmented = self.tariff_resolver.segmented_cost(&samples, tx.meter_start).await?;
        let final_cost = if segmented.total > Decimal::ZERO {
            segmented.total
        } else {
            let energy_kwh = Decimal::from(meter_stop - tx.meter_start) / Decimal::from(1000);
            let price = self.tariff_resolver.price_at(timestamp).await?;
            (price * energy_kwh).max(Decimal::ZERO)
        };

        // Steps 2, 4-6: atomic close (StopRecord + Transaction update + residual debit + Payment + cursor delete).
        let payment = self
            .repositories
            .transactions()
            .close_transaction(transaction_id, meter_stop, timestamp, reason, final_cost, &tx.id_tag)
            .await?;

        // Step 7: fulfill any pending server-initiated-stop future.
        if let Some((_, tx_sender)) = self.pending_stops.remove(&transaction_id) {
            let _ = tx_sender.send(());
        }
        self.stop_requested.remove(&transaction_id);

        // Step 8: clear the Live Status Cache, carrying over cumulative energy.
        self.live_status.reset_carrying_energy(&tx.charge_point_id);

        info!(
            charge_point_id = %tx.charge_point_id,
            transaction_id,
            total_amount = %payment.total_amount,
            "transaction stopped"
        );

        // Step 9: rebalance asynchronously.
        let coordinator = Arc::clone(&self.smart_charging);
        tokio::spawn(async move {
            coordinator.rebalance("transaction-stop").await;
        });

        Ok(payment.total_amount)
    }

    /// Server-initiated stop (§4.6 "Server-initiated stop"): looks up the
    /// active transaction for `charge_point_id`, registers a completion
    /// future, sends RemoteStopTransaction, and waits up to 15 s for the
    /// CP's own StopTransaction to arrive and fulfill it.
    ///
    /// Idempotent against a concurrent auto-stop/background-monitor trigger
    /// for the same transaction (§4.7 step 7, §4.9): a second caller observes
    /// the dedup flag and simply waits on the existing future.
    pub async fn server_initiated_stop(&self, charge_point_id: &str) -> DomainResult<()> {
        let Some(tx) = self
            .repositories
            .transactions()
            .find_active_for_charge_point(charge_point_id)
            .await?
        else {
            return Err(DomainError::NotFound {
                entity: "Transaction",
                field: "charge_point_id",
                value: charge_point_id.to_string(),
            });
        };

        if self.stop_requested.contains_key(&tx.id) {
            return Ok(()); // already in flight; let the original caller's wait own the timeout
        }

        let (sender, receiver) = oneshot::channel();
        self.pending_stops.insert(tx.id, sender);
        self.stop_requested.insert(tx.id, ());

        if let Err(e) = remote_stop_transaction(&self.command_sender, charge_point_id, tx.id).await {
            warn!(charge_point_id, transaction_id = tx.id, error = %e, "failed to send RemoteStopTransaction");
            self.pending_stops.remove(&tx.id);
            self.stop_requested.remove(&tx.id);
            return Err(e);
        }

        match timeout(SERVER_STOP_WAIT, receiver).await {
            Ok(_) => Ok(()),
            Err(_) => {
                warn!(charge_point_id, transaction_id = tx.id, "timed out waiting for StopTransaction");
                self.pending_stops.remove(&tx.id);
                Err(DomainError::Timeout)
            }
        }
    }

    /// Returns `true` if an auto-stop/server-initiated stop has already been
    /// requested for this transaction (used by the Billing Streamer's dedup
    /// check, §4.7 step 7).
    pub fn stop_already_requested(&self, transaction_id: i64) -> bool {
        self.stop_requested.contains_key(&transaction_id)
    }

    /// Dry-run of the admission chain (§6 debug endpoint): replays
    /// `start_transaction`'s steps 1-3 without inserting a Transaction row,
    /// so an operator can ask "would this idTag/CP pair be admitted right
    /// now?" without side effects.
    pub async fn dry_run_admission(&self, charge_point_id: &str, id_tag: &str) -> DomainResult<StartDecision> {
        let Some(tag) = self.repositories.id_tags().find_by_id(id_tag).await? else {
            return Ok(StartDecision::Invalid);
        };
        match tag.effective_status(Utc::now()) {
            AuthorizationStatus::Accepted => {}
            AuthorizationStatus::Blocked => return Ok(StartDecision::Blocked),
            AuthorizationStatus::Expired | AuthorizationStatus::Invalid => {
                return Ok(StartDecision::Invalid)
            }
        }

        let rules = self.repositories.id_tags().whitelist_for(id_tag).await?;
        if !whitelist::is_allowed(&rules, charge_point_id) {
            return Ok(StartDecision::Blocked);
        }

        let Some(card) = self.repositories.cards().find_by_id(id_tag).await? else {
            return Ok(StartDecision::Blocked);
        };
        if !card.has_positive_balance() {
            return Ok(StartDecision::Blocked);
        }

        let active_count = self.repositories.transactions().find_all_active().await?.len() as u32;
        let settings = self.repositories.community_settings().get().await?;
        if settings.enabled {
            let policy = self.smart_charging.check_admission(active_count + 1).await?;
            if policy == SharePolicyResult::Blocked {
                return Ok(StartDecision::Blocked);
            }
        }

        Ok(StartDecision::Accepted { transaction_id: 0 })
    }
}

