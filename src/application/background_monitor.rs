//! Background Monitor (C9, §4.9): a periodic safety net that catches any
//! active transaction whose card balance has fallen to zero or below
//! without the Billing Streamer's auto-stop having caught it (MeterValues
//! silence, clock drift).

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::application::transaction_engine::SharedTransactionEngine;
use crate::domain::repository::RepositoryProvider;
use crate::shared::shutdown::ShutdownSignal;

/// How often the sweep runs (§4.9: "every 5 seconds").
const SWEEP_INTERVAL_SECS: u64 = 5;

pub struct BackgroundMonitor {
    repositories: Arc<dyn RepositoryProvider>,
    transaction_engine: SharedTransactionEngine,
}

pub type SharedBackgroundMonitor = Arc<BackgroundMonitor>;

impl BackgroundMonitor {
    pub fn new(repositories: Arc<dyn RepositoryProvider>, transaction_engine: SharedTransactionEngine) -> Self {
        Self {
            repositories,
            transaction_engine,
        }
    }

    pub fn shared(repositories: Arc<dyn RepositoryProvider>, transaction_engine: SharedTransactionEngine) -> SharedBackgroundMonitor {
        Arc::new(Self::new(repositories, transaction_engine))
    }

    /// Spawns the sweep loop, exiting once `shutdown` fires.
    pub fn start(self: Arc<Self>, shutdown: ShutdownSignal) {
        tokio::spawn(async move {
            info!(interval_secs = SWEEP_INTERVAL_SECS, "background monitor started");
            let mut interval = tokio::time::interval(Duration::from_secs(SWEEP_INTERVAL_SECS));

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        self.sweep().await;
                    }
                    _ = shutdown.wait() => {
                        info!("background monitor shutting down");
                        break;
                    }
                }
            }
        });
    }

    /// One sweep of every active transaction (§4.9).
    async fn sweep(&self) {
        let active = match self.repositories.transactions().find_all_active().await {
            Ok(txs) => txs,
            Err(e) => {
                warn!(error = %e, "background monitor failed to list active transactions");
                return;
            }
        };

        for tx in active {
            if self.transaction_engine.stop_already_requested(tx.id) {
                continue;
            }

            let balance = match self.repositories.cards().find_by_id(&tx.id_tag).await {
                Ok(Some(card)) => card.balance,
                Ok(None) => Decimal::ZERO,
                Err(e) => {
                    warn!(charge_point_id = %tx.charge_point_id, transaction_id = tx.id, error = %e, "failed to read card balance during sweep");
                    continue;
                }
            };

            if balance <= Decimal::ZERO {
                let engine = Arc::clone(&self.transaction_engine);
                let charge_point_id = tx.charge_point_id.clone();
                let transaction_id = tx.id;
                info!(charge_point_id = %charge_point_id, transaction_id, %balance, "balance exhausted, issuing server-initiated stop");
                tokio::spawn(async move {
                    if let Err(e) = engine.server_initiated_stop(&charge_point_id).await {
                        warn!(charge_point_id = %charge_point_id, transaction_id, error = %e, "background monitor stop failed");
                    }
                });
            }
        }
    }
}
