//! Billing Streamer (C7, §4.7): turns each inbound MeterValues sample into a
//! persisted reading, a refreshed Live Status snapshot, and an incremental
//! debit against the owning card — with an auto-stop safety valve when the
//! balance runs out.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{info, warn};

use crate::application::live_status::{LiveStatus, SharedLiveStatusCache};
use crate::application::tariff_resolver::TariffResolver;
use crate::application::transaction_engine::SharedTransactionEngine;
use crate::domain::meter_sample::{self, MeterSample};
use crate::domain::repository::RepositoryProvider;
use crate::shared::DomainResult;

/// Minimum cost delta worth debiting, to avoid chattering on sub-cent
/// rounding noise (§4.7 step 6: "ε≈0.0005 currency").
const DEBIT_EPSILON: Decimal = dec!(0.0005);

/// One sampled value as parsed off the wire, prior to persistence.
#[derive(Debug, Clone)]
pub struct IncomingSample {
    pub measurand: String,
    pub unit: Option<String>,
    pub value: f64,
    pub phase: Option<String>,
}

pub struct BillingStreamer {
    repositories: Arc<dyn RepositoryProvider>,
    live_status: SharedLiveStatusCache,
    tariff_resolver: Arc<TariffResolver>,
    transaction_engine: SharedTransactionEngine,
}

pub type SharedBillingStreamer = Arc<BillingStreamer>;

impl BillingStreamer {
    pub fn new(
        repositories: Arc<dyn RepositoryProvider>,
        live_status: SharedLiveStatusCache,
        tariff_resolver: Arc<TariffResolver>,
        transaction_engine: SharedTransactionEngine,
    ) -> Self {
        Self {
            repositories,
            live_status,
            tariff_resolver,
            transaction_engine,
        }
    }

    pub fn shared(
        repositories: Arc<dyn RepositoryProvider>,
        live_status: SharedLiveStatusCache,
        tariff_resolver: Arc<TariffResolver>,
        transaction_engine: SharedTransactionEngine,
    ) -> SharedBillingStreamer {
        Arc::new(Self::new(repositories, live_status, tariff_resolver, transaction_engine))
    }

    /// Processes one MeterValues CALL's worth of samples, all sharing a
    /// single timestamp and connector (§4.7 steps 1-7).
    pub async fn ingest(
        &self,
        charge_point_id: &str,
        connector_id: i32,
        transaction_id: Option<i64>,
        timestamp: DateTime<Utc>,
        samples: &[IncomingSample],
    ) -> DomainResult<()> {
        // Step 1: resolve the owning transaction.
        let tx = match transaction_id {
            Some(id) => self.repositories.transactions().find_by_id(id).await?,
            None => None,
        };
        let tx = match tx {
            Some(t) => Some(t),
            None => {
                self.repositories
                    .transactions()
                    .find_active_for_connector(charge_point_id, connector_id)
                    .await?
            }
        };

        // Step 2: persist every sample, regardless of whether a transaction owns it.
        let tx_id = tx.as_ref().map(|t| t.id).unwrap_or(0);
        for sample in samples {
            self.repositories
                .transactions()
                .insert_meter_sample(MeterSample {
                    transaction_id: tx_id,
                    charge_point_id: charge_point_id.to_string(),
                    connector_id,
                    timestamp,
                    measurand: sample.measurand.clone(),
                    unit: sample.unit.clone(),
                    value: sample.value,
                    phase: sample.phase.clone(),
                })
                .await?;
        }

        // Step 3: update the Live Status Cache's electrical readings.
        self.update_electrical_readings(charge_point_id, samples);

        let Some(tx) = tx else {
            return Ok(());
        };

        // Step 4: anomaly-filtered session energy.
        let existing_samples = self.repositories.transactions().meter_samples_for(tx.id).await?;
        let Some(session_kwh) = self.derive_session_kwh(&existing_samples, tx.meter_start) else {
            return Ok(());
        };

        // Step 5: cost so far via the full segmented replay.
        let segmented = self.tariff_resolver.segmented_cost(&existing_samples, tx.meter_start).await?;
        let price_now = self.tariff_resolver.price_at(timestamp).await?;

        self.live_status.upsert_with(charge_point_id, |status| {
            status.energy_kwh = Decimal::try_from(session_kwh).unwrap_or(status.energy_kwh);
            status.estimated_energy_kwh = status.energy_kwh;
            status.estimated_amount = segmented.total;
            status.price_per_kwh = price_now;
            status.last_sample_at = Some(timestamp);
        });

        // Step 6: incremental debit.
        let cursor = self.repositories.transactions().get_realtime_deduction(tx.id).await?;
        let already_debited = cursor.as_ref().map(|c| c.debited_amount).unwrap_or(Decimal::ZERO);
        let balance_before = self
            .repositories
            .cards()
            .find_by_id(&tx.id_tag)
            .await?
            .map(|c| c.balance)
            .unwrap_or(Decimal::ZERO);

        let mut new_balance = balance_before;
        if segmented.total > already_debited + DEBIT_EPSILON {
            let (_, balance_after) = self
                .repositories
                .cards()
                .debit_with_cursor(&tx.id_tag, tx.id, session_kwh_decimal(session_kwh), segmented.total)
                .await?;
            new_balance = balance_after;
            info!(
                charge_point_id,
                transaction_id = tx.id,
                cost_so_far = %segmented.total,
                balance = %new_balance,
                "incremental debit applied"
            );
        }

        // Step 7: auto-stop if the balance is exhausted (or about to be).
        let projected_exhausted = new_balance <= Decimal::ZERO || segmented.total >= balance_before;
        if projected_exhausted && !self.transaction_engine.stop_already_requested(tx.id) {
            let engine = Arc::clone(&self.transaction_engine);
            let cp_id = charge_point_id.to_string();
            let transaction_id = tx.id;
            tokio::spawn(async move {
                // `server_initiated_stop` owns the dedup flag end-to-end, clearing it
                // on send failure so a later sample can retry (§4.7 step 7).
                if let Err(e) = engine.server_initiated_stop(&cp_id).await {
                    warn!(charge_point_id = %cp_id, transaction_id, error = %e, "auto-stop failed to complete");
                }
            });
        }

        Ok(())
    }

    fn update_electrical_readings(&self, charge_point_id: &str, samples: &[IncomingSample]) {
        let voltage = find_measurand(samples, "Voltage").map(|s| s.value);
        let current = find_measurand(samples, "Current.Import").map(|s| s.value);
        let power = find_measurand(samples, "Power.Active.Import").map(|s| normalize_power(s));

        if voltage.is_none() && current.is_none() && power.is_none() {
            return;
        }

        self.live_status.upsert_with(charge_point_id, |status: &mut LiveStatus| {
            if let Some(v) = voltage {
                status.voltage = v;
            }
            if let Some(i) = current {
                status.current = i;
            }
            match power {
                Some(p) => {
                    status.power_kw = p;
                    status.derived = false;
                }
                None => {
                    if let (Some(v), Some(i)) = (voltage, current) {
                        status.power_kw = v * i / 1000.0;
                        status.derived = true;
                    }
                }
            }
        });
    }

    /// §4.7 step 4: derives cumulative session kWh from the anomaly-filtered
    /// sample chain. If the most recent sample itself was dropped as an
    /// anomalous jump, this tick is skipped entirely (the sample stays
    /// excluded from every later cost computation via
    /// `meter_sample::filter_anomalous_jumps`, not just this tick).
    fn derive_session_kwh(&self, samples: &[MeterSample], meter_start: i64) -> Option<f64> {
        let accepted = meter_sample::filter_anomalous_jumps(samples, meter_start);
        let latest_accepted = accepted.last()?;

        let latest_raw = samples.iter().filter(|s| s.is_energy_register()).max_by_key(|s| s.timestamp)?;
        if latest_accepted.timestamp != latest_raw.timestamp {
            warn!(
                charge_point_id = latest_raw.charge_point_id.as_str(),
                "dropping anomalous meter sample jump"
            );
            return None;
        }

        Some((latest_accepted.total_kwh() - meter_start as f64 / 1000.0).max(0.0))
    }
}

fn find_measurand<'a>(samples: &'a [IncomingSample], measurand: &str) -> Option<&'a IncomingSample> {
    samples.iter().find(|s| s.measurand.eq_ignore_ascii_case(measurand))
}

fn normalize_power(sample: &IncomingSample) -> f64 {
    match sample.unit.as_deref() {
        Some(u) if u.eq_ignore_ascii_case("W") => sample.value / 1000.0,
        _ => sample.value,
    }
}

fn session_kwh_decimal(v: f64) -> Decimal {
    Decimal::try_from(v).unwrap_or(Decimal::ZERO)
}
