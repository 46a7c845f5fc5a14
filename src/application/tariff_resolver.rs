//! Tariff Resolver (C2, §4.2): resolves the unit price at a point in time
//! and replays a transaction's meter samples into a segmented cost bill.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;

use crate::domain::tariff::{self, TariffSegment};
use crate::domain::meter_sample::{self, MeterSample};
use crate::domain::repository::TariffRepository;
use crate::shared::DomainResult;

/// The local time zone segment boundaries are defined against (§4.2: "Asia/Taipei in the reference").
pub const LOCAL_TIMEZONE: Tz = chrono_tz::Asia::Taipei;

/// One bucket of `SegmentedCost`: energy and cost attributed to a single
/// tariff segment across the transaction's lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct CostSegment {
    pub date: chrono::NaiveDate,
    pub start_minute: u16,
    pub end_minute: u16,
    pub price: Decimal,
    pub energy_kwh: Decimal,
    pub cost: Decimal,
}

#[derive(Debug, Clone, Default)]
pub struct SegmentedCost {
    pub total: Decimal,
    pub segments: Vec<CostSegment>,
}

pub struct TariffResolver {
    tariffs: Arc<dyn TariffRepository>,
}

impl TariffResolver {
    pub fn new(tariffs: Arc<dyn TariffRepository>) -> Self {
        Self { tariffs }
    }

    /// `PriceAt(timestamp) -> price` (§4.2).
    pub async fn price_at(&self, timestamp: DateTime<Utc>) -> DomainResult<Decimal> {
        let local = timestamp.with_timezone(&LOCAL_TIMEZONE);
        let minute_of_day = (local.format("%H").to_string().parse::<u16>().unwrap_or(0)) * 60
            + local.format("%M").to_string().parse::<u16>().unwrap_or(0);
        let date = local.date_naive();

        let today = self.tariffs.segments_for_date(date).await?;
        if let Some(price) = tariff::resolve_highest_price(&today, minute_of_day) {
            return Ok(price);
        }

        // Cross-midnight segments filed under the prior date still cover us today (§4.2).
        let prior_date = date.pred_opt().unwrap_or(date);
        let prior = self.tariffs.segments_for_date(prior_date).await?;
        if let Some(price) = tariff::resolve_highest_price(&prior, minute_of_day) {
            return Ok(price);
        }

        Ok(self.tariffs.default_price().await.unwrap_or(tariff::DEFAULT_PRICE))
    }

    /// `SegmentedCost(transactionId) -> (total, segments[])` (§4.2).
    ///
    /// Replays `samples` (already ordered by timestamp, anomalous jumps
    /// excluded per §4.7 step 4) and attributes each adjacent positive
    /// energy delta to the tariff segment active at the later timestamp,
    /// accumulating per `(date, start, end, price)` bucket.
    pub async fn segmented_cost(
        &self,
        samples: &[MeterSample],
        meter_start: i64,
    ) -> DomainResult<SegmentedCost> {
        let mut result = SegmentedCost::default();
        let mut prev_total_kwh = meter_start as f64 / 1000.0;

        let energy_samples = meter_sample::filter_anomalous_jumps(samples, meter_start);

        for sample in energy_samples {
            let total_kwh = sample.total_kwh();
            let delta_kwh_f64 = total_kwh - prev_total_kwh;
            prev_total_kwh = total_kwh;
            if delta_kwh_f64 <= 0.0 {
                continue;
            }
            let delta_kwh = Decimal::try_from(delta_kwh_f64).unwrap_or(Decimal::ZERO);

            let local = sample.timestamp.with_timezone(&LOCAL_TIMEZONE);
            let minute_of_day = (local.format("%H").to_string().parse::<u16>().unwrap_or(0)) * 60
                + local.format("%M").to_string().parse::<u16>().unwrap_or(0);
            let date = local.date_naive();

            let segments = self.tariffs.segments_for_date(date).await?;
            let matched = segments.iter().filter(|s| s.matches_minute(minute_of_day)).max_by_key(|s| s.price);

            let (start_minute, end_minute, price) = match matched {
                Some(seg) => (seg.start_minute, seg.end_minute, seg.price),
                None => (0, tariff::END_OF_DAY_MINUTE, self.tariffs.default_price().await.unwrap_or(tariff::DEFAULT_PRICE)),
            };

            let cost = delta_kwh * price;
            result.total += cost;

            if let Some(bucket) = result
                .segments
                .iter_mut()
                .find(|b| b.date == date && b.start_minute == start_minute && b.end_minute == end_minute && b.price == price)
            {
                bucket.energy_kwh += delta_kwh;
                bucket.cost += cost;
            } else {
                result.segments.push(CostSegment {
                    date,
                    start_minute,
                    end_minute,
                    price,
                    energy_kwh: delta_kwh,
                    cost,
                });
            }
        }

        Ok(result)
    }
}

/// Normalizes a dummy timestamp into the configured local zone — exposed for
/// callers (Live Status Cache, HTTP reporting) that need the same convention
/// without going through `price_at`.
pub fn to_local(timestamp: DateTime<Utc>) -> DateTime<Tz> {
    timestamp.with_timezone(&LOCAL_TIMEZONE)
}

/// Builds a UTC timestamp from a local wall-clock time in the configured
/// zone; used by tests and seed scenarios.
#[cfg(test)]
fn local_ymd_hms(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
    LOCAL_TIMEZONE
        .with_ymd_and_hms(y, mo, d, h, mi, s)
        .single()
        .unwrap()
        .with_timezone(&Utc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repository::TariffRepository;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    struct FixedTariffRepository {
        segments: Mutex<Vec<TariffSegment>>,
    }

    #[async_trait]
    impl TariffRepository for FixedTariffRepository {
        async fn segments_for_date(&self, date: NaiveDate) -> DomainResult<Vec<TariffSegment>> {
            Ok(self
                .segments
                .lock()
                .unwrap()
                .iter()
                .filter(|s| s.date == date)
                .cloned()
                .collect())
        }
        async fn all_segments(&self) -> DomainResult<Vec<TariffSegment>> {
            Ok(self.segments.lock().unwrap().clone())
        }
        async fn add_segment(&self, segment: TariffSegment) -> DomainResult<()> {
            self.segments.lock().unwrap().push(segment);
            Ok(())
        }
        async fn delete_segments_for_date(&self, date: NaiveDate) -> DomainResult<()> {
            self.segments.lock().unwrap().retain(|s| s.date != date);
            Ok(())
        }
        async fn default_price(&self) -> DomainResult<Decimal> {
            Ok(tariff::DEFAULT_PRICE)
        }
    }

    fn seg(date: NaiveDate, start: &str, end: &str, price: Decimal) -> TariffSegment {
        TariffSegment {
            date,
            start_minute: tariff::parse_hhmm(start).unwrap(),
            end_minute: tariff::parse_hhmm(end).unwrap(),
            price,
            label: None,
        }
    }

    #[tokio::test]
    async fn falls_back_to_prior_date_for_cross_midnight_segment() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
        let prior = date.pred_opt().unwrap();
        let repo = FixedTariffRepository {
            segments: Mutex::new(vec![seg(prior, "22:00", "06:00", dec!(2.0))]),
        };
        let resolver = TariffResolver::new(Arc::new(repo));

        let ts = local_ymd_hms(2024, 6, 2, 1, 0, 0);
        let price = resolver.price_at(ts).await.unwrap();
        assert_eq!(price, dec!(2.0));
    }

    #[tokio::test]
    async fn falls_back_to_default_price_when_nothing_matches() {
        let repo = FixedTariffRepository {
            segments: Mutex::new(vec![]),
        };
        let resolver = TariffResolver::new(Arc::new(repo));
        let price = resolver.price_at(Utc::now()).await.unwrap();
        assert_eq!(price, tariff::DEFAULT_PRICE);
    }
}
