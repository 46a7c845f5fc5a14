//! Live Status Cache (C3, §4.3): per-CP in-memory snapshot of the current
//! electrical reading and running bill, with TTL-based staleness.

use std::sync::Arc;
use std::time::Instant;

use dashmap::DashMap;
use rust_decimal::Decimal;

const DEFAULT_TTL_SECS: u64 = 15;

/// One CP's live reading. `last_update` is a monotonic instant used only to
/// detect staleness; `last_sample_at` is the wall-clock time of the most
/// recent sample, returned to callers as-is.
#[derive(Debug, Clone)]
pub struct LiveStatus {
    pub voltage: f64,
    pub current: f64,
    pub power_kw: f64,
    pub energy_kwh: Decimal,
    pub estimated_energy_kwh: Decimal,
    pub estimated_amount: Decimal,
    pub price_per_kwh: Decimal,
    pub last_sample_at: Option<chrono::DateTime<chrono::Utc>>,
    /// True when `power_kw` was derived from V·I rather than reported directly (§4.7 step 3).
    pub derived: bool,
    last_update: Instant,
}

impl Default for LiveStatus {
    fn default() -> Self {
        Self {
            voltage: 0.0,
            current: 0.0,
            power_kw: 0.0,
            energy_kwh: Decimal::ZERO,
            estimated_energy_kwh: Decimal::ZERO,
            estimated_amount: Decimal::ZERO,
            price_per_kwh: Decimal::ZERO,
            last_sample_at: None,
            derived: false,
            last_update: Instant::now(),
        }
    }
}

pub struct LiveStatusCache {
    entries: DashMap<String, LiveStatus>,
    ttl_secs: u64,
}

pub type SharedLiveStatusCache = Arc<LiveStatusCache>;

impl LiveStatusCache {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            ttl_secs: DEFAULT_TTL_SECS,
        }
    }

    pub fn shared() -> SharedLiveStatusCache {
        Arc::new(Self::new())
    }

    /// Upserts the reading for `charge_point_id`, replacing every field.
    pub fn update(&self, charge_point_id: &str, status: LiveStatus) {
        self.entries.insert(
            charge_point_id.to_string(),
            LiveStatus {
                last_update: Instant::now(),
                ..status
            },
        );
    }

    /// Mutates the current entry in place via `f`, inserting a default first
    /// if none exists. Refreshes the staleness clock.
    pub fn upsert_with<F: FnOnce(&mut LiveStatus)>(&self, charge_point_id: &str, f: F) {
        let mut entry = self.entries.entry(charge_point_id.to_string()).or_default();
        f(&mut entry);
        entry.last_update = Instant::now();
    }

    /// Returns a snapshot with V/I/P zeroed if the entry is stale, retaining
    /// energy/estimated_amount per §4.3.
    pub fn get(&self, charge_point_id: &str) -> Option<LiveStatus> {
        self.entries.get(charge_point_id).map(|entry| {
            let mut snapshot = entry.clone();
            if entry.last_update.elapsed().as_secs() > self.ttl_secs {
                snapshot.voltage = 0.0;
                snapshot.current = 0.0;
                snapshot.power_kw = 0.0;
            }
            snapshot
        })
    }

    /// Clears the cache to zeros on StartTransaction/StopTransaction,
    /// carrying over cumulative energy (§4.3, §4.6 steps 5/8).
    pub fn reset_carrying_energy(&self, charge_point_id: &str) {
        self.entries
            .entry(charge_point_id.to_string())
            .and_modify(|s| {
                let carried_energy = s.energy_kwh;
                let carried_amount = s.estimated_amount;
                *s = LiveStatus {
                    energy_kwh: carried_energy,
                    estimated_amount: carried_amount,
                    ..LiveStatus::default()
                };
            })
            .or_insert_with(LiveStatus::default);
    }

    /// Full clear to zeros, dropping any carried-over energy. Used when a
    /// fresh session genuinely starts from nothing.
    pub fn clear(&self, charge_point_id: &str) {
        self.entries.insert(charge_point_id.to_string(), LiveStatus::default());
    }

    pub fn remove(&self, charge_point_id: &str) {
        self.entries.remove(charge_point_id);
    }
}

impl Default for LiveStatusCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn stale_entry_zeroes_electrical_readings_but_keeps_energy() {
        let cache = LiveStatusCache {
            entries: DashMap::new(),
            ttl_secs: 0,
        };
        cache.update(
            "CP1",
            LiveStatus {
                voltage: 230.0,
                current: 16.0,
                power_kw: 3.68,
                energy_kwh: dec!(5.2),
                estimated_amount: dec!(31.2),
                ..Default::default()
            },
        );
        std::thread::sleep(std::time::Duration::from_millis(5));
        let snapshot = cache.get("CP1").unwrap();
        assert_eq!(snapshot.voltage, 0.0);
        assert_eq!(snapshot.current, 0.0);
        assert_eq!(snapshot.power_kw, 0.0);
        assert_eq!(snapshot.energy_kwh, dec!(5.2));
        assert_eq!(snapshot.estimated_amount, dec!(31.2));
    }

    #[test]
    fn reset_carries_over_energy_only() {
        let cache = LiveStatusCache::new();
        cache.update(
            "CP1",
            LiveStatus {
                voltage: 230.0,
                energy_kwh: dec!(2.0),
                estimated_amount: dec!(12.0),
                ..Default::default()
            },
        );
        cache.reset_carrying_energy("CP1");
        let snapshot = cache.get("CP1").unwrap();
        assert_eq!(snapshot.voltage, 0.0);
        assert_eq!(snapshot.energy_kwh, dec!(2.0));
        assert_eq!(snapshot.estimated_amount, dec!(12.0));
    }

    #[test]
    fn missing_entry_returns_none() {
        let cache = LiveStatusCache::new();
        assert!(cache.get("unknown").is_none());
    }
}
