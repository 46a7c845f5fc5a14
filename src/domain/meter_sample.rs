//! MeterSample domain entity (§3): one sampled value from a MeterValues CALL.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct MeterSample {
    pub transaction_id: i64,
    pub charge_point_id: String,
    pub connector_id: i32,
    pub timestamp: DateTime<Utc>,
    pub measurand: String,
    pub unit: Option<String>,
    pub value: f64,
    pub phase: Option<String>,
}

/// The measurand identifying a cumulative energy register sample.
pub const ENERGY_REGISTER_MEASURAND: &str = "Energy.Active.Import.Register";

/// An anomalous single-sample jump is dropped rather than billed (§4.7 step 4).
pub const MAX_SAMPLE_JUMP_KWH: f64 = 10.0;

impl MeterSample {
    pub fn is_energy_register(&self) -> bool {
        self.measurand.is_empty() || self.measurand.eq_ignore_ascii_case(ENERGY_REGISTER_MEASURAND)
    }

    /// Interprets `unit` (Wh→kWh; any other/unknown unit treated as already
    /// being in kWh) per §4.7 step 4.
    pub fn total_kwh(&self) -> f64 {
        match self.unit.as_deref() {
            Some(u) if u.eq_ignore_ascii_case("Wh") => self.value / 1000.0,
            _ => self.value,
        }
    }
}

/// Orders the energy-register samples by timestamp and drops any whose
/// single-step jump from the previous *accepted* cumulative reading exceeds
/// `MAX_SAMPLE_JUMP_KWH`. Used by both the live billing tick and the final
/// segmented replay so a dropped sample stays excluded from every downstream
/// cost/energy computation, not just the tick that first observed it.
pub fn filter_anomalous_jumps(samples: &[MeterSample], meter_start: i64) -> Vec<&MeterSample> {
    let mut ordered: Vec<&MeterSample> = samples.iter().filter(|s| s.is_energy_register()).collect();
    ordered.sort_by_key(|s| s.timestamp);

    let mut accepted = Vec::with_capacity(ordered.len());
    let mut prev_kwh = meter_start as f64 / 1000.0;
    for sample in ordered {
        let total_kwh = sample.total_kwh();
        if total_kwh - prev_kwh > MAX_SAMPLE_JUMP_KWH {
            continue;
        }
        prev_kwh = total_kwh;
        accepted.push(sample);
    }
    accepted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(minutes: i64, total_kwh: f64) -> MeterSample {
        MeterSample {
            transaction_id: 1,
            charge_point_id: "cp-1".into(),
            connector_id: 1,
            timestamp: Utc::now() + chrono::Duration::minutes(minutes),
            measurand: ENERGY_REGISTER_MEASURAND.into(),
            unit: None,
            value: total_kwh,
            phase: None,
        }
    }

    #[test]
    fn keeps_consistent_readings() {
        let samples = vec![sample(1, 1.0), sample(2, 2.0), sample(3, 3.0)];
        let accepted = filter_anomalous_jumps(&samples, 0);
        assert_eq!(accepted.len(), 3);
    }

    #[test]
    fn drops_anomalous_jump_and_stays_anchored_on_last_good_reading() {
        // 2.0 -> 50.0 is a bogus jump; the next sample (3.0) is legitimate
        // relative to the last *accepted* reading, not the anomalous one.
        let samples = vec![sample(1, 1.0), sample(2, 2.0), sample(3, 50.0), sample(4, 3.0)];
        let accepted = filter_anomalous_jumps(&samples, 0);
        let totals: Vec<f64> = accepted.iter().map(|s| s.total_kwh()).collect();
        assert_eq!(totals, vec![1.0, 2.0, 3.0]);
    }
}
