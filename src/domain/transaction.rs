//! Transaction domain entity (§3): the OCPP charging session state machine.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct Transaction {
    pub id: i64,
    pub charge_point_id: String,
    pub connector_id: i32,
    pub id_tag: String,
    pub meter_start: i64,
    pub start_timestamp: DateTime<Utc>,
    pub meter_stop: Option<i64>,
    pub stop_timestamp: Option<DateTime<Utc>>,
    pub stop_reason: Option<String>,
}

impl Transaction {
    pub fn new(
        id: i64,
        charge_point_id: impl Into<String>,
        connector_id: i32,
        id_tag: impl Into<String>,
        meter_start: i64,
        start_timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            charge_point_id: charge_point_id.into(),
            connector_id,
            id_tag: id_tag.into(),
            meter_start,
            start_timestamp,
            meter_stop: None,
            stop_timestamp: None,
            stop_reason: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.stop_timestamp.is_none()
    }

    /// Final energy delivered in kWh; `None` while still active (§4.6 step 3).
    pub fn final_energy_kwh(&self) -> Option<rust_decimal::Decimal> {
        self.meter_stop.map(|stop| {
            rust_decimal::Decimal::from(stop - self.meter_start) / rust_decimal::Decimal::from(1000)
        })
    }
}

/// Allocates a monotone transaction id derived from wall-clock epoch
/// milliseconds, as explicitly sanctioned by §3. Bounded to fit OCPP 1.6's
/// 32-bit wire `transactionId` field, wrapping roughly every 24 days.
pub fn allocate_transaction_id() -> i64 {
    Utc::now().timestamp_millis() % i32::MAX as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn new_transaction_is_active() {
        let tx = Transaction::new(1, "CP1", 1, "TAG1", 0, Utc::now());
        assert!(tx.is_active());
        assert!(tx.final_energy_kwh().is_none());
    }

    #[test]
    fn final_energy_computed_after_stop() {
        let mut tx = Transaction::new(1, "CP1", 1, "TAG1", 1000, Utc::now());
        tx.meter_stop = Some(6000);
        assert_eq!(tx.final_energy_kwh(), Some(dec!(5)));
        assert!(!tx.is_active());
    }
}
