//! RealtimeDeduction cursor (§3): the idempotence key for streaming billing.
//!
//! Exists only while a transaction is active; deleted on close (§4.6 step 6).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct RealtimeDeduction {
    pub transaction_id: i64,
    pub debited_kwh: Decimal,
    pub debited_amount: Decimal,
    pub last_update: DateTime<Utc>,
}

impl RealtimeDeduction {
    pub fn new(transaction_id: i64) -> Self {
        Self {
            transaction_id,
            debited_kwh: Decimal::ZERO,
            debited_amount: Decimal::ZERO,
            last_update: Utc::now(),
        }
    }
}
