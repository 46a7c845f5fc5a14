//! Payment domain entity (§3): exactly one row per closed transaction.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct Payment {
    pub transaction_id: i64,
    pub base_fee: Decimal,
    pub energy_fee: Decimal,
    pub overuse_fee: Decimal,
    pub total_amount: Decimal,
    pub paid_at: DateTime<Utc>,
}

impl Payment {
    pub fn new(transaction_id: i64, energy_fee: Decimal) -> Self {
        Self {
            transaction_id,
            base_fee: Decimal::ZERO,
            energy_fee,
            overuse_fee: Decimal::ZERO,
            total_amount: energy_fee,
            paid_at: Utc::now(),
        }
    }
}
