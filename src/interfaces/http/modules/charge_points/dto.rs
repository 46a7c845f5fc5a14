//! Charge Point DTOs (§6).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::charge_point::ChargePoint;
use crate::domain::transaction::Transaction;

#[derive(Debug, Serialize)]
pub struct ChargePointDto {
    pub id: String,
    pub display_name: Option<String>,
    pub admin_state: String,
    pub max_current_a: f64,
    pub is_online: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChargePointDto {
    pub fn from_domain(cp: ChargePoint, is_online: bool) -> Self {
        Self {
            id: cp.id,
            display_name: cp.display_name,
            admin_state: cp.admin_state.as_str().to_string(),
            max_current_a: cp.max_current_a,
            is_online,
            created_at: cp.created_at,
            updated_at: cp.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateChargePointRequest {
    #[validate(length(min = 1, max = 255, message = "id must not be empty"))]
    pub id: String,
    pub display_name: Option<String>,
    #[validate(range(min = 0.0, message = "max_current_a must be non-negative"))]
    pub max_current_a: Option<f64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateChargePointRequest {
    pub display_name: Option<String>,
    /// `"enabled"` or `"disabled"`.
    pub admin_state: Option<String>,
    #[validate(range(min = 0.0, message = "max_current_a must be non-negative"))]
    pub max_current_a: Option<f64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct StartTransactionHttpRequest {
    #[validate(length(min = 1, message = "id_tag must not be empty"))]
    pub id_tag: String,
    pub connector_id: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct StartTransactionHttpResponse {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct StopTransactionHttpResponse {
    pub stopped: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CurrentLimitRequest {
    #[validate(range(min = 0.0, message = "max_current_a must be non-negative"))]
    pub max_current_a: f64,
}

#[derive(Debug, Serialize)]
pub struct LiveStatusDto {
    pub voltage: f64,
    pub current: f64,
    pub power_kw: f64,
    pub energy_kwh: Decimal,
    pub estimated_energy_kwh: Decimal,
    pub estimated_amount: Decimal,
    pub price_per_kwh: Decimal,
    pub last_sample_at: Option<DateTime<Utc>>,
    pub derived: bool,
}

#[derive(Debug, Serialize)]
pub struct TransactionDto {
    pub id: i64,
    pub charge_point_id: String,
    pub connector_id: i32,
    pub id_tag: String,
    pub meter_start: i64,
    pub start_timestamp: DateTime<Utc>,
    pub meter_stop: Option<i64>,
    pub stop_timestamp: Option<DateTime<Utc>>,
    pub stop_reason: Option<String>,
    pub is_active: bool,
}

impl From<Transaction> for TransactionDto {
    fn from(tx: Transaction) -> Self {
        let is_active = tx.is_active();
        Self {
            id: tx.id,
            charge_point_id: tx.charge_point_id,
            connector_id: tx.connector_id,
            id_tag: tx.id_tag,
            meter_start: tx.meter_start,
            start_timestamp: tx.start_timestamp,
            meter_stop: tx.meter_stop,
            stop_timestamp: tx.stop_timestamp,
            stop_reason: tx.stop_reason,
            is_active,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TransactionSummaryDto {
    pub id: i64,
    pub charge_point_id: String,
    pub connector_id: i32,
    pub energy_kwh: Option<Decimal>,
    pub total_amount: Option<Decimal>,
    pub start_timestamp: DateTime<Utc>,
    pub stop_timestamp: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::charge_point::AdminState;

    #[test]
    fn from_domain_carries_online_flag() {
        let cp = ChargePoint::new("cp-1");
        let dto = ChargePointDto::from_domain(cp, true);
        assert_eq!(dto.id, "cp-1");
        assert!(dto.is_online);
        assert_eq!(dto.admin_state, AdminState::Enabled.as_str());
    }

    #[test]
    fn create_request_rejects_empty_id() {
        let req = CreateChargePointRequest {
            id: String::new(),
            display_name: None,
            max_current_a: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn create_request_rejects_negative_current() {
        let req = CreateChargePointRequest {
            id: "cp-1".into(),
            display_name: None,
            max_current_a: Some(-5.0),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn start_transaction_request_rejects_empty_id_tag() {
        let req = StartTransactionHttpRequest { id_tag: String::new(), connector_id: None };
        assert!(req.validate().is_err());
    }
}
