//! StatusLog domain entity (§3): append-only OCPP StatusNotification history.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct StatusLog {
    pub charge_point_id: String,
    pub connector_id: i32,
    pub status: String,
    pub error_code: Option<String>,
    pub timestamp: DateTime<Utc>,
}
