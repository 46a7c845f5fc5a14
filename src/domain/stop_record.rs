//! StopRecord domain entity (§3): one row per StopTransaction received.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct StopRecord {
    pub transaction_id: i64,
    pub meter_stop: i64,
    pub timestamp: DateTime<Utc>,
    pub reason: Option<String>,
}
