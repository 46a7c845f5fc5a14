//! Connections DTOs (§6: `GET /api/connections`).

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::application::session::ConnectionSummary;

#[derive(Debug, Serialize)]
pub struct ConnectionDto {
    pub charge_point_id: String,
    pub connected_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub supports_smart_charging: Option<bool>,
}

impl From<ConnectionSummary> for ConnectionDto {
    fn from(s: ConnectionSummary) -> Self {
        Self {
            charge_point_id: s.charge_point_id,
            connected_at: s.connected_at,
            last_activity: s.last_activity,
            supports_smart_charging: s.supports_smart_charging,
        }
    }
}
