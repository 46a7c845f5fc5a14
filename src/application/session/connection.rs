//! WebSocket connection handle for one connected charge point (§4.5).

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

/// One active OCPP session, as seen by the rest of the application.
///
/// Writes are serialized through `sender` to a dedicated write task — §5
/// requires outbound frames be written in submission order.
#[derive(Debug)]
pub struct Connection {
    pub charge_point_id: String,
    pub sender: mpsc::UnboundedSender<String>,
    pub connected_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    /// Set once a `SetChargingProfile` attempt against this CP has either
    /// succeeded or failed — the probe-and-latch resolution of the
    /// `supports_smart_charging` open question (§9).
    pub supports_smart_charging: Option<bool>,
}

impl Connection {
    pub fn new(charge_point_id: impl Into<String>, sender: mpsc::UnboundedSender<String>) -> Self {
        let now = Utc::now();
        Self {
            charge_point_id: charge_point_id.into(),
            sender,
            connected_at: now,
            last_activity: now,
            supports_smart_charging: None,
        }
    }

    pub fn send(&self, message: String) -> Result<(), String> {
        self.sender
            .send(message)
            .map_err(|e| format!("failed to send message: {e}"))
    }

    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }
}

/// A session that was replaced by a newer connection for the same CP id.
pub struct EvictedSession {
    pub charge_point_id: String,
    pub connected_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

/// A read-only snapshot of one active session, for `GET /api/connections` (§6).
#[derive(Debug, Clone)]
pub struct ConnectionSummary {
    pub charge_point_id: String,
    pub connected_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub supports_smart_charging: Option<bool>,
}

impl From<&Connection> for ConnectionSummary {
    fn from(conn: &Connection) -> Self {
        Self {
            charge_point_id: conn.charge_point_id.clone(),
            connected_at: conn.connected_at,
            last_activity: conn.last_activity,
            supports_smart_charging: conn.supports_smart_charging,
        }
    }
}
