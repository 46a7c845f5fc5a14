//! Session Registry (C4, §4.4): CP identifier → live session handle.
//!
//! Only one session per identifier is permitted; a second accepted
//! connection closes any prior handle by dropping its sender.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::connection::{Connection, ConnectionSummary, EvictedSession};

pub struct SessionRegistry {
    sessions: DashMap<String, Connection>,
}

pub type SharedSessionRegistry = Arc<SessionRegistry>;

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    pub fn shared() -> SharedSessionRegistry {
        Arc::new(Self::new())
    }

    /// Registers a new session, evicting any prior one for the same CP id.
    /// Dropping the evicted connection's sender closes the old write task.
    pub fn register(
        &self,
        charge_point_id: &str,
        sender: mpsc::UnboundedSender<String>,
    ) -> Option<EvictedSession> {
        let evicted = self.sessions.remove(charge_point_id).map(|(_, old)| {
            warn!(
                charge_point_id,
                connected_since = %old.connected_at,
                "evicting stale session for new connection"
            );
            EvictedSession {
                charge_point_id: old.charge_point_id,
                connected_at: old.connected_at,
                last_activity: old.last_activity,
            }
        });

        info!(charge_point_id, "registering charge point session");
        self.sessions
            .insert(charge_point_id.to_string(), Connection::new(charge_point_id, sender));
        metrics::gauge!("evcs_connected_charge_points").set(self.sessions.len() as f64);

        evicted
    }

    pub fn unregister(&self, charge_point_id: &str) {
        if self.sessions.remove(charge_point_id).is_some() {
            metrics::gauge!("evcs_connected_charge_points").set(self.sessions.len() as f64);
            info!(charge_point_id, "unregistered charge point session");
        }
    }

    pub fn send_to(&self, charge_point_id: &str, message: String) -> Result<(), String> {
        match self.sessions.get(charge_point_id) {
            Some(conn) => conn.send(message),
            None => Err(format!("charge point {charge_point_id} is not connected")),
        }
    }

    pub fn touch(&self, charge_point_id: &str) {
        if let Some(mut conn) = self.sessions.get_mut(charge_point_id) {
            conn.touch();
        }
    }

    pub fn is_connected(&self, charge_point_id: &str) -> bool {
        self.sessions.contains_key(charge_point_id)
    }

    pub fn connected_ids(&self) -> Vec<String> {
        self.sessions.iter().map(|r| r.key().clone()).collect()
    }

    pub fn count(&self) -> usize {
        self.sessions.len()
    }

    /// Snapshot of every active session, for `GET /api/connections` (§6).
    pub fn snapshot(&self) -> Vec<ConnectionSummary> {
        self.sessions.iter().map(|r| ConnectionSummary::from(r.value())).collect()
    }

    /// The probe-and-latch state for Smart Charging capability (§9).
    pub fn supports_smart_charging(&self, charge_point_id: &str) -> Option<bool> {
        self.sessions
            .get(charge_point_id)
            .and_then(|c| c.supports_smart_charging)
    }

    pub fn latch_smart_charging_support(&self, charge_point_id: &str, supported: bool) {
        if let Some(mut conn) = self.sessions.get_mut(charge_point_id) {
            conn.supports_smart_charging = Some(supported);
        }
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
