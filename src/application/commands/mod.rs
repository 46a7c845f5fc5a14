//! Outbound CS→CP command transport (§4.5, §5): serializes a CALL, remembers
//! it in a pending-request map keyed by `(chargePointId, messageId)`, and
//! resolves the matching future when the session's read loop observes the
//! CALLRESULT/CALLERROR. A per-call timeout keeps a silent CP from leaking
//! a pending slot forever.

pub mod remote_start;
pub mod remote_stop;
pub mod set_charging_profile;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::oneshot;
use tokio::time::timeout;
use tracing::{info, warn};

use crate::application::session::SharedSessionRegistry;
use crate::shared::{DomainError, DomainResult, OcppFrame};

pub use remote_start::remote_start_transaction;
pub use remote_stop::remote_stop_transaction;
pub use set_charging_profile::set_charging_profile;

/// Default outbound CALL timeout (§4.5: "10 s default").
const RESPONSE_TIMEOUT_SECS: u64 = 10;

struct PendingRequest {
    action_name: String,
    response_sender: oneshot::Sender<DomainResult<Value>>,
}

pub struct CommandSender {
    session_registry: SharedSessionRegistry,
    pending_requests: DashMap<(String, String), PendingRequest>,
    message_counter: AtomicU64,
}

pub type SharedCommandSender = Arc<CommandSender>;

impl CommandSender {
    pub fn new(session_registry: SharedSessionRegistry) -> Self {
        Self {
            session_registry,
            pending_requests: DashMap::new(),
            message_counter: AtomicU64::new(1),
        }
    }

    pub fn shared(session_registry: SharedSessionRegistry) -> SharedCommandSender {
        Arc::new(Self::new(session_registry))
    }

    fn generate_message_id(&self) -> String {
        let id = self.message_counter.fetch_add(1, Ordering::SeqCst);
        format!("CS-{id}")
    }

    /// Sends `action` with `payload` to `charge_point_id` and awaits the
    /// matching CALLRESULT/CALLERROR, or a timeout.
    pub async fn send_command(
        &self,
        charge_point_id: &str,
        action: &str,
        payload: Value,
    ) -> DomainResult<Value> {
        self.send_command_with_timeout(
            charge_point_id,
            action,
            payload,
            Duration::from_secs(RESPONSE_TIMEOUT_SECS),
        )
        .await
    }

    pub async fn send_command_with_timeout(
        &self,
        charge_point_id: &str,
        action: &str,
        payload: Value,
        call_timeout: Duration,
    ) -> DomainResult<Value> {
        let message_id = self.generate_message_id();
        let frame = OcppFrame::Call {
            message_id: message_id.clone(),
            action: action.to_string(),
            payload,
        };
        let json = frame.serialize();

        let (tx, rx) = oneshot::channel();
        let key = (charge_point_id.to_string(), message_id.clone());
        self.pending_requests.insert(
            key.clone(),
            PendingRequest {
                action_name: action.to_string(),
                response_sender: tx,
            },
        );

        info!(charge_point_id, action, message_id = message_id.as_str(), "sending command");

        if let Err(e) = self.session_registry.send_to(charge_point_id, json) {
            self.pending_requests.remove(&key);
            return Err(DomainError::NotConnected(e));
        }

        match timeout(call_timeout, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => {
                self.pending_requests.remove(&key);
                Err(DomainError::Other("response channel closed".to_string()))
            }
            Err(_) => {
                self.pending_requests.remove(&key);
                warn!(charge_point_id, action, message_id = message_id.as_str(), "command timed out");
                Err(DomainError::Timeout)
            }
        }
    }

    /// Called by the session's read loop on an incoming CALLRESULT.
    pub fn handle_response(&self, charge_point_id: &str, message_id: &str, payload: Value) {
        let key = (charge_point_id.to_string(), message_id.to_string());
        if let Some((_, pending)) = self.pending_requests.remove(&key) {
            info!(charge_point_id, action = pending.action_name.as_str(), message_id, "received response");
            let _ = pending.response_sender.send(Ok(payload));
        } else {
            warn!(charge_point_id, message_id, "response for unknown request");
        }
    }

    /// Called by the session's read loop on an incoming CALLERROR.
    pub fn handle_error(
        &self,
        charge_point_id: &str,
        message_id: &str,
        error_code: &str,
        error_description: &str,
    ) {
        let key = (charge_point_id.to_string(), message_id.to_string());
        if let Some((_, pending)) = self.pending_requests.remove(&key) {
            warn!(
                charge_point_id,
                action = pending.action_name.as_str(),
                message_id,
                error_code,
                error_description,
                "received error"
            );
            let _ = pending.response_sender.send(Err(DomainError::Other(format!(
                "{error_code}: {error_description}"
            ))));
        }
    }

    /// Drops every pending request for a CP whose session just closed, so
    /// waiters fail fast instead of riding out the full timeout.
    pub fn cleanup_charge_point(&self, charge_point_id: &str) {
        self.pending_requests.retain(|key, _| key.0 != charge_point_id);
    }
}
