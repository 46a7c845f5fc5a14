//! OCPP Session dispatch (C5, §4.5): parses an inbound OCPP-J frame, routes
//! CALLs to the matching action handler, and routes CALLRESULT/CALLERROR
//! frames to the `CommandSender`'s pending-request map.

use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use crate::application::billing_streamer::SharedBillingStreamer;
use crate::application::commands::CommandSender;
use crate::application::handlers;
use crate::application::transaction_engine::SharedTransactionEngine;
use crate::domain::repository::RepositoryProvider;
use crate::shared::key_normalize::normalize_keys;
use crate::shared::OcppFrame;

/// Per-connection handle bundling everything an inbound action handler needs.
/// One instance is constructed per accepted WebSocket session.
pub struct OcppHandler {
    pub charge_point_id: String,
    pub repositories: Arc<dyn RepositoryProvider>,
    pub transaction_engine: SharedTransactionEngine,
    pub billing_streamer: SharedBillingStreamer,
    pub command_sender: Arc<CommandSender>,
}

impl OcppHandler {
    pub fn new(
        charge_point_id: impl Into<String>,
        repositories: Arc<dyn RepositoryProvider>,
        transaction_engine: SharedTransactionEngine,
        billing_streamer: SharedBillingStreamer,
        command_sender: Arc<CommandSender>,
    ) -> Self {
        Self {
            charge_point_id: charge_point_id.into(),
            repositories,
            transaction_engine,
            billing_streamer,
            command_sender,
        }
    }

    /// Parses `text` and returns the frame to write back, if any (CALLs get a
    /// CALLRESULT/CALLERROR reply; CALLRESULT/CALLERROR frames produce none).
    pub async fn handle(&self, text: &str) -> Option<String> {
        let frame = match OcppFrame::parse(text) {
            Ok(f) => f,
            Err(e) => {
                warn!(charge_point_id = self.charge_point_id.as_str(), error = %e, "malformed OCPP frame");
                return None;
            }
        };

        match frame {
            OcppFrame::Call {
                message_id,
                action,
                payload,
            } => Some(self.handle_call(message_id, action, payload).await),
            OcppFrame::CallResult { message_id, payload } => {
                self.command_sender.handle_response(&self.charge_point_id, &message_id, payload);
                None
            }
            OcppFrame::CallError {
                message_id,
                error_code,
                error_description,
                ..
            } => {
                self.command_sender
                    .handle_error(&self.charge_point_id, &message_id, &error_code, &error_description);
                None
            }
        }
    }

    async fn handle_call(&self, message_id: String, action: String, payload: Value) -> String {
        let payload = normalize_keys(payload);

        let reply = match action.as_str() {
            "BootNotification" => handlers::boot_notification::handle(self, &payload).await,
            "Heartbeat" => handlers::heartbeat::handle(self, &payload).await,
            "StatusNotification" => handlers::status_notification::handle(self, &payload).await,
            "Authorize" => handlers::authorize::handle(self, &payload).await,
            "StartTransaction" => handlers::start_transaction::handle(self, &payload).await,
            "StopTransaction" => handlers::stop_transaction::handle(self, &payload).await,
            "MeterValues" => handlers::meter_values::handle(self, &payload).await,
            other => {
                warn!(charge_point_id = self.charge_point_id.as_str(), action = other, "unsupported action");
                let frame = OcppFrame::error_response(
                    message_id,
                    "NotImplemented",
                    format!("action '{other}' is not supported"),
                );
                return frame.serialize();
            }
        };

        OcppFrame::CallResult { message_id, payload: reply }.serialize()
    }
}
