//! StatusNotification handler (§4.5): append StatusLog; the latest row per
//! (cp, connector) *is* the CP status snapshot — no separate in-memory copy.

use chrono::Utc;
use rust_ocpp::v1_6::messages::status_notification::{StatusNotificationRequest, StatusNotificationResponse};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::application::ocpp_handler::OcppHandler;
use crate::domain::status_log::StatusLog;

pub async fn handle(ctx: &OcppHandler, payload: &Value) -> Value {
    let req: StatusNotificationRequest = match serde_json::from_value(payload.clone()) {
        Ok(r) => r,
        Err(e) => {
            warn!(charge_point_id = ctx.charge_point_id.as_str(), error = %e, "failed to parse StatusNotification");
            return serde_json::to_value(&StatusNotificationResponse {}).unwrap_or_default();
        }
    };

    let status = to_wire_string(&req.status);
    let error_code = to_wire_string(&req.error_code);

    info!(
        charge_point_id = ctx.charge_point_id.as_str(),
        connector_id = req.connector_id,
        status = status.as_str(),
        error_code = error_code.as_str(),
        "StatusNotification"
    );

    let log = StatusLog {
        charge_point_id: ctx.charge_point_id.clone(),
        connector_id: req.connector_id,
        status,
        error_code: Some(error_code),
        timestamp: req.timestamp.unwrap_or_else(Utc::now),
    };
    if let Err(e) = ctx.repositories.status_logs().append(log).await {
        error!(charge_point_id = ctx.charge_point_id.as_str(), error = %e, "failed to append StatusLog");
    }

    serde_json::to_value(&StatusNotificationResponse {}).unwrap_or_default()
}

fn to_wire_string<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}
