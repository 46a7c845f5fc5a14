//! BootNotification handler (§4.5): always Accepted in this reference system.

use chrono::Utc;
use rust_ocpp::v1_6::messages::boot_notification::{BootNotificationRequest, BootNotificationResponse};
use rust_ocpp::v1_6::types::RegistrationStatus;
use serde_json::Value;
use tracing::{info, warn};

use crate::application::ocpp_handler::OcppHandler;

/// Heartbeat interval advertised to the charge point (§4.5: "interval=10s").
const HEARTBEAT_INTERVAL_SECS: i64 = 10;

pub async fn handle(ctx: &OcppHandler, payload: &Value) -> Value {
    match serde_json::from_value::<BootNotificationRequest>(payload.clone()) {
        Ok(req) => {
            info!(
                charge_point_id = ctx.charge_point_id.as_str(),
                vendor = req.charge_point_vendor.as_str(),
                model = req.charge_point_model.as_str(),
                "BootNotification"
            );
        }
        Err(e) => {
            warn!(charge_point_id = ctx.charge_point_id.as_str(), error = %e, "failed to parse BootNotification, accepting anyway");
        }
    }

    let response = BootNotificationResponse {
        current_time: Utc::now(),
        interval: HEARTBEAT_INTERVAL_SECS,
        status: RegistrationStatus::Accepted,
    };
    serde_json::to_value(&response).unwrap_or_default()
}
