//! Heartbeat handler (§4.5): `{currentTime}`, no side effects.

use chrono::Utc;
use rust_ocpp::v1_6::messages::heart_beat::HeartbeatResponse;
use serde_json::Value;
use tracing::info;

use crate::application::ocpp_handler::OcppHandler;

pub async fn handle(ctx: &OcppHandler, _payload: &Value) -> Value {
    info!(charge_point_id = ctx.charge_point_id.as_str(), "Heartbeat");
    let response = HeartbeatResponse { current_time: Utc::now() };
    serde_json::to_value(&response).unwrap_or_default()
}
