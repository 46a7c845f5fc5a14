//! MeterValues handler (§4.5, §4.7): flattens every sampled value across all
//! reported meterValue entries and hands them to the Billing Streamer.

use chrono::Utc;
use rust_ocpp::v1_6::messages::meter_values::{MeterValuesRequest, MeterValuesResponse};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::application::billing_streamer::IncomingSample;
use crate::application::ocpp_handler::OcppHandler;

pub async fn handle(ctx: &OcppHandler, payload: &Value) -> Value {
    let req: MeterValuesRequest = match serde_json::from_value(payload.clone()) {
        Ok(r) => r,
        Err(e) => {
            warn!(charge_point_id = ctx.charge_point_id.as_str(), error = %e, "failed to parse MeterValues");
            return serde_json::to_value(&MeterValuesResponse {}).unwrap_or_default();
        }
    };

    info!(
        charge_point_id = ctx.charge_point_id.as_str(),
        connector_id = req.connector_id,
        transaction_id = ?req.transaction_id,
        meter_value_count = req.meter_value.len(),
        "MeterValues"
    );

    let timestamp = req.meter_value.first().map(|mv| mv.timestamp).unwrap_or_else(Utc::now);

    let samples: Vec<IncomingSample> = req
        .meter_value
        .iter()
        .flat_map(|mv| mv.sampled_value.iter())
        .filter_map(|sampled| {
            sampled.value.parse::<f64>().ok().map(|value| IncomingSample {
                measurand: sampled.measurand.as_ref().map(wire_string).unwrap_or_default(),
                unit: sampled.unit.as_ref().map(wire_string),
                value,
                phase: sampled.phase.as_ref().map(wire_string),
            })
        })
        .collect();

    if let Err(e) = ctx
        .billing_streamer
        .ingest(&ctx.charge_point_id, req.connector_id, req.transaction_id.map(|id| id as i64), timestamp, &samples)
        .await
    {
        error!(charge_point_id = ctx.charge_point_id.as_str(), error = %e, "failed to ingest MeterValues");
    }

    serde_json::to_value(&MeterValuesResponse {}).unwrap_or_default()
}

/// rust_ocpp's measurand/unit/phase enums serialize to the exact OCPP wire
/// strings (e.g. `Energy.Active.Import.Register`) — reuse that instead of
/// pattern-matching every variant by hand.
fn wire_string<T: Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}
