//! StopTransaction handler (§4.5, §4.6): delegates the atomic close to the
//! Transaction Engine and fulfills any pending server-initiated-stop future.

use chrono::Utc;
use rust_ocpp::v1_6::messages::stop_transaction::{StopTransactionRequest, StopTransactionResponse};
use rust_ocpp::v1_6::types::{AuthorizationStatus, IdTagInfo};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::application::ocpp_handler::OcppHandler;

pub async fn handle(ctx: &OcppHandler, payload: &Value) -> Value {
    let req: StopTransactionRequest = match serde_json::from_value(payload.clone()) {
        Ok(r) => r,
        Err(e) => {
            warn!(charge_point_id = ctx.charge_point_id.as_str(), error = %e, "failed to parse StopTransaction");
            return serde_json::to_value(&StopTransactionResponse { id_tag_info: None }).unwrap_or_default();
        }
    };

    info!(
        charge_point_id = ctx.charge_point_id.as_str(),
        transaction_id = req.transaction_id,
        meter_stop = req.meter_stop,
        "StopTransaction"
    );

    let reason = req.reason.as_ref().map(|r| format!("{r:?}"));
    let timestamp = req.timestamp.unwrap_or_else(Utc::now);
    match ctx
        .transaction_engine
        .stop_transaction(req.transaction_id as i64, req.meter_stop as i64, timestamp, reason)
        .await
    {
        Ok(total_amount) => {
            info!(
                charge_point_id = ctx.charge_point_id.as_str(),
                transaction_id = req.transaction_id,
                %total_amount,
                "transaction billed"
            );
        }
        Err(e) => {
            error!(
                charge_point_id = ctx.charge_point_id.as_str(),
                transaction_id = req.transaction_id,
                error = %e,
                "failed to stop transaction"
            );
        }
    }

    let response = StopTransactionResponse {
        id_tag_info: Some(IdTagInfo {
            status: AuthorizationStatus::Accepted,
            expiry_date: None,
            parent_id_tag: None,
        }),
    };
    serde_json::to_value(&response).unwrap_or_default()
}
