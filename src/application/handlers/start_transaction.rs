//! StartTransaction handler (§4.5, §4.6): delegates the admission chain to
//! the Transaction Engine and maps its decision onto the wire response.

use chrono::Utc;
use rust_ocpp::v1_6::messages::start_transaction::{StartTransactionRequest, StartTransactionResponse};
use rust_ocpp::v1_6::types::{AuthorizationStatus, IdTagInfo};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::application::ocpp_handler::OcppHandler;
use crate::application::transaction_engine::StartDecision;

pub async fn handle(ctx: &OcppHandler, payload: &Value) -> Value {
    let req: StartTransactionRequest = match serde_json::from_value(payload.clone()) {
        Ok(r) => r,
        Err(e) => {
            warn!(charge_point_id = ctx.charge_point_id.as_str(), error = %e, "failed to parse StartTransaction");
            return rejected_response(AuthorizationStatus::Invalid);
        }
    };

    info!(
        charge_point_id = ctx.charge_point_id.as_str(),
        connector_id = req.connector_id,
        id_tag = req.id_tag.as_str(),
        meter_start = req.meter_start,
        "StartTransaction"
    );

    let timestamp = req.timestamp.unwrap_or_else(Utc::now);
    let decision = ctx
        .transaction_engine
        .start_transaction(&ctx.charge_point_id, req.connector_id, &req.id_tag, req.meter_start as i64, timestamp)
        .await;

    match decision {
        Ok(StartDecision::Accepted { transaction_id }) => {
            let response = StartTransactionResponse {
                transaction_id: transaction_id as i32,
                id_tag_info: IdTagInfo {
                    status: AuthorizationStatus::Accepted,
                    expiry_date: None,
                    parent_id_tag: None,
                },
            };
            serde_json::to_value(&response).unwrap_or_default()
        }
        Ok(StartDecision::Invalid) => rejected_response(AuthorizationStatus::Invalid),
        Ok(StartDecision::Blocked) => rejected_response(AuthorizationStatus::Blocked),
        Err(e) => {
            error!(charge_point_id = ctx.charge_point_id.as_str(), error = %e, "StartTransaction admission failed");
            rejected_response(AuthorizationStatus::Invalid)
        }
    }
}

fn rejected_response(status: AuthorizationStatus) -> Value {
    let response = StartTransactionResponse {
        transaction_id: 0,
        id_tag_info: IdTagInfo {
            status,
            expiry_date: None,
            parent_id_tag: None,
        },
    };
    serde_json::to_value(&response).unwrap_or_default()
}
