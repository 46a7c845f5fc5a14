//! Authorize handler (§4.5): `{idTagInfo:{status}}` from the IdTag row.

use rust_ocpp::v1_6::messages::authorize::{AuthorizeRequest, AuthorizeResponse};
use rust_ocpp::v1_6::types::IdTagInfo;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::application::ocpp_handler::OcppHandler;
use crate::domain::id_tag::AuthorizationStatus as DomainAuthStatus;

pub async fn handle(ctx: &OcppHandler, payload: &Value) -> Value {
    let req: AuthorizeRequest = match serde_json::from_value(payload.clone()) {
        Ok(r) => r,
        Err(e) => {
            warn!(charge_point_id = ctx.charge_point_id.as_str(), error = %e, "failed to parse Authorize");
            return invalid_response();
        }
    };

    info!(charge_point_id = ctx.charge_point_id.as_str(), id_tag = req.id_tag.as_str(), "Authorize");

    let status = match ctx.repositories.id_tags().find_by_id(&req.id_tag).await {
        Ok(Some(tag)) => tag.effective_status(chrono::Utc::now()),
        Ok(None) => DomainAuthStatus::Invalid,
        Err(e) => {
            error!(charge_point_id = ctx.charge_point_id.as_str(), error = %e, "failed to look up IdTag");
            DomainAuthStatus::Invalid
        }
    };

    let response = AuthorizeResponse {
        id_tag_info: IdTagInfo {
            status: to_wire_status(status),
            expiry_date: None,
            parent_id_tag: None,
        },
    };
    serde_json::to_value(&response).unwrap_or_default()
}

fn invalid_response() -> Value {
    let response = AuthorizeResponse {
        id_tag_info: IdTagInfo {
            status: rust_ocpp::v1_6::types::AuthorizationStatus::Invalid,
            expiry_date: None,
            parent_id_tag: None,
        },
    };
    serde_json::to_value(&response).unwrap_or_default()
}

fn to_wire_status(status: DomainAuthStatus) -> rust_ocpp::v1_6::types::AuthorizationStatus {
    use rust_ocpp::v1_6::types::AuthorizationStatus as Wire;
    match status {
        DomainAuthStatus::Accepted => Wire::Accepted,
        DomainAuthStatus::Blocked => Wire::Blocked,
        DomainAuthStatus::Expired => Wire::Expired,
        DomainAuthStatus::Invalid => Wire::Invalid,
    }
}
