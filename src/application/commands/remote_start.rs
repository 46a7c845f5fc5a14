//! RemoteStartTransaction command (§4.6 server-initiated start is not used
//! by this system's own admission path, but the HTTP surface §6 exposes it
//! as an operator action).

use rust_ocpp::v1_6::messages::remote_start_transaction::{
    RemoteStartTransactionRequest, RemoteStartTransactionResponse,
};
use tracing::info;

use super::CommandSender;
use crate::shared::{DomainError, DomainResult};

pub async fn remote_start_transaction(
    command_sender: &CommandSender,
    charge_point_id: &str,
    id_tag: &str,
    connector_id: Option<i32>,
) -> DomainResult<String> {
    info!(charge_point_id, id_tag, ?connector_id, "RemoteStartTransaction");

    let request = RemoteStartTransactionRequest {
        connector_id,
        id_tag: id_tag.to_string(),
        charging_profile: None,
    };
    let payload = serde_json::to_value(&request)
        .map_err(|e| DomainError::Other(format!("serialization failed: {e}")))?;

    let result = command_sender
        .send_command(charge_point_id, "RemoteStartTransaction", payload)
        .await?;

    let response: RemoteStartTransactionResponse = serde_json::from_value(result)
        .map_err(|e| DomainError::Other(format!("failed to parse response: {e}")))?;

    Ok(format!("{:?}", response.status))
}
