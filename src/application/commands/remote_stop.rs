//! RemoteStopTransaction command (§4.6 server-initiated stop, §4.9).

use rust_ocpp::v1_6::messages::remote_stop_transaction::{
    RemoteStopTransactionRequest, RemoteStopTransactionResponse,
};
use tracing::info;

use super::CommandSender;
use crate::shared::{DomainError, DomainResult};

pub async fn remote_stop_transaction(
    command_sender: &CommandSender,
    charge_point_id: &str,
    transaction_id: i64,
) -> DomainResult<String> {
    info!(charge_point_id, transaction_id, "RemoteStopTransaction");

    let request = RemoteStopTransactionRequest {
        transaction_id: transaction_id as i32,
    };
    let payload = serde_json::to_value(&request)
        .map_err(|e| DomainError::Other(format!("serialization failed: {e}")))?;

    let result = command_sender
        .send_command(charge_point_id, "RemoteStopTransaction", payload)
        .await?;

    let response: RemoteStopTransactionResponse = serde_json::from_value(result)
        .map_err(|e| DomainError::Other(format!("failed to parse response: {e}")))?;

    Ok(format!("{:?}", response.status))
}
