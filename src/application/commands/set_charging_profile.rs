//! SetChargingProfile command (§4.8). The profile is built by the Smart
//! Charging Coordinator as raw JSON matching OCPP 1.6's `ChargingProfile`
//! schema — kept untyped here the same way the HTTP surface accepts an
//! arbitrary profile body, since the coordinator is the only caller and
//! always emits the same fixed shape (TxProfile/Absolute/one period).

use serde_json::{json, Value};
use tracing::info;

use super::CommandSender;
use crate::shared::{DomainError, DomainResult};

/// Sends a `SetChargingProfile` limiting `connector_id` to `limit_amps`
/// amperes for `transaction_id`, per the fixed shape described in §4.8.
pub async fn set_charging_profile(
    command_sender: &CommandSender,
    charge_point_id: &str,
    connector_id: i32,
    transaction_id: i64,
    limit_amps: f64,
) -> DomainResult<String> {
    let profile_id = transaction_id % 100_000;
    info!(
        charge_point_id,
        connector_id, transaction_id, limit_amps, "SetChargingProfile"
    );

    let profile = json!({
        "chargingProfileId": profile_id,
        "stackLevel": 0,
        "chargingProfilePurpose": "TxProfile",
        "chargingProfileKind": "Absolute",
        "transactionId": transaction_id,
        "chargingSchedule": {
            "chargingRateUnit": "A",
            "chargingSchedulePeriod": [
                { "startPeriod": 0, "limit": limit_amps, "numberPhases": 1 }
            ]
        }
    });

    let payload = json!({
        "connectorId": connector_id,
        "csChargingProfiles": profile,
    });

    let result = command_sender
        .send_command(charge_point_id, "SetChargingProfile", payload)
        .await?;

    result
        .get("status")
        .and_then(Value::as_str)
        .map(|s| s.to_string())
        .ok_or_else(|| DomainError::Other("missing status in SetChargingProfile response".to_string()))
}
