//! Charge Point HTTP handlers (§6): CRUD, operator start/stop, current-limit
//! push, and the live/transaction query surface.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use super::dto::{
    ChargePointDto, CreateChargePointRequest, CurrentLimitRequest, LiveStatusDto,
    StartTransactionHttpRequest, StartTransactionHttpResponse, StopTransactionHttpResponse,
    TransactionDto, TransactionSummaryDto, UpdateChargePointRequest,
};
use crate::application::commands::remote_start_transaction;
use crate::domain::charge_point::{AdminState, ChargePoint};
use crate::interfaces::http::common::{ApiError, ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::router::ApiState;
use crate::shared::percent_decode::percent_decode;
use crate::shared::DomainError;

pub async fn list_charge_points(State(state): State<ApiState>) -> ApiResult<Vec<ChargePointDto>> {
    let charge_points = state.repositories.charge_points().find_all().await.map_err(ApiError)?;
    let dtos = charge_points
        .into_iter()
        .map(|cp| {
            let is_online = state.session_registry.is_connected(&cp.id);
            ChargePointDto::from_domain(cp, is_online)
        })
        .collect();
    Ok(Json(ApiResponse::success(dtos)))
}

pub async fn get_charge_point(
    State(state): State<ApiState>,
    Path(charge_point_id): Path<String>,
) -> ApiResult<ChargePointDto> {
    let charge_point_id = percent_decode(&charge_point_id);
    let cp = find_or_404(&state, &charge_point_id).await?;
    let is_online = state.session_registry.is_connected(&cp.id);
    Ok(Json(ApiResponse::success(ChargePointDto::from_domain(cp, is_online))))
}

pub async fn create_charge_point(
    State(state): State<ApiState>,
    ValidatedJson(body): ValidatedJson<CreateChargePointRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ChargePointDto>>), ApiError> {
    if state
        .repositories
        .charge_points()
        .find_by_id(&body.id)
        .await
        .map_err(ApiError)?
        .is_some()
    {
        return Err(ApiError(DomainError::AlreadyExists {
            entity: "ChargePoint",
            value: body.id,
        }));
    }

    let mut cp = ChargePoint::new(&body.id);
    cp.display_name = body.display_name;
    if let Some(max_current_a) = body.max_current_a {
        cp.max_current_a = max_current_a;
    }

    let cp = state.repositories.charge_points().upsert(cp).await.map_err(ApiError)?;
    let is_online = state.session_registry.is_connected(&cp.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ChargePointDto::from_domain(cp, is_online))),
    ))
}

pub async fn update_charge_point(
    State(state): State<ApiState>,
    Path(charge_point_id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateChargePointRequest>,
) -> ApiResult<ChargePointDto> {
    let charge_point_id = percent_decode(&charge_point_id);
    let mut cp = find_or_404(&state, &charge_point_id).await?;

    if let Some(display_name) = body.display_name {
        cp.display_name = Some(display_name);
    }
    if let Some(admin_state) = body.admin_state {
        cp.admin_state = AdminState::from_str(&admin_state);
    }
    if let Some(max_current_a) = body.max_current_a {
        cp.max_current_a = max_current_a;
    }
    cp.updated_at = chrono::Utc::now();

    let cp = state.repositories.charge_points().upsert(cp).await.map_err(ApiError)?;

    if let Some(max_current_a) = body.max_current_a {
        // Apply immediately if a session is mid-transaction (§4.8 final paragraph).
        let _ = state.smart_charging.push_individual_limit(&charge_point_id, max_current_a).await;
    }

    let is_online = state.session_registry.is_connected(&cp.id);
    Ok(Json(ApiResponse::success(ChargePointDto::from_domain(cp, is_online))))
}

pub async fn delete_charge_point(
    State(state): State<ApiState>,
    Path(charge_point_id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let charge_point_id = percent_decode(&charge_point_id);
    state.repositories.charge_points().delete(&charge_point_id).await.map_err(ApiError)?;
    Ok(Json(ApiResponse::success(())))
}

/// `POST /api/charge-points/{id}/start` (§6): sends RemoteStartTransaction.
pub async fn start_transaction(
    State(state): State<ApiState>,
    Path(charge_point_id): Path<String>,
    ValidatedJson(body): ValidatedJson<StartTransactionHttpRequest>,
) -> ApiResult<StartTransactionHttpResponse> {
    let charge_point_id = percent_decode(&charge_point_id);
    let status = remote_start_transaction(&state.command_sender, &charge_point_id, &body.id_tag, body.connector_id)
        .await
        .map_err(ApiError)?;
    Ok(Json(ApiResponse::success(StartTransactionHttpResponse { status })))
}

/// `POST /api/charge-points/{id}/stop` (§6: "sync, 15 s timeout") — awaits
/// the Transaction Engine's full server-initiated-stop wait before replying.
pub async fn stop_transaction(
    State(state): State<ApiState>,
    Path(charge_point_id): Path<String>,
) -> ApiResult<StopTransactionHttpResponse> {
    let charge_point_id = percent_decode(&charge_point_id);
    state.transaction_engine.server_initiated_stop(&charge_point_id).await.map_err(ApiError)?;
    Ok(Json(ApiResponse::success(StopTransactionHttpResponse { stopped: true })))
}

/// `POST /api/charge-points/{id}/current-limit` (§6: "apply immediately if in-session").
pub async fn set_current_limit(
    State(state): State<ApiState>,
    Path(charge_point_id): Path<String>,
    ValidatedJson(body): ValidatedJson<CurrentLimitRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let charge_point_id = percent_decode(&charge_point_id);
    state
        .repositories
        .charge_points()
        .set_max_current(&charge_point_id, body.max_current_a)
        .await
        .map_err(ApiError)?;
    state
        .smart_charging
        .push_individual_limit(&charge_point_id, body.max_current_a)
        .await
        .map_err(ApiError)?;
    Ok(Json(ApiResponse::success(())))
}

pub async fn live_status(
    State(state): State<ApiState>,
    Path(charge_point_id): Path<String>,
) -> ApiResult<LiveStatusDto> {
    let charge_point_id = percent_decode(&charge_point_id);
    let status = state.live_status.get(&charge_point_id).unwrap_or_default();
    Ok(Json(ApiResponse::success(LiveStatusDto {
        voltage: status.voltage,
        current: status.current,
        power_kw: status.power_kw,
        energy_kwh: status.energy_kwh,
        estimated_energy_kwh: status.estimated_energy_kwh,
        estimated_amount: status.estimated_amount,
        price_per_kwh: status.price_per_kwh,
        last_sample_at: status.last_sample_at,
        derived: status.derived,
    })))
}

pub async fn current_transaction(
    State(state): State<ApiState>,
    Path(charge_point_id): Path<String>,
) -> ApiResult<TransactionDto> {
    let charge_point_id = percent_decode(&charge_point_id);
    let tx = state
        .repositories
        .transactions()
        .find_active_for_charge_point(&charge_point_id)
        .await
        .map_err(ApiError)?
        .ok_or_else(|| {
            ApiError(DomainError::NotFound {
                entity: "Transaction",
                field: "charge_point_id",
                value: charge_point_id.clone(),
            })
        })?;
    Ok(Json(ApiResponse::success(TransactionDto::from(tx))))
}

pub async fn current_transaction_summary(
    State(state): State<ApiState>,
    Path(charge_point_id): Path<String>,
) -> ApiResult<TransactionSummaryDto> {
    let charge_point_id = percent_decode(&charge_point_id);
    let tx = state
        .repositories
        .transactions()
        .find_active_for_charge_point(&charge_point_id)
        .await
        .map_err(ApiError)?
        .ok_or_else(|| {
            ApiError(DomainError::NotFound {
                entity: "Transaction",
                field: "charge_point_id",
                value: charge_point_id.clone(),
            })
        })?;

    let live = state.live_status.get(&charge_point_id);
    Ok(Json(ApiResponse::success(TransactionSummaryDto {
        id: tx.id,
        charge_point_id: tx.charge_point_id,
        connector_id: tx.connector_id,
        energy_kwh: live.as_ref().map(|s| s.estimated_energy_kwh),
        total_amount: live.as_ref().map(|s| s.estimated_amount),
        start_timestamp: tx.start_timestamp,
        stop_timestamp: None,
    })))
}

pub async fn last_finished_transaction_summary(
    State(state): State<ApiState>,
    Path(charge_point_id): Path<String>,
) -> ApiResult<TransactionSummaryDto> {
    let charge_point_id = percent_decode(&charge_point_id);
    let tx = state
        .repositories
        .transactions()
        .find_last_finished(&charge_point_id)
        .await
        .map_err(ApiError)?
        .ok_or_else(|| {
            ApiError(DomainError::NotFound {
                entity: "Transaction",
                field: "charge_point_id",
                value: charge_point_id.clone(),
            })
        })?;

    let payment = state.repositories.transactions().payment_for(tx.id).await.map_err(ApiError)?;
    Ok(Json(ApiResponse::success(TransactionSummaryDto {
        id: tx.id,
        charge_point_id: tx.charge_point_id,
        connector_id: tx.connector_id,
        energy_kwh: tx.final_energy_kwh(),
        total_amount: payment.map(|p| p.total_amount),
        start_timestamp: tx.start_timestamp,
        stop_timestamp: tx.stop_timestamp,
    })))
}

async fn find_or_404(state: &ApiState, charge_point_id: &str) -> Result<ChargePoint, ApiError> {
    state
        .repositories
        .charge_points()
        .find_by_id(charge_point_id)
        .await
        .map_err(ApiError)?
        .ok_or_else(|| {
            ApiError(DomainError::NotFound {
                entity: "ChargePoint",
                field: "id",
                value: charge_point_id.to_string(),
            })
        })
}
