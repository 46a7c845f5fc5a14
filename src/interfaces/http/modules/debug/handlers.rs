//! `GET /api/debug/start-transaction-check` (§6): dry-runs the admission
//! chain an operator would hit on the real start path, without side effects.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::application::transaction_engine::StartDecision;
use crate::interfaces::http::common::{ApiError, ApiResponse, ApiResult};
use crate::interfaces::http::router::ApiState;
use crate::shared::percent_decode::percent_decode;

#[derive(Debug, Deserialize)]
pub struct StartCheckQuery {
    pub charge_point_id: String,
    pub id_tag: String,
}

#[derive(Debug, Serialize)]
pub struct StartCheckDto {
    pub decision: &'static str,
}

pub async fn start_transaction_check(
    State(state): State<ApiState>,
    Query(query): Query<StartCheckQuery>,
) -> ApiResult<StartCheckDto> {
    let charge_point_id = percent_decode(&query.charge_point_id);
    let decision = state
        .transaction_engine
        .dry_run_admission(&charge_point_id, &query.id_tag)
        .await
        .map_err(ApiError)?;

    let decision = match decision {
        StartDecision::Accepted { .. } => "Accepted",
        StartDecision::Invalid => "Invalid",
        StartDecision::Blocked => "Blocked",
    };

    Ok(Json(ApiResponse::success(StartCheckDto { decision })))
}
