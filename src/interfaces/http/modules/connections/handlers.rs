//! `GET /api/connections` (§6): every currently connected charge point.

use axum::extract::State;
use axum::Json;

use super::dto::ConnectionDto;
use crate::interfaces::http::common::ApiResponse;
use crate::interfaces::http::router::ApiState;

pub async fn list_connections(State(state): State<ApiState>) -> Json<ApiResponse<Vec<ConnectionDto>>> {
    let connections: Vec<ConnectionDto> = state
        .session_registry
        .snapshot()
        .into_iter()
        .map(ConnectionDto::from)
        .collect();
    Json(ApiResponse::success(connections))
}
