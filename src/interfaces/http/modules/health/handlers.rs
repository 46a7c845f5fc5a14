//! `GET /healthz` (ambient, §6): reports uptime, store reachability, and the
//! current connected-charge-point count. No auth — used by uptime checks.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::application::session::SharedSessionRegistry;
use crate::domain::repository::RepositoryProvider;

#[derive(Clone)]
pub struct HealthState {
    pub repositories: Arc<dyn RepositoryProvider>,
    pub session_registry: SharedSessionRegistry,
    pub started_at: Arc<Instant>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub store_reachable: bool,
    pub connected_charge_points: u32,
}

pub async fn health_check(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let uptime = state.started_at.elapsed().as_secs();
    let connected = state.session_registry.connected_ids().len() as u32;
    let store_reachable = state.repositories.charge_points().find_all().await.is_ok();

    let status = if store_reachable { "ok" } else { "degraded" };
    let http_status = if store_reachable {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        http_status,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: uptime,
            store_reachable,
            connected_charge_points: connected,
        }),
    )
}
