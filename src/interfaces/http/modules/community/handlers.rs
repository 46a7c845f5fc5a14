//! Community Settings HTTP handlers (§6): Smart Charging configuration.

use axum::extract::State;
use axum::Json;

use super::dto::{CommunitySettingsDto, UpdateCommunitySettingsRequest};
use crate::interfaces::http::common::{ApiError, ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::router::ApiState;

pub async fn get_community_settings(State(state): State<ApiState>) -> ApiResult<CommunitySettingsDto> {
    let settings = state.repositories.community_settings().get().await.map_err(ApiError)?;
    Ok(Json(ApiResponse::success(CommunitySettingsDto::from(settings))))
}

pub async fn update_community_settings(
    State(state): State<ApiState>,
    ValidatedJson(body): ValidatedJson<UpdateCommunitySettingsRequest>,
) -> ApiResult<CommunitySettingsDto> {
    let settings = crate::domain::community_settings::CommunitySettings::from(body);
    state
        .repositories
        .community_settings()
        .update(settings.clone())
        .await
        .map_err(ApiError)?;

    // A settings change can immediately affect admission and per-CP limits
    // for every connected session (§4.8).
    state.smart_charging.rebalance("community settings updated").await;

    Ok(Json(ApiResponse::success(CommunitySettingsDto::from(settings))))
}
