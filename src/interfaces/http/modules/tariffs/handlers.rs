//! Daily pricing HTTP handlers (§6, §4.2).

use axum::extract::{Path, State};
use axum::Json;
use chrono::NaiveDate;

use super::dto::{CreateTariffSegmentRequest, DefaultPriceDto, TariffSegmentDto};
use crate::interfaces::http::common::{ApiError, ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::router::ApiState;
use crate::shared::DomainError;

pub async fn list_segments(State(state): State<ApiState>) -> ApiResult<Vec<TariffSegmentDto>> {
    let segments = state.repositories.tariffs().all_segments().await.map_err(ApiError)?;
    Ok(Json(ApiResponse::success(
        segments.into_iter().map(TariffSegmentDto::from).collect(),
    )))
}

pub async fn segments_for_date(
    State(state): State<ApiState>,
    Path(date): Path<NaiveDate>,
) -> ApiResult<Vec<TariffSegmentDto>> {
    let segments = state.repositories.tariffs().segments_for_date(date).await.map_err(ApiError)?;
    Ok(Json(ApiResponse::success(
        segments.into_iter().map(TariffSegmentDto::from).collect(),
    )))
}

pub async fn add_segment(
    State(state): State<ApiState>,
    ValidatedJson(body): ValidatedJson<CreateTariffSegmentRequest>,
) -> ApiResult<()> {
    let segment = body
        .into_domain()
        .ok_or_else(|| ApiError(DomainError::Validation("invalid start/end/price".into())))?;
    state.repositories.tariffs().add_segment(segment).await.map_err(ApiError)?;
    Ok(Json(ApiResponse::success(())))
}

pub async fn delete_segments_for_date(
    State(state): State<ApiState>,
    Path(date): Path<NaiveDate>,
) -> ApiResult<()> {
    state
        .repositories
        .tariffs()
        .delete_segments_for_date(date)
        .await
        .map_err(ApiError)?;
    Ok(Json(ApiResponse::success(())))
}

pub async fn default_price(State(state): State<ApiState>) -> ApiResult<DefaultPriceDto> {
    let price = state.repositories.tariffs().default_price().await.map_err(ApiError)?;
    Ok(Json(ApiResponse::success(DefaultPriceDto { price })))
}
