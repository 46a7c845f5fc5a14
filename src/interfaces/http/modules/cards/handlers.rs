//! Card HTTP handlers (§6): balance lookup and manual top-up.

use axum::extract::{Path, State};
use axum::Json;
use rust_decimal::Decimal;

use super::dto::{CardBalanceDto, CardDto, TopUpRequest};
use crate::interfaces::http::common::{ApiError, ApiResponse, ApiResult};
use crate::interfaces::http::router::ApiState;
use crate::shared::percent_decode::percent_decode;
use crate::shared::DomainError;

pub async fn list_cards(State(state): State<ApiState>) -> ApiResult<Vec<CardDto>> {
    let cards = state.repositories.cards().find_all().await.map_err(ApiError)?;
    Ok(Json(ApiResponse::success(cards.into_iter().map(CardDto::from).collect())))
}

pub async fn card_balance(
    State(state): State<ApiState>,
    Path(id_tag): Path<String>,
) -> ApiResult<CardBalanceDto> {
    let id_tag = percent_decode(&id_tag);
    let card = state
        .repositories
        .cards()
        .find_by_id(&id_tag)
        .await
        .map_err(ApiError)?
        .ok_or_else(|| {
            ApiError(DomainError::NotFound {
                entity: "Card",
                field: "id",
                value: id_tag.clone(),
            })
        })?;
    Ok(Json(ApiResponse::success(CardBalanceDto {
        id: card.id,
        balance: card.balance,
    })))
}

pub async fn top_up_card(
    State(state): State<ApiState>,
    Path(id_tag): Path<String>,
    Json(body): Json<TopUpRequest>,
) -> ApiResult<CardBalanceDto> {
    let id_tag = percent_decode(&id_tag);
    if body.amount <= Decimal::ZERO {
        return Err(ApiError(DomainError::Validation("amount must be positive".into())));
    }
    let card = state.repositories.cards().credit(&id_tag, body.amount).await.map_err(ApiError)?;
    Ok(Json(ApiResponse::success(CardBalanceDto {
        id: card.id,
        balance: card.balance,
    })))
}
