//! Card DTOs (§6: `/api/cards`).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::card::Card;

#[derive(Debug, Serialize)]
pub struct CardDto {
    pub id: String,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Card> for CardDto {
    fn from(c: Card) -> Self {
        Self {
            id: c.id,
            balance: c.balance,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CardBalanceDto {
    pub id: String,
    pub balance: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct TopUpRequest {
    pub amount: Decimal,
}
