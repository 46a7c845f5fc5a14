//! SeaORM implementation of CardRepository.
//!
//! `debit_with_cursor` is the write-barrier from §5: advancing the
//! RealtimeDeduction cursor and debiting the card happens inside one
//! serialized DB transaction, so a retried MeterValues never double-charges.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait,
};
use tracing::debug;

use crate::domain::card::Card;
use crate::domain::repository::CardRepository;
use crate::infrastructure::database::entities::{card, realtime_deduction};
use crate::shared::{DomainError, DomainResult};

pub struct SeaOrmCardRepository {
    db: DatabaseConnection,
}

impl SeaOrmCardRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: card::Model) -> Card {
    Card {
        id: m.id,
        balance: m.balance,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

#[async_trait]
impl CardRepository for SeaOrmCardRepository {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Card>> {
        let model = card::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<Card>> {
        let models = card::Entity::find().all(&self.db).await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn credit(&self, id: &str, amount: Decimal) -> DomainResult<Card> {
        let existing = card::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "Card",
                field: "id",
                value: id.to_string(),
            })?;

        let new_balance = existing.balance + amount;
        let model = card::ActiveModel {
            id: Set(id.to_string()),
            balance: Set(new_balance),
            created_at: Set(existing.created_at),
            updated_at: Set(Utc::now()),
        };
        let saved = model.update(&self.db).await?;
        Ok(model_to_domain(saved))
    }

    async fn debit_with_cursor(
        &self,
        card_id: &str,
        transaction_id: i64,
        new_cursor_kwh: Decimal,
        new_cursor_amount: Decimal,
    ) -> DomainResult<(Decimal, Decimal)> {
        let txn = self.db.begin().await?;

        let card_model = card::Entity::find_by_id(card_id)
            .one(&txn)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "Card",
                field: "id",
                value: card_id.to_string(),
            })?;

        let cursor = realtime_deduction::Entity::find_by_id(transaction_id)
            .one(&txn)
            .await?;

        let previously_debited = cursor
            .as_ref()
            .map(|c| c.debited_amount)
            .unwrap_or(Decimal::ZERO);

        let increment = (new_cursor_amount - previously_debited).max(Decimal::ZERO);
        let applied = increment.min(card_model.balance).max(Decimal::ZERO);
        let new_balance = (card_model.balance - applied).max(Decimal::ZERO);

        let now = Utc::now();

        card::ActiveModel {
            id: Set(card_id.to_string()),
            balance: Set(new_balance),
            created_at: Set(card_model.created_at),
            updated_at: Set(now),
        }
        .update(&txn)
        .await?;

        match cursor {
            Some(existing) => {
                realtime_deduction::ActiveModel {
                    transaction_id: Set(transaction_id),
                    debited_kwh: Set(new_cursor_kwh),
                    debited_amount: Set(previously_debited + applied),
                    last_update: Set(now),
                }
                .update(&txn)
                .await?;
                let _ = existing.transaction_id;
            }
            None => {
                realtime_deduction::ActiveModel {
                    transaction_id: Set(transaction_id),
                    debited_kwh: Set(new_cursor_kwh),
                    debited_amount: Set(applied),
                    last_update: Set(now),
                }
                .insert(&txn)
                .await?;
            }
        }

        txn.commit().await?;

        debug!(
            card_id,
            transaction_id, %applied, %new_balance, "realtime deduction applied"
        );

        Ok((applied, new_balance))
    }
}
