//! SeaORM implementation of TransactionRepository.
//!
//! `close_transaction` bundles the StopRecord insert, the Transaction's stop
//! fields, the Payment row, the card debit, and the RealtimeDeduction
//! teardown into one serialized DB transaction (§4.1, §4.6 step 6).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    Order, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;

use crate::domain::meter_sample::MeterSample;
use crate::domain::payment::Payment;
use crate::domain::realtime_deduction::RealtimeDeduction;
use crate::domain::repository::TransactionRepository;
use crate::domain::transaction::Transaction;
use crate::infrastructure::database::entities::{
    card, meter_sample, payment, realtime_deduction, stop_record, transaction,
};
use crate::shared::{DomainError, DomainResult};

pub struct SeaOrmTransactionRepository {
    db: DatabaseConnection,
}

impl SeaOrmTransactionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: transaction::Model) -> Transaction {
    Transaction {
        id: m.id,
        charge_point_id: m.charge_point_id,
        connector_id: m.connector_id,
        id_tag: m.id_tag,
        meter_start: m.meter_start,
        start_timestamp: m.start_timestamp,
        meter_stop: m.meter_stop,
        stop_timestamp: m.stop_timestamp,
        stop_reason: m.stop_reason,
    }
}

fn sample_to_domain(m: meter_sample::Model) -> MeterSample {
    MeterSample {
        transaction_id: m.transaction_id,
        charge_point_id: m.charge_point_id,
        connector_id: m.connector_id,
        timestamp: m.timestamp,
        measurand: m.measurand,
        unit: m.unit,
        value: m.value,
        phase: m.phase,
    }
}

fn payment_to_domain(m: payment::Model) -> Payment {
    Payment {
        transaction_id: m.transaction_id,
        base_fee: m.base_fee,
        energy_fee: m.energy_fee,
        overuse_fee: m.overuse_fee,
        total_amount: m.total_amount,
        paid_at: m.paid_at,
    }
}

#[async_trait]
impl TransactionRepository for SeaOrmTransactionRepository {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Transaction>> {
        let model = transaction::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn find_active_for_connector(
        &self,
        charge_point_id: &str,
        connector_id: i32,
    ) -> DomainResult<Option<Transaction>> {
        let model = transaction::Entity::find()
            .filter(transaction::Column::ChargePointId.eq(charge_point_id))
            .filter(transaction::Column::ConnectorId.eq(connector_id))
            .filter(transaction::Column::StopTimestamp.is_null())
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_domain))
    }

    async fn find_active_for_charge_point(
        &self,
        charge_point_id: &str,
    ) -> DomainResult<Option<Transaction>> {
        let model = transaction::Entity::find()
            .filter(transaction::Column::ChargePointId.eq(charge_point_id))
            .filter(transaction::Column::StopTimestamp.is_null())
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_domain))
    }

    async fn find_all_active(&self) -> DomainResult<Vec<Transaction>> {
        let models = transaction::Entity::find()
            .filter(transaction::Column::StopTimestamp.is_null())
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_last_finished(&self, charge_point_id: &str) -> DomainResult<Option<Transaction>> {
        let model = transaction::Entity::find()
            .filter(transaction::Column::ChargePointId.eq(charge_point_id))
            .filter(transaction::Column::StopTimestamp.is_not_null())
            .order_by(transaction::Column::StopTimestamp, Order::Desc)
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_domain))
    }

    async fn insert(&self, tx: Transaction) -> DomainResult<Transaction> {
        let model = transaction::ActiveModel {
            id: Set(tx.id),
            charge_point_id: Set(tx.charge_point_id.clone()),
            connector_id: Set(tx.connector_id),
            id_tag: Set(tx.id_tag.clone()),
            meter_start: Set(tx.meter_start),
            start_timestamp: Set(tx.start_timestamp),
            meter_stop: Set(None),
            stop_timestamp: Set(None),
            stop_reason: Set(None),
        };
        let saved = model.insert(&self.db).await?;

        realtime_deduction::ActiveModel {
            transaction_id: Set(tx.id),
            debited_kwh: Set(Decimal::ZERO),
            debited_amount: Set(Decimal::ZERO),
            last_update: Set(tx.start_timestamp),
        }
        .insert(&self.db)
        .await?;

        info!(transaction_id = tx.id, charge_point_id = %tx.charge_point_id, "transaction started");
        Ok(model_to_domain(saved))
    }

    async fn close_transaction(
        &self,
        transaction_id: i64,
        meter_stop: i64,
        stop_timestamp: DateTime<Utc>,
        reason: Option<String>,
        final_cost: Decimal,
        card_id: &str,
    ) -> DomainResult<Payment> {
        let txn = self.db.begin().await?;

        let existing = transaction::Entity::find_by_id(transaction_id)
            .one(&txn)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "Transaction",
                field: "id",
                value: transaction_id.to_string(),
            })?;

        transaction::ActiveModel {
            id: Set(transaction_id),
            charge_point_id: Set(existing.charge_point_id),
            connector_id: Set(existing.connector_id),
            id_tag: Set(existing.id_tag),
            meter_start: Set(existing.meter_start),
            start_timestamp: Set(existing.start_timestamp),
            meter_stop: Set(Some(meter_stop)),
            stop_timestamp: Set(Some(stop_timestamp)),
            stop_reason: Set(reason.clone()),
        }
        .update(&txn)
        .await?;

        stop_record::ActiveModel {
            id: NotSet,
            transaction_id: Set(transaction_id),
            meter_stop: Set(meter_stop),
            timestamp: Set(stop_timestamp),
            reason: Set(reason),
        }
        .insert(&txn)
        .await?;

        let cursor = realtime_deduction::Entity::find_by_id(transaction_id)
            .one(&txn)
            .await?;
        let already_debited = cursor
            .as_ref()
            .map(|c| c.debited_amount)
            .unwrap_or(Decimal::ZERO);
        let residual = (final_cost - already_debited).max(Decimal::ZERO);

        if residual > Decimal::ZERO {
            if let Some(card_model) = card::Entity::find_by_id(card_id).one(&txn).await? {
                let applied = residual.min(card_model.balance).max(Decimal::ZERO);
                let new_balance = (card_model.balance - applied).max(Decimal::ZERO);
                card::ActiveModel {
                    id: Set(card_id.to_string()),
                    balance: Set(new_balance),
                    created_at: Set(card_model.created_at),
                    updated_at: Set(stop_timestamp),
                }
                .update(&txn)
                .await?;
            }
        }

        let payment = Payment::new(transaction_id, final_cost);
        payment::ActiveModel {
            transaction_id: Set(payment.transaction_id),
            base_fee: Set(payment.base_fee),
            energy_fee: Set(payment.energy_fee),
            overuse_fee: Set(payment.overuse_fee),
            total_amount: Set(payment.total_amount),
            paid_at: Set(payment.paid_at),
        }
        .insert(&txn)
        .await?;

        realtime_deduction::Entity::delete_by_id(transaction_id)
            .exec(&txn)
            .await?;

        txn.commit().await?;

        info!(transaction_id, %final_cost, "transaction closed");
        Ok(payment)
    }

    async fn insert_meter_sample(&self, sample: MeterSample) -> DomainResult<()> {
        meter_sample::ActiveModel {
            id: NotSet,
            transaction_id: Set(sample.transaction_id),
            charge_point_id: Set(sample.charge_point_id),
            connector_id: Set(sample.connector_id),
            timestamp: Set(sample.timestamp),
            measurand: Set(sample.measurand),
            unit: Set(sample.unit),
            value: Set(sample.value),
            phase: Set(sample.phase),
        }
        .insert(&self.db)
        .await?;
        Ok(())
    }

    async fn meter_samples_for(&self, transaction_id: i64) -> DomainResult<Vec<MeterSample>> {
        let models = meter_sample::Entity::find()
            .filter(meter_sample::Column::TransactionId.eq(transaction_id))
            .order_by_asc(meter_sample::Column::Timestamp)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(sample_to_domain).collect())
    }

    async fn get_realtime_deduction(
        &self,
        transaction_id: i64,
    ) -> DomainResult<Option<RealtimeDeduction>> {
        let model = realtime_deduction::Entity::find_by_id(transaction_id)
            .one(&self.db)
            .await?;
        Ok(model.map(|m| RealtimeDeduction {
            transaction_id: m.transaction_id,
            debited_kwh: m.debited_kwh,
            debited_amount: m.debited_amount,
            last_update: m.last_update,
        }))
    }

    async fn payment_for(&self, transaction_id: i64) -> DomainResult<Option<Payment>> {
        let model = payment::Entity::find_by_id(transaction_id).one(&self.db).await?;
        Ok(model.map(payment_to_domain))
    }
}
