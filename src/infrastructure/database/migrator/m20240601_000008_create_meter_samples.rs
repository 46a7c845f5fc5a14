//! Create meter_samples table: one row per MeterValues sampledValue entry (§4.7).

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MeterSamples::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MeterSamples::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MeterSamples::TransactionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MeterSamples::ChargePointId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MeterSamples::ConnectorId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MeterSamples::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MeterSamples::Measurand)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MeterSamples::Unit).string())
                    .col(ColumnDef::new(MeterSamples::Value).double().not_null())
                    .col(ColumnDef::new(MeterSamples::Phase).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_meter_samples_transaction")
                    .table(MeterSamples::Table)
                    .col(MeterSamples::TransactionId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MeterSamples::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum MeterSamples {
    Table,
    Id,
    TransactionId,
    ChargePointId,
    ConnectorId,
    Timestamp,
    Measurand,
    Unit,
    Value,
    Phase,
}
