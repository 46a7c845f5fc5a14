//! Create transactions table. Id is the caller-allocated monotone epoch-millis id (§3).

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Transactions::ChargePointId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::ConnectorId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::IdTag).string().not_null())
                    .col(
                        ColumnDef::new(Transactions::MeterStart)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::StartTimestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::MeterStop).big_integer())
                    .col(ColumnDef::new(Transactions::StopTimestamp).timestamp_with_time_zone())
                    .col(ColumnDef::new(Transactions::StopReason).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_transactions_charge_point")
                    .table(Transactions::Table)
                    .col(Transactions::ChargePointId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_transactions_active")
                    .table(Transactions::Table)
                    .col(Transactions::ChargePointId)
                    .col(Transactions::ConnectorId)
                    .col(Transactions::MeterStop)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Transactions {
    Table,
    Id,
    ChargePointId,
    ConnectorId,
    IdTag,
    MeterStart,
    StartTimestamp,
    MeterStop,
    StopTimestamp,
    StopReason,
}
