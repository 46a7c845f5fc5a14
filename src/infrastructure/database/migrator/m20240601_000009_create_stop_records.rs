//! Create stop_records table: one row per StopTransaction received (§4.6).

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StopRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StopRecords::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StopRecords::TransactionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StopRecords::MeterStop)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StopRecords::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StopRecords::Reason).string())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StopRecords::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum StopRecords {
    Table,
    Id,
    TransactionId,
    MeterStop,
    Timestamp,
    Reason,
}
