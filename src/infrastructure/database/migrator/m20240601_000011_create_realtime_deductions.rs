//! Create realtime_deductions table: one cursor row per active transaction (§4.7).

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RealtimeDeductions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RealtimeDeductions::TransactionId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RealtimeDeductions::DebitedKwh)
                            .decimal_len(18, 6)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(RealtimeDeductions::DebitedAmount)
                            .decimal_len(18, 6)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(RealtimeDeductions::LastUpdate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RealtimeDeductions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum RealtimeDeductions {
    Table,
    TransactionId,
    DebitedKwh,
    DebitedAmount,
    LastUpdate,
}
