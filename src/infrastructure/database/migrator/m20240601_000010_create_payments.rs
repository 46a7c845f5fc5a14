//! Create payments table: exactly one row per closed transaction (§4.6).

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Payments::TransactionId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Payments::BaseFee)
                            .decimal_len(18, 6)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Payments::EnergyFee)
                            .decimal_len(18, 6)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Payments::OveruseFee)
                            .decimal_len(18, 6)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Payments::TotalAmount)
                            .decimal_len(18, 6)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Payments::PaidAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Payments {
    Table,
    TransactionId,
    BaseFee,
    EnergyFee,
    OveruseFee,
    TotalAmount,
    PaidAt,
}
