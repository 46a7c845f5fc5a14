//! Create tariff_segments table (§4.2): per-date time-of-day price bands.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TariffSegments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TariffSegments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TariffSegments::Date).date().not_null())
                    .col(
                        ColumnDef::new(TariffSegments::StartMinute)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TariffSegments::EndMinute)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TariffSegments::Price)
                            .decimal_len(18, 6)
                            .not_null(),
                    )
                    .col(ColumnDef::new(TariffSegments::Label).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tariff_segments_date")
                    .table(TariffSegments::Table)
                    .col(TariffSegments::Date)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TariffSegments::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum TariffSegments {
    Table,
    Id,
    Date,
    StartMinute,
    EndMinute,
    Price,
    Label,
}
