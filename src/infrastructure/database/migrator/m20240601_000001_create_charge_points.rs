//! Create charge_points table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ChargePoints::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ChargePoints::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ChargePoints::DisplayName).string())
                    .col(
                        ColumnDef::new(ChargePoints::AdminState)
                            .string()
                            .not_null()
                            .default("enabled"),
                    )
                    .col(
                        ColumnDef::new(ChargePoints::MaxCurrentA)
                            .double()
                            .not_null()
                            .default(16.0),
                    )
                    .col(
                        ColumnDef::new(ChargePoints::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChargePoints::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ChargePoints::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ChargePoints {
    Table,
    Id,
    DisplayName,
    AdminState,
    MaxCurrentA,
    CreatedAt,
    UpdatedAt,
}
