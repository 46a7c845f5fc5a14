//! Create status_logs table: append-only StatusNotification history (§4.9).

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StatusLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StatusLogs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StatusLogs::ChargePointId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StatusLogs::ConnectorId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StatusLogs::Status).string().not_null())
                    .col(ColumnDef::new(StatusLogs::ErrorCode).string())
                    .col(
                        ColumnDef::new(StatusLogs::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_status_logs_charge_point")
                    .table(StatusLogs::Table)
                    .col(StatusLogs::ChargePointId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StatusLogs::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum StatusLogs {
    Table,
    Id,
    ChargePointId,
    ConnectorId,
    Status,
    ErrorCode,
    Timestamp,
}
