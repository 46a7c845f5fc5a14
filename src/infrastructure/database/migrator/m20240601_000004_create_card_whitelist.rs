//! Create card_whitelist table: per-card_id restriction to a set of charge points (§9).
//! An id_tag with no rows here is unrestricted.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CardWhitelist::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CardWhitelist::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CardWhitelist::IdTag).string().not_null())
                    .col(
                        ColumnDef::new(CardWhitelist::ChargePointId)
                            .string()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_card_whitelist_id_tag")
                    .table(CardWhitelist::Table)
                    .col(CardWhitelist::IdTag)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CardWhitelist::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum CardWhitelist {
    Table,
    Id,
    IdTag,
    ChargePointId,
}
