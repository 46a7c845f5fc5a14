//! Create community_settings table and seed its single row (§4.8).

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CommunitySettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CommunitySettings::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CommunitySettings::Enabled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(CommunitySettings::ContractKw)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(CommunitySettings::VoltageV)
                            .double()
                            .not_null()
                            .default(220.0),
                    )
                    .col(
                        ColumnDef::new(CommunitySettings::Phases)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(CommunitySettings::MinCurrentA)
                            .double()
                            .not_null()
                            .default(6.0),
                    )
                    .col(
                        ColumnDef::new(CommunitySettings::MaxCurrentA)
                            .double()
                            .not_null()
                            .default(32.0),
                    )
                    .to_owned(),
            )
            .await?;

        let insert = Query::insert()
            .into_table(CommunitySettings::Table)
            .columns([
                CommunitySettings::Id,
                CommunitySettings::Enabled,
                CommunitySettings::ContractKw,
                CommunitySettings::VoltageV,
                CommunitySettings::Phases,
                CommunitySettings::MinCurrentA,
                CommunitySettings::MaxCurrentA,
            ])
            .values_panic([
                1.into(),
                false.into(),
                0.0.into(),
                220.0.into(),
                1.into(),
                6.0.into(),
                32.0.into(),
            ])
            .to_owned();

        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CommunitySettings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum CommunitySettings {
    Table,
    Id,
    Enabled,
    ContractKw,
    VoltageV,
    Phases,
    MinCurrentA,
    MaxCurrentA,
}
