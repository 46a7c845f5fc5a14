//! `payments` table (§3): exactly one row per closed transaction.

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub transaction_id: i64,
    #[sea_orm(column_type = "Decimal(Some((18, 6)))")]
    pub base_fee: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 6)))")]
    pub energy_fee: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 6)))")]
    pub overuse_fee: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 6)))")]
    pub total_amount: Decimal,
    pub paid_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
