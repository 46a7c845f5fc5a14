//! `realtime_deductions` table (§3): per-active-transaction billing cursor.

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "realtime_deductions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub transaction_id: i64,
    #[sea_orm(column_type = "Decimal(Some((18, 6)))")]
    pub debited_kwh: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 6)))")]
    pub debited_amount: Decimal,
    pub last_update: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
