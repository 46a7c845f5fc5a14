//! `tariff_segments` table: daily time-of-use pricing rules (§3/§4.2).

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tariff_segments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub date: Date,
    pub start_minute: i32,
    pub end_minute: i32,
    #[sea_orm(column_type = "Decimal(Some((18, 6)))")]
    pub price: Decimal,
    pub label: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
