//! `meter_samples` table (§3): append-only.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "meter_samples")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub transaction_id: i64,
    pub charge_point_id: String,
    pub connector_id: i32,
    pub timestamp: DateTimeUtc,
    pub measurand: String,
    pub unit: Option<String>,
    pub value: f64,
    pub phase: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
