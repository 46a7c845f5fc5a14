//! `transactions` table (§3 Transaction).

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    pub charge_point_id: String,
    pub connector_id: i32,
    pub id_tag: String,
    pub meter_start: i64,
    pub start_timestamp: DateTimeUtc,
    pub meter_stop: Option<i64>,
    pub stop_timestamp: Option<DateTimeUtc>,
    pub stop_reason: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
