//! `status_logs` table (§3): append-only StatusNotification history.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "status_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub charge_point_id: String,
    pub connector_id: i32,
    pub status: String,
    pub error_code: Option<String>,
    pub timestamp: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
