//! `card_whitelist` table: (idTag, chargePointId) pairs restricting where a
//! card may start a transaction (§3 CardWhitelist).

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "card_whitelist")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub id_tag: String,
    pub charge_point_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
