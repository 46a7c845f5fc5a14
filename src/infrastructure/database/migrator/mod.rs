//! Database migrations module.

pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_charge_points;
mod m20240601_000002_create_cards;
mod m20240601_000003_create_id_tags;
mod m20240601_000004_create_card_whitelist;
mod m20240601_000005_create_tariff_segments;
mod m20240601_000006_create_community_settings;
mod m20240601_000007_create_transactions;
mod m20240601_000008_create_meter_samples;
mod m20240601_000009_create_stop_records;
mod m20240601_000010_create_payments;
mod m20240601_000011_create_realtime_deductions;
mod m20240601_000012_create_status_logs;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_charge_points::Migration),
            Box::new(m20240601_000002_create_cards::Migration),
            Box::new(m20240601_000003_create_id_tags::Migration),
            Box::new(m20240601_000004_create_card_whitelist::Migration),
            Box::new(m20240601_000005_create_tariff_segments::Migration),
            Box::new(m20240601_000006_create_community_settings::Migration),
            Box::new(m20240601_000007_create_transactions::Migration),
            Box::new(m20240601_000008_create_meter_samples::Migration),
            Box::new(m20240601_000009_create_stop_records::Migration),
            Box::new(m20240601_000010_create_payments::Migration),
            Box::new(m20240601_000011_create_realtime_deductions::Migration),
            Box::new(m20240601_000012_create_status_logs::Migration),
        ]
    }
}
