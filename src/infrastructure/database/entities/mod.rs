pub mod card;
pub mod charge_point;
pub mod community_settings;
pub mod id_tag;
pub mod meter_sample;
pub mod payment;
pub mod realtime_deduction;
pub mod status_log;
pub mod stop_record;
pub mod tariff_segment;
pub mod transaction;
pub mod whitelist_entry;
