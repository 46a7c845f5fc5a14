//! Core business entities, traits, and value objects (§3).

pub mod card;
pub mod charge_point;
pub mod community_settings;
pub mod id_tag;
pub mod meter_sample;
pub mod payment;
pub mod realtime_deduction;
pub mod repository;
pub mod status_log;
pub mod stop_record;
pub mod tariff;
pub mod transaction;
pub mod whitelist;

pub use card::Card;
pub use charge_point::{AdminState, ChargePoint};
pub use community_settings::CommunitySettings;
pub use id_tag::{AuthorizationStatus, IdTag};
pub use meter_sample::MeterSample;
pub use payment::Payment;
pub use realtime_deduction::RealtimeDeduction;
pub use repository::{
    CardRepository, ChargePointRepository, CommunitySettingsRepository, IdTagRepository,
    RepositoryProvider, StatusLogRepository, TariffRepository, TransactionRepository,
};
pub use status_log::StatusLog;
pub use stop_record::StopRecord;
pub use tariff::TariffSegment;
pub use transaction::Transaction;
pub use whitelist::WhitelistEntry;
