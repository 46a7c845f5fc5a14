//! Database repository implementations.
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod card_repository;
pub mod charge_point_repository;
pub mod community_settings_repository;
pub mod id_tag_repository;
pub mod repository_provider;
pub mod status_log_repository;
pub mod tariff_repository;
pub mod transaction_repository;

pub use repository_provider::SeaOrmRepositoryProvider;
