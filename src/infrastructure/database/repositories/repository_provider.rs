//! SeaORM implementation of RepositoryProvider.

use sea_orm::DatabaseConnection;

use crate::domain::repository::{
    CardRepository, ChargePointRepository, CommunitySettingsRepository, IdTagRepository,
    RepositoryProvider, StatusLogRepository, TariffRepository, TransactionRepository,
};

use super::card_repository::SeaOrmCardRepository;
use super::charge_point_repository::SeaOrmChargePointRepository;
use super::community_settings_repository::SeaOrmCommunitySettingsRepository;
use super::id_tag_repository::SeaOrmIdTagRepository;
use super::status_log_repository::SeaOrmStatusLogRepository;
use super::tariff_repository::SeaOrmTariffRepository;
use super::transaction_repository::SeaOrmTransactionRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let cp = repos.charge_points().find_by_id("CP001").await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    charge_points: SeaOrmChargePointRepository,
    cards: SeaOrmCardRepository,
    id_tags: SeaOrmIdTagRepository,
    tariffs: SeaOrmTariffRepository,
    transactions: SeaOrmTransactionRepository,
    community_settings: SeaOrmCommunitySettingsRepository,
    status_logs: SeaOrmStatusLogRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            charge_points: SeaOrmChargePointRepository::new(db.clone()),
            cards: SeaOrmCardRepository::new(db.clone()),
            id_tags: SeaOrmIdTagRepository::new(db.clone()),
            tariffs: SeaOrmTariffRepository::new(db.clone()),
            transactions: SeaOrmTransactionRepository::new(db.clone()),
            community_settings: SeaOrmCommunitySettingsRepository::new(db.clone()),
            status_logs: SeaOrmStatusLogRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn charge_points(&self) -> &dyn ChargePointRepository {
        &self.charge_points
    }

    fn cards(&self) -> &dyn CardRepository {
        &self.cards
    }

    fn id_tags(&self) -> &dyn IdTagRepository {
        &self.id_tags
    }

    fn tariffs(&self) -> &dyn TariffRepository {
        &self.tariffs
    }

    fn transactions(&self) -> &dyn TransactionRepository {
        &self.transactions
    }

    fn community_settings(&self) -> &dyn CommunitySettingsRepository {
        &self.community_settings
    }

    fn status_logs(&self) -> &dyn StatusLogRepository {
        &self.status_logs
    }
}
