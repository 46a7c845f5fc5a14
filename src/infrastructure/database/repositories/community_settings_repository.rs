//! SeaORM implementation of CommunitySettingsRepository.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

use crate::domain::community_settings::CommunitySettings;
use crate::domain::repository::CommunitySettingsRepository;
use crate::infrastructure::database::entities::community_settings::{self, SINGLETON_ID};
use crate::shared::{DomainError, DomainResult};

pub struct SeaOrmCommunitySettingsRepository {
    db: DatabaseConnection,
}

impl SeaOrmCommunitySettingsRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: community_settings::Model) -> CommunitySettings {
    CommunitySettings {
        enabled: m.enabled,
        contract_kw: m.contract_kw,
        voltage_v: m.voltage_v,
        phases: m.phases,
        min_current_a: m.min_current_a,
        max_current_a: m.max_current_a,
    }
}

#[async_trait]
impl CommunitySettingsRepository for SeaOrmCommunitySettingsRepository {
    async fn get(&self) -> DomainResult<CommunitySettings> {
        let model = community_settings::Entity::find_by_id(SINGLETON_ID)
            .one(&self.db)
            .await?
            .ok_or_else(|| {
                DomainError::Storage("community_settings singleton row missing".to_string())
            })?;
        Ok(model_to_domain(model))
    }

    async fn update(&self, settings: CommunitySettings) -> DomainResult<()> {
        community_settings::ActiveModel {
            id: Set(SINGLETON_ID),
            enabled: Set(settings.enabled),
            contract_kw: Set(settings.contract_kw),
            voltage_v: Set(settings.voltage_v),
            phases: Set(settings.phases),
            min_current_a: Set(settings.min_current_a),
            max_current_a: Set(settings.max_current_a),
        }
        .update(&self.db)
        .await?;
        Ok(())
    }
}
