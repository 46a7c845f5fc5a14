//! SeaORM implementation of StatusLogRepository.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, DatabaseConnection, Set};

use crate::domain::repository::StatusLogRepository;
use crate::domain::status_log::StatusLog;
use crate::infrastructure::database::entities::status_log;
use crate::shared::DomainResult;

pub struct SeaOrmStatusLogRepository {
    db: DatabaseConnection,
}

impl SeaOrmStatusLogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StatusLogRepository for SeaOrmStatusLogRepository {
    async fn append(&self, log: StatusLog) -> DomainResult<()> {
        status_log::ActiveModel {
            id: NotSet,
            charge_point_id: Set(log.charge_point_id),
            connector_id: Set(log.connector_id),
            status: Set(log.status),
            error_code: Set(log.error_code),
            timestamp: Set(log.timestamp),
        }
        .insert(&self.db)
        .await?;
        Ok(())
    }
}
