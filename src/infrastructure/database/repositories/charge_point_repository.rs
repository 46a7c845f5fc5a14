//! SeaORM implementation of ChargePointRepository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, DatabaseConnection, EntityTrait, Set};
use tracing::{debug, info};

use crate::domain::charge_point::{AdminState, ChargePoint};
use crate::domain::repository::ChargePointRepository;
use crate::infrastructure::database::entities::charge_point;
use crate::shared::DomainResult;

pub struct SeaOrmChargePointRepository {
    db: DatabaseConnection,
}

impl SeaOrmChargePointRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: charge_point::Model) -> ChargePoint {
    ChargePoint {
        id: m.id,
        display_name: m.display_name,
        admin_state: AdminState::from_str(&m.admin_state),
        max_current_a: m.max_current_a,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

#[async_trait]
impl ChargePointRepository for SeaOrmChargePointRepository {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<ChargePoint>> {
        let model = charge_point::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<ChargePoint>> {
        let models = charge_point::Entity::find().all(&self.db).await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn upsert(&self, cp: ChargePoint) -> DomainResult<ChargePoint> {
        debug!(charge_point_id = %cp.id, "upserting charge point");
        let existing = charge_point::Entity::find_by_id(&cp.id).one(&self.db).await?;

        let model = charge_point::ActiveModel {
            id: Set(cp.id.clone()),
            display_name: Set(cp.display_name.clone()),
            admin_state: Set(cp.admin_state.as_str().to_string()),
            max_current_a: Set(cp.max_current_a),
            created_at: Set(existing.as_ref().map(|m| m.created_at).unwrap_or(cp.created_at)),
            updated_at: Set(Utc::now()),
        };

        let saved = if existing.is_some() {
            model.update(&self.db).await?
        } else {
            model.insert(&self.db).await?
        };

        info!(charge_point_id = %cp.id, "charge point saved");
        Ok(model_to_domain(saved))
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        charge_point::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }

    async fn set_max_current(&self, id: &str, max_current_a: f64) -> DomainResult<()> {
        let model = charge_point::ActiveModel {
            id: Set(id.to_string()),
            max_current_a: Set(max_current_a),
            updated_at: Set(Utc::now()),
            display_name: NotSet,
            admin_state: NotSet,
            created_at: NotSet,
        };
        model.update(&self.db).await?;
        Ok(())
    }
}
