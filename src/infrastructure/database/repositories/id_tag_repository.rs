//! SeaORM implementation of IdTagRepository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

use crate::domain::id_tag::{AuthorizationStatus, IdTag};
use crate::domain::repository::IdTagRepository;
use crate::domain::whitelist::WhitelistEntry;
use crate::infrastructure::database::entities::{id_tag, whitelist_entry};
use crate::shared::DomainResult;

pub struct SeaOrmIdTagRepository {
    db: DatabaseConnection,
}

impl SeaOrmIdTagRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: id_tag::Model) -> IdTag {
    IdTag {
        id_tag: m.id_tag,
        status: AuthorizationStatus::from_str(&m.status),
        expiry_date: m.expiry_date,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

#[async_trait]
impl IdTagRepository for SeaOrmIdTagRepository {
    async fn find_by_id(&self, id_tag_value: &str) -> DomainResult<Option<IdTag>> {
        let model = id_tag::Entity::find_by_id(id_tag_value).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn upsert(&self, tag: IdTag) -> DomainResult<IdTag> {
        let existing = id_tag::Entity::find_by_id(&tag.id_tag).one(&self.db).await?;

        let model = id_tag::ActiveModel {
            id_tag: Set(tag.id_tag.clone()),
            status: Set(tag.status.as_str().to_string()),
            expiry_date: Set(tag.expiry_date),
            created_at: Set(existing.as_ref().map(|m| m.created_at).unwrap_or(tag.created_at)),
            updated_at: Set(Utc::now()),
        };

        let saved = if existing.is_some() {
            model.update(&self.db).await?
        } else {
            model.insert(&self.db).await?
        };
        Ok(model_to_domain(saved))
    }

    async fn whitelist_for(&self, id_tag_value: &str) -> DomainResult<Vec<WhitelistEntry>> {
        let models = whitelist_entry::Entity::find()
            .filter(whitelist_entry::Column::IdTag.eq(id_tag_value))
            .all(&self.db)
            .await?;
        Ok(models
            .into_iter()
            .map(|m| WhitelistEntry {
                id_tag: m.id_tag,
                charge_point_id: m.charge_point_id,
            })
            .collect())
    }

    async fn add_whitelist_entry(&self, entry: WhitelistEntry) -> DomainResult<()> {
        whitelist_entry::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            id_tag: Set(entry.id_tag),
            charge_point_id: Set(entry.charge_point_id),
        }
        .insert(&self.db)
        .await?;
        Ok(())
    }
}
