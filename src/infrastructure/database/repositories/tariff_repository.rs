//! SeaORM implementation of TariffRepository.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, Set,
};

use crate::domain::repository::TariffRepository;
use crate::domain::tariff::{TariffSegment, DEFAULT_PRICE};
use crate::infrastructure::database::entities::tariff_segment;
use crate::shared::DomainResult;

pub struct SeaOrmTariffRepository {
    db: DatabaseConnection,
}

impl SeaOrmTariffRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: tariff_segment::Model) -> TariffSegment {
    TariffSegment {
        date: m.date,
        start_minute: m.start_minute as u16,
        end_minute: m.end_minute as u16,
        price: m.price,
        label: m.label,
    }
}

#[async_trait]
impl TariffRepository for SeaOrmTariffRepository {
    async fn segments_for_date(&self, date: NaiveDate) -> DomainResult<Vec<TariffSegment>> {
        let models = tariff_segment::Entity::find()
            .filter(tariff_segment::Column::Date.eq(date))
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn all_segments(&self) -> DomainResult<Vec<TariffSegment>> {
        let models = tariff_segment::Entity::find().all(&self.db).await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn add_segment(&self, segment: TariffSegment) -> DomainResult<()> {
        tariff_segment::ActiveModel {
            id: NotSet,
            date: Set(segment.date),
            start_minute: Set(segment.start_minute as i32),
            end_minute: Set(segment.end_minute as i32),
            price: Set(segment.price),
            label: Set(segment.label),
        }
        .insert(&self.db)
        .await?;
        Ok(())
    }

    async fn delete_segments_for_date(&self, date: NaiveDate) -> DomainResult<()> {
        tariff_segment::Entity::delete_many()
            .filter(tariff_segment::Column::Date.eq(date))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn default_price(&self) -> DomainResult<Decimal> {
        Ok(DEFAULT_PRICE)
    }
}
