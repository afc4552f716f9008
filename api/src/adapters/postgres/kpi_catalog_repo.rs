//! PostgreSQL adapter for KpiCatalog

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::domain::entities::{
    InputSource, KpiItem, KpiItemId, MetricKey, PeriodKey, PersonId, PersonKpiTarget, Pillar,
    PillarId,
};
use crate::domain::ports::KpiCatalog;
use crate::entity::{kpi_items, person_kpi_targets, pillars};
use crate::error::DomainError;

/// PostgreSQL implementation of KpiCatalog
pub struct PostgresKpiCatalog {
    db: DatabaseConnection,
}

impl PostgresKpiCatalog {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl KpiCatalog for PostgresKpiCatalog {
    async fn find_tl_kpi_items(&self) -> Result<Vec<KpiItem>, DomainError> {
        let results = kpi_items::Entity::find()
            .filter(kpi_items::Column::AppliesToTl.eq(true))
            .filter(kpi_items::Column::DeletedAt.is_null())
            .order_by_asc(kpi_items::Column::PillarId)
            .order_by_asc(kpi_items::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn find_all_kpi_items(&self) -> Result<Vec<KpiItem>, DomainError> {
        let results = kpi_items::Entity::find()
            .filter(kpi_items::Column::DeletedAt.is_null())
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn find_all_pillars(&self) -> Result<Vec<Pillar>, DomainError> {
        let results = pillars::Entity::find()
            .filter(pillars::Column::DeletedAt.is_null())
            .order_by_asc(pillars::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn find_person_targets(
        &self,
        person_id: &PersonId,
        period: &PeriodKey,
    ) -> Result<Vec<PersonKpiTarget>, DomainError> {
        let results = person_kpi_targets::Entity::find()
            .filter(person_kpi_targets::Column::PersonId.eq(person_id.0))
            .filter(person_kpi_targets::Column::PeriodMonth.eq(period.month() as i32))
            .filter(person_kpi_targets::Column::PeriodYear.eq(period.year()))
            .filter(person_kpi_targets::Column::DeletedAt.is_null())
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results
            .into_iter()
            .map(|m| PersonKpiTarget {
                person_id: PersonId(m.person_id),
                kpi_item_id: KpiItemId(m.kpi_item_id),
                period: *period,
                target_value: m.target_value,
            })
            .collect())
    }
}

/// Convert SeaORM model to domain entity
impl From<kpi_items::Model> for KpiItem {
    fn from(model: kpi_items::Model) -> Self {
        let metric_key = model.metric_key.as_deref().and_then(|raw| {
            let parsed = raw.parse::<MetricKey>().ok();
            if parsed.is_none() {
                tracing::warn!(kpi_item_id = %model.id, metric_key = raw, "Unknown metric key on KPI item");
            }
            parsed
        });

        KpiItem {
            id: KpiItemId(model.id),
            pillar_id: PillarId(model.pillar_id),
            name: model.name,
            weight: model.weight,
            target_value: model.target_value,
            unit: model.unit,
            frequency: model.frequency,
            input_source: model.input_source.parse().unwrap_or(InputSource::Admin),
            applies_to_tl: model.applies_to_tl,
            applies_to_salesman: model.applies_to_salesman,
            metric_key,
            notes: model.notes,
        }
    }
}

impl From<pillars::Model> for Pillar {
    fn from(model: pillars::Model) -> Self {
        Pillar {
            id: PillarId(model.id),
            name: model.name,
            weight: model.weight,
        }
    }
}
