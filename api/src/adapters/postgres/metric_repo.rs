//! PostgreSQL adapter for MetricRepository
//!
//! Operational tables are counted through their entities. Admin dataset
//! tables are only ever aggregated, so they are queried with plain SQL
//! joined to `dashboard_datasets` for the period.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbBackend, EntityTrait, FromQueryResult, PaginatorTrait,
    QueryFilter, Statement, Value,
};

use crate::app::scoring_config::{ATTENDANCE_PRESENT_STATUS, ATTENDANCE_PRESENT_VALUE};
use crate::domain::entities::{PeriodKey, PersonId, Role, SessionKind};
use crate::domain::ports::MetricRepository;
use crate::entity::{persons, tl_daily_activities, tl_sessions, tl_training_participations};
use crate::error::DomainError;

#[derive(Debug, FromQueryResult)]
struct Aggregate {
    value: f64,
}

/// PostgreSQL implementation of MetricRepository
pub struct PostgresMetricRepository {
    db: DatabaseConnection,
}

impl PostgresMetricRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn aggregate(&self, sql: &str, values: Vec<Value>) -> Result<f64, DomainError> {
        let row = Aggregate::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            values,
        ))
        .one(&self.db)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(row.map(|r| r.value).unwrap_or(0.0))
    }

    /// `expr` over one dataset table for a person's period
    async fn dataset_aggregate(
        &self,
        expr: &str,
        table: &str,
        person_id: &PersonId,
        period: &PeriodKey,
    ) -> Result<f64, DomainError> {
        let sql = format!(
            "SELECT COALESCE({expr}, 0)::float8 AS value \
             FROM {table} x \
             INNER JOIN dashboard_datasets dd ON x.dataset_id = dd.id \
             WHERE x.person_id = $1 AND dd.period_month = $2 AND dd.period_year = $3"
        );
        self.aggregate(
            &sql,
            vec![
                person_id.0.into(),
                (period.month() as i32).into(),
                period.year().into(),
            ],
        )
        .await
    }
}

#[async_trait]
impl MetricRepository for PostgresMetricRepository {
    async fn count_daily_activities(
        &self,
        person_id: &PersonId,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<u64, DomainError> {
        tl_daily_activities::Entity::find()
            .filter(tl_daily_activities::Column::PersonId.eq(person_id.0))
            .filter(tl_daily_activities::Column::Date.gte(start))
            .filter(tl_daily_activities::Column::Date.lte(end))
            .filter(tl_daily_activities::Column::DeletedAt.is_null())
            .count(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))
    }

    async fn count_sessions(
        &self,
        person_id: &PersonId,
        kind: SessionKind,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<u64, DomainError> {
        tl_sessions::Entity::find()
            .filter(tl_sessions::Column::PersonId.eq(person_id.0))
            .filter(tl_sessions::Column::SessionType.eq(kind.to_string()))
            .filter(tl_sessions::Column::Date.gte(start))
            .filter(tl_sessions::Column::Date.lte(end))
            .filter(tl_sessions::Column::DeletedAt.is_null())
            .count(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))
    }

    async fn attendance_percentage(
        &self,
        person_id: &PersonId,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<f64, DomainError> {
        self.aggregate(
            "SELECT COALESCE(AVG(CASE WHEN status = $2 THEN $3 ELSE 0.0 END), 0)::float8 AS value \
             FROM tl_attendance_records \
             WHERE tl_person_id = $1 AND date >= $4 AND date <= $5 AND deleted_at IS NULL",
            vec![
                person_id.0.into(),
                ATTENDANCE_PRESENT_STATUS.into(),
                ATTENDANCE_PRESENT_VALUE.into(),
                start.into(),
                end.into(),
            ],
        )
        .await
    }

    async fn count_training_participations(
        &self,
        person_id: &PersonId,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<u64, DomainError> {
        tl_training_participations::Entity::find()
            .filter(tl_training_participations::Column::TlPersonId.eq(person_id.0))
            .filter(tl_training_participations::Column::Date.gte(start))
            .filter(tl_training_participations::Column::Date.lte(end))
            .filter(tl_training_participations::Column::DeletedAt.is_null())
            .count(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))
    }

    async fn sum_sales_flp(
        &self,
        person_id: &PersonId,
        period: &PeriodKey,
    ) -> Result<f64, DomainError> {
        self.dataset_aggregate("SUM(x.flp_amount)", "sales_flp", person_id, period)
            .await
    }

    async fn avg_quiz_score(
        &self,
        person_id: &PersonId,
        period: &PeriodKey,
    ) -> Result<f64, DomainError> {
        self.dataset_aggregate("AVG(x.score)", "quiz_results", person_id, period)
            .await
    }

    async fn sum_apple_logins(
        &self,
        person_id: &PersonId,
        period: &PeriodKey,
    ) -> Result<f64, DomainError> {
        self.dataset_aggregate("SUM(x.login_count)", "apple_logins", person_id, period)
            .await
    }

    async fn sum_apple_points(
        &self,
        person_id: &PersonId,
        period: &PeriodKey,
    ) -> Result<f64, DomainError> {
        self.dataset_aggregate("SUM(x.points)", "apple_points", person_id, period)
            .await
    }

    async fn sum_myhero_points(
        &self,
        person_id: &PersonId,
        period: &PeriodKey,
    ) -> Result<f64, DomainError> {
        self.dataset_aggregate("SUM(x.points)", "myhero_points", person_id, period)
            .await
    }

    async fn sum_prospects(
        &self,
        person_id: &PersonId,
        period: &PeriodKey,
    ) -> Result<f64, DomainError> {
        self.dataset_aggregate("SUM(x.prospect_count)", "prospects", person_id, period)
            .await
    }

    async fn count_active_salesmen(&self) -> Result<u64, DomainError> {
        persons::Entity::find()
            .filter(persons::Column::Role.eq(Role::Salesman.to_string()))
            .filter(persons::Column::Active.eq(true))
            .filter(persons::Column::DeletedAt.is_null())
            .count(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))
    }
}
