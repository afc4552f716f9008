//! PostgreSQL adapter for EvaluationRepository
//!
//! An evaluation and its details are always written in one transaction.
//! The existing evaluation row is locked `FOR UPDATE` so concurrent writers
//! for the same person and period queue up instead of interleaving.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, DbErr,
    EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
    Statement, TransactionTrait,
};
use uuid::Uuid;

use crate::domain::entities::{
    CalculatedEvaluation, Evaluation, EvaluationDetail, EvaluationDetailId, EvaluationId,
    EvaluationPeriod, EvaluationQuery, EvaluationSort, KpiItemId, PeriodId, PeriodKey, PersonId,
    SortDirection, WriteOutcome,
};
use crate::domain::ports::EvaluationRepository;
use crate::entity::{evaluation_details, evaluation_periods, evaluations};
use crate::error::DomainError;

/// PostgreSQL implementation of EvaluationRepository
pub struct PostgresEvaluationRepository {
    db: DatabaseConnection,
}

impl PostgresEvaluationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn db_error(e: DbErr) -> DomainError {
    let message = e.to_string();
    if message.contains("duplicate key") {
        DomainError::Conflict(message)
    } else {
        DomainError::Database(message)
    }
}

#[async_trait]
impl EvaluationRepository for PostgresEvaluationRepository {
    async fn get_or_create_period(
        &self,
        key: &PeriodKey,
    ) -> Result<EvaluationPeriod, DomainError> {
        // Idempotent against concurrent first calculations
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            "INSERT INTO evaluation_periods (id, period_month, period_year, created_at) \
             VALUES ($1, $2, $3, NOW()) \
             ON CONFLICT (period_month, period_year) DO NOTHING",
            [
                Uuid::new_v4().into(),
                (key.month() as i32).into(),
                key.year().into(),
            ],
        );

        self.db.execute(stmt).await.map_err(db_error)?;

        self.find_period(key).await?.ok_or_else(|| {
            DomainError::Internal(format!("Period {} missing after upsert", key))
        })
    }

    async fn find_period(&self, key: &PeriodKey) -> Result<Option<EvaluationPeriod>, DomainError> {
        let result = evaluation_periods::Entity::find()
            .filter(evaluation_periods::Column::PeriodMonth.eq(key.month() as i32))
            .filter(evaluation_periods::Column::PeriodYear.eq(key.year()))
            .one(&self.db)
            .await
            .map_err(db_error)?;

        result.map(EvaluationPeriod::try_from).transpose()
    }

    async fn find_by_id(&self, id: &EvaluationId) -> Result<Option<Evaluation>, DomainError> {
        let result = evaluations::Entity::find_by_id(id.0)
            .find_also_related(evaluation_periods::Entity)
            .one(&self.db)
            .await
            .map_err(db_error)?;

        result.map(to_evaluation).transpose()
    }

    async fn find_by_person_and_period(
        &self,
        person_id: &PersonId,
        period_id: &PeriodId,
    ) -> Result<Option<Evaluation>, DomainError> {
        let result = evaluations::Entity::find()
            .filter(evaluations::Column::PersonId.eq(person_id.0))
            .filter(evaluations::Column::EvaluationPeriodId.eq(period_id.0))
            .find_also_related(evaluation_periods::Entity)
            .one(&self.db)
            .await
            .map_err(db_error)?;

        result.map(to_evaluation).transpose()
    }

    async fn list(&self, query: &EvaluationQuery) -> Result<(Vec<Evaluation>, u64), DomainError> {
        let mut select = evaluations::Entity::find()
            .join(
                sea_orm::JoinType::InnerJoin,
                evaluations::Relation::EvaluationPeriods.def(),
            );

        if let Some(period) = query.period {
            select = select
                .filter(evaluation_periods::Column::PeriodMonth.eq(period.month() as i32))
                .filter(evaluation_periods::Column::PeriodYear.eq(period.year()));
        }
        if let Some(person_id) = query.person_id {
            select = select.filter(evaluations::Column::PersonId.eq(person_id.0));
        }

        let total = select.clone().count(&self.db).await.map_err(db_error)?;

        let column = match query.sort_by {
            EvaluationSort::CreatedAt => evaluations::Column::CreatedAt,
            EvaluationSort::TotalScore => evaluations::Column::TotalScore,
        };
        let order = match query.direction {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        };

        let rows = select
            .select_also(evaluation_periods::Entity)
            .order_by(column, order)
            .offset(query.offset())
            .limit(query.limit)
            .all(&self.db)
            .await
            .map_err(db_error)?;

        let page = rows
            .into_iter()
            .map(to_evaluation)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((page, total))
    }

    async fn save(
        &self,
        person_id: &PersonId,
        period: &EvaluationPeriod,
        calculated: &CalculatedEvaluation,
    ) -> Result<(Evaluation, WriteOutcome), DomainError> {
        let txn = self.db.begin().await.map_err(db_error)?;

        let existing = evaluations::Entity::find()
            .filter(evaluations::Column::PersonId.eq(person_id.0))
            .filter(evaluations::Column::EvaluationPeriodId.eq(period.id.0))
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_error)?;

        let (model, outcome) = match existing {
            Some(model) => {
                let mut active: evaluations::ActiveModel = model.into();
                active.total_score = Set(calculated.total_score);
                let updated = active.update(&txn).await.map_err(db_error)?;

                evaluation_details::Entity::delete_many()
                    .filter(evaluation_details::Column::EvaluationId.eq(updated.id))
                    .exec(&txn)
                    .await
                    .map_err(db_error)?;

                (updated, WriteOutcome::Updated)
            }
            None => {
                let inserted = evaluations::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    evaluation_period_id: Set(period.id.0),
                    person_id: Set(person_id.0),
                    total_score: Set(calculated.total_score),
                    created_at: Set(Some(Utc::now().fixed_offset())),
                }
                .insert(&txn)
                .await
                .map_err(db_error)?;

                (inserted, WriteOutcome::Created)
            }
        };

        if !calculated.details.is_empty() {
            let rows = calculated
                .details
                .iter()
                .map(|d| evaluation_details::ActiveModel {
                    id: Set(d.id.0),
                    evaluation_id: Set(model.id),
                    kpi_item_id: Set(d.kpi_item_id.0),
                    actual_value: Set(d.actual_value),
                    achievement_ratio: Set(d.achievement_ratio),
                    score: Set(d.score),
                });

            evaluation_details::Entity::insert_many(rows)
                .exec(&txn)
                .await
                .map_err(db_error)?;
        }

        txn.commit().await.map_err(db_error)?;

        let evaluation = Evaluation {
            id: EvaluationId(model.id),
            period_id: period.id,
            period: period.key,
            person_id: *person_id,
            total_score: model.total_score,
            created_at: model
                .created_at
                .map(|t| t.with_timezone(&Utc))
                .unwrap_or_else(Utc::now),
        };
        Ok((evaluation, outcome))
    }

    async fn delete(&self, id: &EvaluationId) -> Result<(), DomainError> {
        let txn = self.db.begin().await.map_err(db_error)?;

        evaluation_details::Entity::delete_many()
            .filter(evaluation_details::Column::EvaluationId.eq(id.0))
            .exec(&txn)
            .await
            .map_err(db_error)?;

        let result = evaluations::Entity::delete_by_id(id.0)
            .exec(&txn)
            .await
            .map_err(db_error)?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound(format!("Evaluation not found: {}", id)));
        }

        txn.commit().await.map_err(db_error)?;
        Ok(())
    }

    async fn find_details(
        &self,
        evaluation_id: &EvaluationId,
    ) -> Result<Vec<EvaluationDetail>, DomainError> {
        let results = evaluation_details::Entity::find()
            .filter(evaluation_details::Column::EvaluationId.eq(evaluation_id.0))
            .all(&self.db)
            .await
            .map_err(db_error)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn find_ranked(
        &self,
        period_id: &PeriodId,
        limit: u64,
    ) -> Result<Vec<Evaluation>, DomainError> {
        let rows = evaluations::Entity::find()
            .filter(evaluations::Column::EvaluationPeriodId.eq(period_id.0))
            .order_by_desc(evaluations::Column::TotalScore)
            .limit(if limit > 0 { Some(limit) } else { None })
            .find_also_related(evaluation_periods::Entity)
            .all(&self.db)
            .await
            .map_err(db_error)?;

        rows.into_iter().map(to_evaluation).collect()
    }

    async fn find_details_for_period(
        &self,
        period_id: &PeriodId,
    ) -> Result<Vec<EvaluationDetail>, DomainError> {
        let results = evaluation_details::Entity::find()
            .join(
                sea_orm::JoinType::InnerJoin,
                evaluation_details::Relation::Evaluations.def(),
            )
            .filter(evaluations::Column::EvaluationPeriodId.eq(period_id.0))
            .all(&self.db)
            .await
            .map_err(db_error)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn find_recent_by_person(
        &self,
        person_id: &PersonId,
        limit: u64,
    ) -> Result<Vec<Evaluation>, DomainError> {
        let rows = evaluations::Entity::find()
            .join(
                sea_orm::JoinType::InnerJoin,
                evaluations::Relation::EvaluationPeriods.def(),
            )
            .filter(evaluations::Column::PersonId.eq(person_id.0))
            .order_by_desc(evaluation_periods::Column::PeriodYear)
            .order_by_desc(evaluation_periods::Column::PeriodMonth)
            .limit(limit)
            .select_also(evaluation_periods::Entity)
            .all(&self.db)
            .await
            .map_err(db_error)?;

        rows.into_iter().map(to_evaluation).collect()
    }
}

/// Evaluation rows always carry their period; a missing one means a broken
/// foreign key.
fn to_evaluation(
    (model, period): (evaluations::Model, Option<evaluation_periods::Model>),
) -> Result<Evaluation, DomainError> {
    let period = period.ok_or_else(|| {
        DomainError::Internal(format!("Evaluation {} has no period", model.id))
    })?;
    let period = EvaluationPeriod::try_from(period)?;

    Ok(Evaluation {
        id: EvaluationId(model.id),
        period_id: period.id,
        period: period.key,
        person_id: PersonId(model.person_id),
        total_score: model.total_score,
        created_at: model
            .created_at
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(Utc::now),
    })
}

impl TryFrom<evaluation_periods::Model> for EvaluationPeriod {
    type Error = DomainError;

    fn try_from(model: evaluation_periods::Model) -> Result<Self, Self::Error> {
        let month = u32::try_from(model.period_month).map_err(|_| {
            DomainError::Internal(format!("Stored period month out of range: {}", model.period_month))
        })?;

        Ok(EvaluationPeriod {
            id: PeriodId(model.id),
            key: PeriodKey::new(month, model.period_year)?,
            created_at: model
                .created_at
                .map(|t| t.with_timezone(&Utc))
                .unwrap_or_else(Utc::now),
        })
    }
}

impl From<evaluation_details::Model> for EvaluationDetail {
    fn from(model: evaluation_details::Model) -> Self {
        EvaluationDetail {
            id: EvaluationDetailId(model.id),
            evaluation_id: EvaluationId(model.evaluation_id),
            kpi_item_id: KpiItemId(model.kpi_item_id),
            actual_value: model.actual_value,
            achievement_ratio: model.achievement_ratio,
            score: model.score,
        }
    }
}
