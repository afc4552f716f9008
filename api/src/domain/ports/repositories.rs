//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).
//! Each port is deliberately narrow: the evaluation engine only sees the
//! queries it needs.

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::domain::entities::{
    CalculatedEvaluation, Evaluation, EvaluationDetail, EvaluationId, EvaluationPeriod,
    EvaluationQuery, KpiItem, PeriodId, PeriodKey, Person, PersonId, PersonKpiTarget, Pillar,
    Role, SessionKind, WriteOutcome,
};
use crate::error::DomainError;

/// Read-only access to the person directory
#[async_trait]
pub trait PersonRepository: Send + Sync {
    /// Find a person by ID
    async fn find_by_id(&self, id: &PersonId) -> Result<Option<Person>, DomainError>;

    /// All active persons holding a role
    async fn find_active_by_role(&self, role: Role) -> Result<Vec<Person>, DomainError>;

    /// Batch lookup; missing IDs are simply absent from the result
    async fn find_by_ids(&self, ids: &[PersonId]) -> Result<Vec<Person>, DomainError>;
}

/// Read-only KPI and pillar metadata
#[async_trait]
pub trait KpiCatalog: Send + Sync {
    /// KPI items applicable to team leaders, ordered by (pillar_id, name)
    async fn find_tl_kpi_items(&self) -> Result<Vec<KpiItem>, DomainError>;

    /// Every KPI item regardless of applicability
    async fn find_all_kpi_items(&self) -> Result<Vec<KpiItem>, DomainError>;

    async fn find_all_pillars(&self) -> Result<Vec<Pillar>, DomainError>;

    /// Per-person target overrides for one period
    async fn find_person_targets(
        &self,
        person_id: &PersonId,
        period: &PeriodKey,
    ) -> Result<Vec<PersonKpiTarget>, DomainError>;
}

/// Raw metric queries
///
/// Operational figures are scoped by an inclusive timestamp window. Admin
/// dataset figures are scoped by the dataset's own period fields.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetricRepository: Send + Sync {
    async fn count_daily_activities(
        &self,
        person_id: &PersonId,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<u64, DomainError>;

    async fn count_sessions(
        &self,
        person_id: &PersonId,
        kind: SessionKind,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<u64, DomainError>;

    /// Average of 100.0 per "hadir" record and 0.0 otherwise; 0 with no records
    async fn attendance_percentage(
        &self,
        person_id: &PersonId,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<f64, DomainError>;

    async fn count_training_participations(
        &self,
        person_id: &PersonId,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<u64, DomainError>;

    async fn sum_sales_flp(
        &self,
        person_id: &PersonId,
        period: &PeriodKey,
    ) -> Result<f64, DomainError>;

    async fn avg_quiz_score(
        &self,
        person_id: &PersonId,
        period: &PeriodKey,
    ) -> Result<f64, DomainError>;

    async fn sum_apple_logins(
        &self,
        person_id: &PersonId,
        period: &PeriodKey,
    ) -> Result<f64, DomainError>;

    async fn sum_apple_points(
        &self,
        person_id: &PersonId,
        period: &PeriodKey,
    ) -> Result<f64, DomainError>;

    async fn sum_myhero_points(
        &self,
        person_id: &PersonId,
        period: &PeriodKey,
    ) -> Result<f64, DomainError>;

    async fn sum_prospects(
        &self,
        person_id: &PersonId,
        period: &PeriodKey,
    ) -> Result<f64, DomainError>;

    /// Active salesmen across the whole organisation
    async fn count_active_salesmen(&self) -> Result<u64, DomainError>;
}

/// Repository for evaluation periods, evaluations and their details
#[async_trait]
pub trait EvaluationRepository: Send + Sync {
    /// Idempotent: concurrent callers for the same key get the same row
    async fn get_or_create_period(&self, key: &PeriodKey)
        -> Result<EvaluationPeriod, DomainError>;

    async fn find_period(&self, key: &PeriodKey) -> Result<Option<EvaluationPeriod>, DomainError>;

    async fn find_by_id(&self, id: &EvaluationId) -> Result<Option<Evaluation>, DomainError>;

    async fn find_by_person_and_period(
        &self,
        person_id: &PersonId,
        period_id: &PeriodId,
    ) -> Result<Option<Evaluation>, DomainError>;

    /// One page of evaluations plus the unpaged row count
    async fn list(&self, query: &EvaluationQuery) -> Result<(Vec<Evaluation>, u64), DomainError>;

    /// Insert the evaluation, or overwrite its total and replace all details.
    /// Runs as one atomic unit.
    async fn save(
        &self,
        person_id: &PersonId,
        period: &EvaluationPeriod,
        calculated: &CalculatedEvaluation,
    ) -> Result<(Evaluation, WriteOutcome), DomainError>;

    /// Delete an evaluation and its details. `NotFound` if absent.
    async fn delete(&self, id: &EvaluationId) -> Result<(), DomainError>;

    async fn find_details(
        &self,
        evaluation_id: &EvaluationId,
    ) -> Result<Vec<EvaluationDetail>, DomainError>;

    /// Evaluations of a period by descending total score. `limit == 0` means all.
    async fn find_ranked(
        &self,
        period_id: &PeriodId,
        limit: u64,
    ) -> Result<Vec<Evaluation>, DomainError>;

    /// Every detail row belonging to any evaluation in the period
    async fn find_details_for_period(
        &self,
        period_id: &PeriodId,
    ) -> Result<Vec<EvaluationDetail>, DomainError>;

    /// A person's evaluations, newest period first
    async fn find_recent_by_person(
        &self,
        person_id: &PersonId,
        limit: u64,
    ) -> Result<Vec<Evaluation>, DomainError>;
}
