//! Evaluation domain entities
//!
//! An evaluation is the stored total score of one person in one period. Its
//! details hold the per-KPI breakdown and are always replaced as a set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::kpi_item::KpiItemId;
use super::period::{PeriodId, PeriodKey};
use super::person::PersonId;

/// Unique identifier for an evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EvaluationId(pub Uuid);

impl EvaluationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EvaluationId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for EvaluationId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EvaluationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for an evaluation detail row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EvaluationDetailId(pub Uuid);

impl EvaluationDetailId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EvaluationDetailId {
    fn default() -> Self {
        Self::new()
    }
}

/// Stored evaluation header
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub id: EvaluationId,
    pub period_id: PeriodId,
    pub period: PeriodKey,
    pub person_id: PersonId,
    /// Always the sum of the detail scores
    pub total_score: f64,
    pub created_at: DateTime<Utc>,
}

/// Stored per-KPI result
#[derive(Debug, Clone)]
pub struct EvaluationDetail {
    pub id: EvaluationDetailId,
    pub evaluation_id: EvaluationId,
    pub kpi_item_id: KpiItemId,
    /// `None` when the aggregator had no figure for the KPI's metric
    pub actual_value: Option<f64>,
    /// actual / target * 100, uncapped; only set when the target is positive
    pub achievement_ratio: Option<f64>,
    pub score: f64,
}

/// A computed detail not yet attached to an evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvaluationDetail {
    pub id: EvaluationDetailId,
    pub kpi_item_id: KpiItemId,
    pub actual_value: Option<f64>,
    pub achievement_ratio: Option<f64>,
    pub score: f64,
}

/// Output of the calculator for one person
#[derive(Debug, Clone)]
pub struct CalculatedEvaluation {
    pub total_score: f64,
    pub details: Vec<NewEvaluationDetail>,
}

/// Whether a write created the evaluation or replaced an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    Updated,
}

/// Column used to order evaluation listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationSort {
    #[default]
    CreatedAt,
    TotalScore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Filters and paging for evaluation listings
#[derive(Debug, Clone)]
pub struct EvaluationQuery {
    pub period: Option<PeriodKey>,
    pub person_id: Option<PersonId>,
    pub sort_by: EvaluationSort,
    pub direction: SortDirection,
    /// 1-based
    pub page: u64,
    pub limit: u64,
}

impl EvaluationQuery {
    /// Saturates instead of overflowing; callers reject pages past `i64::MAX` rows
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

impl Default for EvaluationQuery {
    fn default() -> Self {
        Self {
            period: None,
            person_id: None,
            sort_by: EvaluationSort::default(),
            direction: SortDirection::default(),
            page: 1,
            limit: 10,
        }
    }
}
