//! Domain entities
//!
//! Pure domain models for the evaluation engine.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod evaluation;
pub mod kpi_item;
pub mod metric;
pub mod period;
pub mod person;
pub mod pillar;

pub use evaluation::{
    CalculatedEvaluation, Evaluation, EvaluationDetail, EvaluationDetailId, EvaluationId,
    EvaluationQuery, EvaluationSort, NewEvaluationDetail, SortDirection, WriteOutcome,
};
pub use kpi_item::{InputSource, KpiItem, KpiItemId, PersonKpiTarget};
pub use metric::{MetricKey, MetricMap, MetricOrigin, MetricValue, SessionKind};
pub use period::{EvaluationPeriod, PeriodId, PeriodKey};
pub use person::{Person, PersonId, Role};
pub use pillar::{Pillar, PillarId};
