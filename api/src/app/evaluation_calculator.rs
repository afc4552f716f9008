//! Evaluation calculator
//!
//! Scores every team-leader KPI for one person and period. Pure computation
//! over the catalog and the aggregator; nothing is persisted here.

use std::collections::HashMap;
use std::sync::Arc;

use crate::app::kpi_scorer::score_kpi;
use crate::app::metric_aggregator::MetricAggregator;
use crate::domain::entities::{
    CalculatedEvaluation, EvaluationDetailId, KpiItemId, NewEvaluationDetail, PeriodKey,
    PersonId,
};
use crate::domain::ports::{KpiCatalog, MetricRepository};
use crate::error::DomainError;

/// Switches that change how targets are chosen
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringPolicy {
    /// Prefer a person's own target for the period over the KPI default
    pub apply_person_targets: bool,
}

pub struct EvaluationCalculator<K, M>
where
    K: KpiCatalog,
    M: MetricRepository,
{
    catalog: Arc<K>,
    aggregator: MetricAggregator<M>,
    policy: ScoringPolicy,
}

impl<K, M> EvaluationCalculator<K, M>
where
    K: KpiCatalog,
    M: MetricRepository,
{
    pub fn new(catalog: Arc<K>, metrics: Arc<M>, policy: ScoringPolicy) -> Self {
        Self {
            catalog,
            aggregator: MetricAggregator::new(metrics),
            policy,
        }
    }

    pub async fn calculate(
        &self,
        person_id: &PersonId,
        period: &PeriodKey,
    ) -> Result<CalculatedEvaluation, DomainError> {
        let items = self.catalog.find_tl_kpi_items().await?;
        if items.is_empty() {
            return Err(DomainError::Configuration(
                "No KPI items configured for team leaders".to_string(),
            ));
        }

        let metrics = self.aggregator.aggregate(person_id, period).await?;

        let overrides: HashMap<KpiItemId, f64> = if self.policy.apply_person_targets {
            self.catalog
                .find_person_targets(person_id, period)
                .await?
                .into_iter()
                .map(|t| (t.kpi_item_id, t.target_value))
                .collect()
        } else {
            HashMap::new()
        };

        let mut total_score = 0.0;
        let mut details = Vec::with_capacity(items.len());

        for item in &items {
            let actual = item
                .resolved_metric_key()
                .and_then(|key| metrics.get(&key))
                .map(|m| m.value);

            let detail = match actual {
                Some(actual) => {
                    let target = overrides.get(&item.id).copied().or(item.target_value);
                    let scored = score_kpi(item.weight, target, actual);
                    NewEvaluationDetail {
                        id: EvaluationDetailId::new(),
                        kpi_item_id: item.id,
                        actual_value: Some(actual),
                        achievement_ratio: scored.achievement_ratio,
                        score: scored.score,
                    }
                }
                None => {
                    tracing::warn!(
                        person_id = %person_id,
                        kpi_item_id = %item.id,
                        kpi_name = %item.name,
                        "No metric bound to KPI item; scoring 0"
                    );
                    NewEvaluationDetail {
                        id: EvaluationDetailId::new(),
                        kpi_item_id: item.id,
                        actual_value: None,
                        achievement_ratio: None,
                        score: 0.0,
                    }
                }
            };

            total_score += detail.score;
            details.push(detail);
        }

        Ok(CalculatedEvaluation {
            total_score,
            details,
        })
    }
}
