//! Evaluation breakdown
//!
//! Rebuilds the per-KPI and per-pillar view of a stored evaluation by
//! joining its detail rows back to KPI and pillar metadata.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::{
    Evaluation, EvaluationDetail, EvaluationId, InputSource, KpiItem, KpiItemId, PersonId, Pillar,
    PillarId,
};

#[derive(Debug, Clone, Serialize)]
pub struct KpiBreakdown {
    pub kpi_item_id: KpiItemId,
    pub kpi_item_name: String,
    pub pillar_name: String,
    pub weight: f64,
    pub actual_value: Option<f64>,
    pub target_value: Option<f64>,
    pub achievement_ratio: Option<f64>,
    pub score: f64,
    pub max_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub input_source: InputSource,
}

#[derive(Debug, Clone, Serialize)]
pub struct PillarBreakdown {
    pub pillar_id: PillarId,
    pub pillar_name: String,
    pub pillar_weight: f64,
    pub pillar_score: f64,
    pub pillar_max_score: f64,
}

/// Compact per-pillar score used by comparison views
#[derive(Debug, Clone, Serialize)]
pub struct PillarScoreSummary {
    pub name: String,
    pub score: f64,
    pub max_score: f64,
    pub percentage: f64,
}

/// Full evaluation with both breakdowns
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationResponse {
    pub id: EvaluationId,
    pub person_id: PersonId,
    pub person_name: String,
    pub period_month: u32,
    pub period_year: i32,
    pub total_score: f64,
    pub pillar_breakdown: Vec<PillarBreakdown>,
    pub kpi_breakdown: Vec<KpiBreakdown>,
    pub created_at: DateTime<Utc>,
}

/// KPI items and pillars indexed by id
pub struct CatalogIndex {
    kpis: HashMap<KpiItemId, KpiItem>,
    pillars: HashMap<PillarId, Pillar>,
}

impl CatalogIndex {
    pub fn new(kpis: Vec<KpiItem>, pillars: Vec<Pillar>) -> Self {
        Self {
            kpis: kpis.into_iter().map(|k| (k.id, k)).collect(),
            pillars: pillars.into_iter().map(|p| (p.id, p)).collect(),
        }
    }

    pub fn pillars(&self) -> impl Iterator<Item = &Pillar> {
        self.pillars.values()
    }

    /// Pillar owning a KPI item, if both are known
    pub fn pillar_of(&self, kpi_item_id: &KpiItemId) -> Option<&Pillar> {
        self.kpis
            .get(kpi_item_id)
            .and_then(|kpi| self.pillars.get(&kpi.pillar_id))
    }

    /// One entry per detail whose KPI still exists, in detail order
    pub fn kpi_breakdown(&self, details: &[EvaluationDetail]) -> Vec<KpiBreakdown> {
        details
            .iter()
            .filter_map(|detail| {
                let kpi = self.kpis.get(&detail.kpi_item_id)?;
                let pillar_name = self
                    .pillars
                    .get(&kpi.pillar_id)
                    .map(|p| p.name.clone())
                    .unwrap_or_default();

                Some(KpiBreakdown {
                    kpi_item_id: kpi.id,
                    kpi_item_name: kpi.name.clone(),
                    pillar_name,
                    weight: kpi.weight,
                    actual_value: detail.actual_value,
                    target_value: kpi.target_value,
                    achievement_ratio: detail.achievement_ratio,
                    score: detail.score,
                    max_score: kpi.weight,
                    unit: kpi.unit.clone(),
                    input_source: kpi.input_source,
                })
            })
            .collect()
    }

    /// Scores rolled up per pillar.
    ///
    /// Only pillars that own at least one of the given details appear, in
    /// order of first appearance. Details whose KPI or pillar is unknown are
    /// skipped.
    pub fn pillar_breakdown(&self, details: &[EvaluationDetail]) -> Vec<PillarBreakdown> {
        let mut order: Vec<PillarId> = Vec::new();
        let mut scores: HashMap<PillarId, f64> = HashMap::new();

        for detail in details {
            let Some(pillar) = self.pillar_of(&detail.kpi_item_id) else {
                continue;
            };
            let entry = scores.entry(pillar.id).or_insert_with(|| {
                order.push(pillar.id);
                0.0
            });
            *entry += detail.score;
        }

        order
            .into_iter()
            .filter_map(|id| {
                let pillar = self.pillars.get(&id)?;
                Some(PillarBreakdown {
                    pillar_id: pillar.id,
                    pillar_name: pillar.name.clone(),
                    pillar_weight: pillar.weight,
                    pillar_score: scores.get(&id).copied().unwrap_or_default(),
                    pillar_max_score: pillar.weight,
                })
            })
            .collect()
    }

    pub fn pillar_summaries(&self, details: &[EvaluationDetail]) -> Vec<PillarScoreSummary> {
        self.pillar_breakdown(details)
            .into_iter()
            .map(|p| PillarScoreSummary {
                percentage: if p.pillar_max_score > 0.0 {
                    p.pillar_score / p.pillar_max_score * 100.0
                } else {
                    0.0
                },
                name: p.pillar_name,
                score: p.pillar_score,
                max_score: p.pillar_max_score,
            })
            .collect()
    }

    pub fn build_response(
        &self,
        evaluation: &Evaluation,
        person_name: String,
        details: &[EvaluationDetail],
    ) -> EvaluationResponse {
        EvaluationResponse {
            id: evaluation.id,
            person_id: evaluation.person_id,
            person_name,
            period_month: evaluation.period.month(),
            period_year: evaluation.period.year(),
            total_score: evaluation.total_score,
            pillar_breakdown: self.pillar_breakdown(details),
            kpi_breakdown: self.kpi_breakdown(details),
            created_at: evaluation.created_at,
        }
    }
}
