//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.
//! Each fixture function creates a valid entity that can be customized.

use chrono::Utc;

use crate::domain::entities::{
    Evaluation, EvaluationDetail, EvaluationDetailId, EvaluationId, InputSource, KpiItem,
    KpiItemId, PeriodId, PeriodKey, Person, PersonId, Pillar, PillarId, Role,
};

/// Create an active team leader with a specific name
pub fn test_person_named(name: &str) -> Person {
    Person {
        id: PersonId::new(),
        honda_id: format!("H-{}", name.to_uppercase().replace(' ', "-")),
        name: name.to_string(),
        job_title: Some("Team Leader".to_string()),
        role: Role::Teamleader,
        dealer_code: Some("D001".to_string()),
        active: true,
    }
}

/// Create an active salesman
pub fn test_salesman(name: &str) -> Person {
    Person {
        job_title: Some("Salesman".to_string()),
        role: Role::Salesman,
        ..test_person_named(name)
    }
}

pub fn test_pillar(name: &str, weight: f64) -> Pillar {
    Pillar {
        id: PillarId::new(),
        name: name.to_string(),
        weight,
    }
}

/// Create a TL KPI item under a fresh pillar
pub fn test_kpi_item(name: &str, weight: f64, target: Option<f64>) -> KpiItem {
    KpiItem {
        id: KpiItemId::new(),
        pillar_id: PillarId::new(),
        name: name.to_string(),
        weight,
        target_value: target,
        unit: None,
        frequency: Some("monthly".to_string()),
        input_source: InputSource::Tl,
        applies_to_tl: true,
        applies_to_salesman: false,
        metric_key: None,
        notes: None,
    }
}

/// Create a TL KPI item under the given pillar
pub fn test_kpi_item_in(pillar: &Pillar, name: &str, weight: f64, target: Option<f64>) -> KpiItem {
    KpiItem {
        pillar_id: pillar.id,
        ..test_kpi_item(name, weight, target)
    }
}

/// Create a stored evaluation with no details
pub fn test_evaluation(person_id: PersonId, period: PeriodKey, total_score: f64) -> Evaluation {
    Evaluation {
        id: EvaluationId::new(),
        period_id: PeriodId::new(),
        period,
        person_id,
        total_score,
        created_at: Utc::now(),
    }
}

pub fn test_detail(evaluation: &Evaluation, kpi: &KpiItem, score: f64) -> EvaluationDetail {
    EvaluationDetail {
        id: EvaluationDetailId::new(),
        evaluation_id: evaluation.id,
        kpi_item_id: kpi.id,
        actual_value: Some(score),
        achievement_ratio: None,
        score,
    }
}
