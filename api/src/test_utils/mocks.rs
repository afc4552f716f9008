//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They store data in memory and allow tests to verify behavior.

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::domain::entities::{
    CalculatedEvaluation, Evaluation, EvaluationDetail, EvaluationId, EvaluationPeriod,
    EvaluationQuery, EvaluationSort, KpiItem, MetricKey, PeriodId, PeriodKey, Person, PersonId,
    PersonKpiTarget, Pillar, Role, SessionKind, SortDirection, WriteOutcome,
};
use crate::domain::ports::{
    EvaluationRepository, KpiCatalog, MetricRepository, PersonRepository,
};
use crate::error::DomainError;

// ============================================================================
// In-Memory Person Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryPersonRepository {
    persons: Arc<RwLock<HashMap<PersonId, Person>>>,
}

impl InMemoryPersonRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a person for testing
    pub fn with_person(self, person: Person) -> Self {
        self.persons.write().unwrap().insert(person.id, person);
        self
    }
}

#[async_trait]
impl PersonRepository for InMemoryPersonRepository {
    async fn find_by_id(&self, id: &PersonId) -> Result<Option<Person>, DomainError> {
        Ok(self.persons.read().unwrap().get(id).cloned())
    }

    async fn find_active_by_role(&self, role: Role) -> Result<Vec<Person>, DomainError> {
        let mut found: Vec<Person> = self
            .persons
            .read()
            .unwrap()
            .values()
            .filter(|p| p.role == role && p.active)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    async fn find_by_ids(&self, ids: &[PersonId]) -> Result<Vec<Person>, DomainError> {
        let persons = self.persons.read().unwrap();
        Ok(ids.iter().filter_map(|id| persons.get(id).cloned()).collect())
    }
}

// ============================================================================
// In-Memory KPI Catalog
// ============================================================================

#[derive(Default)]
pub struct InMemoryKpiCatalog {
    pillars: Arc<RwLock<Vec<Pillar>>>,
    kpis: Arc<RwLock<Vec<KpiItem>>>,
    targets: Arc<RwLock<Vec<PersonKpiTarget>>>,
    kpi_loads: Arc<AtomicUsize>,
}

impl InMemoryKpiCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pillar(self, pillar: Pillar) -> Self {
        self.pillars.write().unwrap().push(pillar);
        self
    }

    pub fn with_kpi_item(self, kpi: KpiItem) -> Self {
        self.kpis.write().unwrap().push(kpi);
        self
    }

    pub fn with_person_target(self, target: PersonKpiTarget) -> Self {
        self.targets.write().unwrap().push(target);
        self
    }

    /// Replace a KPI's weight in place, as an admin edit would
    pub fn set_weight(&self, name: &str, weight: f64) {
        for kpi in self.kpis.write().unwrap().iter_mut() {
            if kpi.name == name {
                kpi.weight = weight;
            }
        }
    }

    /// How many times KPI items were read from this catalog
    pub fn kpi_loads(&self) -> usize {
        self.kpi_loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KpiCatalog for InMemoryKpiCatalog {
    async fn find_tl_kpi_items(&self) -> Result<Vec<KpiItem>, DomainError> {
        self.kpi_loads.fetch_add(1, Ordering::SeqCst);
        let mut items: Vec<KpiItem> = self
            .kpis
            .read()
            .unwrap()
            .iter()
            .filter(|k| k.applies_to_tl)
            .cloned()
            .collect();
        items.sort_by(|a, b| (a.pillar_id.0, &a.name).cmp(&(b.pillar_id.0, &b.name)));
        Ok(items)
    }

    async fn find_all_kpi_items(&self) -> Result<Vec<KpiItem>, DomainError> {
        self.kpi_loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.kpis.read().unwrap().clone())
    }

    async fn find_all_pillars(&self) -> Result<Vec<Pillar>, DomainError> {
        Ok(self.pillars.read().unwrap().clone())
    }

    async fn find_person_targets(
        &self,
        person_id: &PersonId,
        period: &PeriodKey,
    ) -> Result<Vec<PersonKpiTarget>, DomainError> {
        Ok(self
            .targets
            .read()
            .unwrap()
            .iter()
            .filter(|t| &t.person_id == person_id && &t.period == period)
            .cloned()
            .collect())
    }
}

// ============================================================================
// In-Memory Metric Repository
// ============================================================================

/// Metric values keyed by person and metric; unknown values read as zero.
/// Values apply to every period.
#[derive(Default)]
pub struct InMemoryMetricRepository {
    values: Arc<RwLock<HashMap<(PersonId, MetricKey), f64>>>,
    failing: Arc<RwLock<HashSet<PersonId>>>,
    salesmen: Arc<RwLock<u64>>,
}

impl InMemoryMetricRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(self, person_id: PersonId, key: MetricKey, value: f64) -> Self {
        self.values.write().unwrap().insert((person_id, key), value);
        self
    }

    pub fn with_active_salesmen(self, count: u64) -> Self {
        *self.salesmen.write().unwrap() = count;
        self
    }

    /// Every query for this person fails
    pub fn failing_for(self, person_id: PersonId) -> Self {
        self.failing.write().unwrap().insert(person_id);
        self
    }

    fn get(&self, person_id: &PersonId, key: MetricKey) -> Result<f64, DomainError> {
        if self.failing.read().unwrap().contains(person_id) {
            return Err(DomainError::Database("simulated query failure".to_string()));
        }
        Ok(self
            .values
            .read()
            .unwrap()
            .get(&(*person_id, key))
            .copied()
            .unwrap_or(0.0))
    }
}

#[async_trait]
impl MetricRepository for InMemoryMetricRepository {
    async fn count_daily_activities(
        &self,
        person_id: &PersonId,
        _start: NaiveDateTime,
        _end: NaiveDateTime,
    ) -> Result<u64, DomainError> {
        Ok(self.get(person_id, MetricKey::QuantityActivity)? as u64)
    }

    async fn count_sessions(
        &self,
        person_id: &PersonId,
        kind: SessionKind,
        _start: NaiveDateTime,
        _end: NaiveDateTime,
    ) -> Result<u64, DomainError> {
        let key = match kind {
            SessionKind::Coaching => MetricKey::CoachingSessions,
            SessionKind::Briefing => MetricKey::BriefingSessions,
        };
        Ok(self.get(person_id, key)? as u64)
    }

    async fn attendance_percentage(
        &self,
        person_id: &PersonId,
        _start: NaiveDateTime,
        _end: NaiveDateTime,
    ) -> Result<f64, DomainError> {
        self.get(person_id, MetricKey::Attendance)
    }

    async fn count_training_participations(
        &self,
        person_id: &PersonId,
        _start: NaiveDateTime,
        _end: NaiveDateTime,
    ) -> Result<u64, DomainError> {
        Ok(self.get(person_id, MetricKey::TrainingParticipation)? as u64)
    }

    async fn sum_sales_flp(
        &self,
        person_id: &PersonId,
        _period: &PeriodKey,
    ) -> Result<f64, DomainError> {
        self.get(person_id, MetricKey::SalesFlp)
    }

    async fn avg_quiz_score(
        &self,
        person_id: &PersonId,
        _period: &PeriodKey,
    ) -> Result<f64, DomainError> {
        self.get(person_id, MetricKey::QuizScore)
    }

    async fn sum_apple_logins(
        &self,
        person_id: &PersonId,
        _period: &PeriodKey,
    ) -> Result<f64, DomainError> {
        self.get(person_id, MetricKey::AppleLogins)
    }

    async fn sum_apple_points(
        &self,
        person_id: &PersonId,
        _period: &PeriodKey,
    ) -> Result<f64, DomainError> {
        self.get(person_id, MetricKey::ApplePoints)
    }

    async fn sum_myhero_points(
        &self,
        person_id: &PersonId,
        _period: &PeriodKey,
    ) -> Result<f64, DomainError> {
        self.get(person_id, MetricKey::MyheroPoints)
    }

    async fn sum_prospects(
        &self,
        person_id: &PersonId,
        _period: &PeriodKey,
    ) -> Result<f64, DomainError> {
        self.get(person_id, MetricKey::TotalProspects)
    }

    async fn count_active_salesmen(&self) -> Result<u64, DomainError> {
        Ok(*self.salesmen.read().unwrap())
    }
}

// ============================================================================
// In-Memory Evaluation Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryEvaluationRepository {
    periods: Arc<RwLock<HashMap<PeriodKey, EvaluationPeriod>>>,
    evaluations: Arc<RwLock<HashMap<EvaluationId, Evaluation>>>,
    details: Arc<RwLock<HashMap<EvaluationId, Vec<EvaluationDetail>>>>,
    failing_saves: Arc<RwLock<HashSet<PersonId>>>,
}

impl InMemoryEvaluationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a stored evaluation. The period row is created
    /// on demand and the evaluation is re-pointed at it.
    pub fn with_evaluation(self, mut evaluation: Evaluation, details: Vec<EvaluationDetail>) -> Self {
        {
            let mut periods = self.periods.write().unwrap();
            let period = periods
                .entry(evaluation.period)
                .or_insert_with(|| EvaluationPeriod {
                    id: evaluation.period_id,
                    key: evaluation.period,
                    created_at: Utc::now(),
                });
            evaluation.period_id = period.id;
        }
        self.details
            .write()
            .unwrap()
            .insert(evaluation.id, details);
        self.evaluations
            .write()
            .unwrap()
            .insert(evaluation.id, evaluation);
        self
    }

    /// Saves for this person fail with a database error
    pub fn failing_save_for(self, person_id: PersonId) -> Self {
        self.failing_saves.write().unwrap().insert(person_id);
        self
    }

    pub fn period_count(&self) -> usize {
        self.periods.read().unwrap().len()
    }

    pub fn evaluation_count(&self) -> usize {
        self.evaluations.read().unwrap().len()
    }

    pub fn detail_count(&self) -> usize {
        self.details.read().unwrap().values().map(Vec::len).sum()
    }
}

#[async_trait]
impl EvaluationRepository for InMemoryEvaluationRepository {
    async fn get_or_create_period(
        &self,
        key: &PeriodKey,
    ) -> Result<EvaluationPeriod, DomainError> {
        let mut periods = self.periods.write().unwrap();
        let period = periods.entry(*key).or_insert_with(|| EvaluationPeriod {
            id: PeriodId::new(),
            key: *key,
            created_at: Utc::now(),
        });
        Ok(period.clone())
    }

    async fn find_period(&self, key: &PeriodKey) -> Result<Option<EvaluationPeriod>, DomainError> {
        Ok(self.periods.read().unwrap().get(key).cloned())
    }

    async fn find_by_id(&self, id: &EvaluationId) -> Result<Option<Evaluation>, DomainError> {
        Ok(self.evaluations.read().unwrap().get(id).cloned())
    }

    async fn find_by_person_and_period(
        &self,
        person_id: &PersonId,
        period_id: &PeriodId,
    ) -> Result<Option<Evaluation>, DomainError> {
        Ok(self
            .evaluations
            .read()
            .unwrap()
            .values()
            .find(|e| &e.person_id == person_id && &e.period_id == period_id)
            .cloned())
    }

    async fn list(&self, query: &EvaluationQuery) -> Result<(Vec<Evaluation>, u64), DomainError> {
        let mut matching: Vec<Evaluation> = self
            .evaluations
            .read()
            .unwrap()
            .values()
            .filter(|e| query.period.map_or(true, |p| e.period == p))
            .filter(|e| query.person_id.map_or(true, |id| e.person_id == id))
            .cloned()
            .collect();

        matching.sort_by(|a, b| {
            let ord = match query.sort_by {
                EvaluationSort::CreatedAt => a.created_at.cmp(&b.created_at),
                EvaluationSort::TotalScore => a.total_score.total_cmp(&b.total_score),
            };
            match query.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });

        let total = matching.len() as u64;
        let page = matching
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit as usize)
            .collect();
        Ok((page, total))
    }

    async fn save(
        &self,
        person_id: &PersonId,
        period: &EvaluationPeriod,
        calculated: &CalculatedEvaluation,
    ) -> Result<(Evaluation, WriteOutcome), DomainError> {
        if self.failing_saves.read().unwrap().contains(person_id) {
            return Err(DomainError::Database("simulated write failure".to_string()));
        }

        let mut evaluations = self.evaluations.write().unwrap();
        let mut details = self.details.write().unwrap();

        let existing = evaluations
            .values_mut()
            .find(|e| &e.person_id == person_id && e.period_id == period.id);

        let (evaluation, outcome) = match existing {
            Some(evaluation) => {
                evaluation.total_score = calculated.total_score;
                (evaluation.clone(), WriteOutcome::Updated)
            }
            None => {
                let evaluation = Evaluation {
                    id: EvaluationId::new(),
                    period_id: period.id,
                    period: period.key,
                    person_id: *person_id,
                    total_score: calculated.total_score,
                    created_at: Utc::now(),
                };
                evaluations.insert(evaluation.id, evaluation.clone());
                (evaluation, WriteOutcome::Created)
            }
        };

        let rows = calculated
            .details
            .iter()
            .map(|d| EvaluationDetail {
                id: d.id,
                evaluation_id: evaluation.id,
                kpi_item_id: d.kpi_item_id,
                actual_value: d.actual_value,
                achievement_ratio: d.achievement_ratio,
                score: d.score,
            })
            .collect();
        details.insert(evaluation.id, rows);

        Ok((evaluation, outcome))
    }

    async fn delete(&self, id: &EvaluationId) -> Result<(), DomainError> {
        let removed = self.evaluations.write().unwrap().remove(id);
        self.details.write().unwrap().remove(id);
        match removed {
            Some(_) => Ok(()),
            None => Err(DomainError::NotFound(format!("Evaluation not found: {}", id))),
        }
    }

    async fn find_details(
        &self,
        evaluation_id: &EvaluationId,
    ) -> Result<Vec<EvaluationDetail>, DomainError> {
        Ok(self
            .details
            .read()
            .unwrap()
            .get(evaluation_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn find_ranked(
        &self,
        period_id: &PeriodId,
        limit: u64,
    ) -> Result<Vec<Evaluation>, DomainError> {
        let mut ranked: Vec<Evaluation> = self
            .evaluations
            .read()
            .unwrap()
            .values()
            .filter(|e| &e.period_id == period_id)
            .cloned()
            .collect();
        ranked.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));
        if limit > 0 {
            ranked.truncate(limit as usize);
        }
        Ok(ranked)
    }

    async fn find_details_for_period(
        &self,
        period_id: &PeriodId,
    ) -> Result<Vec<EvaluationDetail>, DomainError> {
        let evaluations = self.evaluations.read().unwrap();
        let details = self.details.read().unwrap();
        Ok(evaluations
            .values()
            .filter(|e| &e.period_id == period_id)
            .flat_map(|e| details.get(&e.id).cloned().unwrap_or_default())
            .collect())
    }

    async fn find_recent_by_person(
        &self,
        person_id: &PersonId,
        limit: u64,
    ) -> Result<Vec<Evaluation>, DomainError> {
        let mut found: Vec<Evaluation> = self
            .evaluations
            .read()
            .unwrap()
            .values()
            .filter(|e| &e.person_id == person_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.period.cmp(&a.period));
        found.truncate(limit as usize);
        Ok(found)
    }
}
