//! Evaluation service
//!
//! Orchestrates calculation and persistence of evaluations, and rebuilds
//! breakdown responses for reads. Batch calculation is best-effort: a person
//! whose calculation fails is skipped and reported, the rest still succeed.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use futures::stream::{self, StreamExt};
use serde::Serialize;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::app::breakdown::{CatalogIndex, EvaluationResponse};
use crate::app::evaluation_calculator::{EvaluationCalculator, ScoringPolicy};
use crate::app::ranking::{leaderboard_entries, LeaderboardResponse};
use crate::domain::entities::{
    Evaluation, EvaluationDetail, EvaluationId, EvaluationPeriod, EvaluationQuery, PeriodKey, Person,
    PersonId, Role, WriteOutcome,
};
use crate::domain::ports::{
    EvaluationRepository, KpiCatalog, MetricRepository, PersonRepository,
};
use crate::error::{AppError, DomainError};

/// Tunables for the evaluation service
#[derive(Debug, Clone, Copy)]
pub struct EvaluationSettings {
    /// How many people are evaluated at once in a batch
    pub concurrency: usize,
    pub policy: ScoringPolicy,
}

impl Default for EvaluationSettings {
    fn default() -> Self {
        Self {
            concurrency: 4,
            policy: ScoringPolicy::default(),
        }
    }
}

/// A person left out of a batch and why
#[derive(Debug, Clone, Serialize)]
pub struct SkippedPerson {
    pub person_id: PersonId,
    pub reason: String,
}

/// Result of a batch calculation
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub succeeded: Vec<EvaluationResponse>,
    pub skipped: Vec<SkippedPerson>,
}

/// Serializes writes for the same (person, period) within this process.
#[derive(Default)]
struct WriteLocks {
    slots: Mutex<HashMap<(PersonId, PeriodKey), Arc<AsyncMutex<()>>>>,
}

impl WriteLocks {
    async fn acquire(&self, person_id: PersonId, period: PeriodKey) -> OwnedMutexGuard<()> {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(|p| p.into_inner());
            // a slot nobody holds or waits on has a single reference
            slots.retain(|_, slot| Arc::strong_count(slot) > 1);
            slots.entry((person_id, period)).or_default().clone()
        };
        slot.lock_owned().await
    }
}

pub struct EvaluationService<PR, KC, MR, ER>
where
    PR: PersonRepository,
    KC: KpiCatalog,
    MR: MetricRepository,
    ER: EvaluationRepository,
{
    persons: Arc<PR>,
    catalog: Arc<KC>,
    evaluations: Arc<ER>,
    calculator: EvaluationCalculator<KC, MR>,
    locks: WriteLocks,
    concurrency: usize,
}

impl<PR, KC, MR, ER> EvaluationService<PR, KC, MR, ER>
where
    PR: PersonRepository,
    KC: KpiCatalog,
    MR: MetricRepository,
    ER: EvaluationRepository,
{
    pub fn new(
        persons: Arc<PR>,
        catalog: Arc<KC>,
        metrics: Arc<MR>,
        evaluations: Arc<ER>,
        settings: EvaluationSettings,
    ) -> Self {
        Self {
            persons,
            calculator: EvaluationCalculator::new(catalog.clone(), metrics, settings.policy),
            catalog,
            evaluations,
            locks: WriteLocks::default(),
            concurrency: settings.concurrency.max(1),
        }
    }

    /// Calculate and store evaluations for one team leader or all active ones.
    /// Returns only the evaluations that succeeded.
    pub async fn calculate_for_period(
        &self,
        period: PeriodKey,
        person_id: Option<PersonId>,
    ) -> Result<Vec<EvaluationResponse>, AppError> {
        Ok(self.calculate_batch(period, person_id).await?.succeeded)
    }

    /// Like `calculate_for_period` but also reports who was skipped.
    ///
    /// With a `person_id` any failure is returned as an error. Without one,
    /// per-person failures are logged and collected in `skipped`.
    pub async fn calculate_batch(
        &self,
        period: PeriodKey,
        person_id: Option<PersonId>,
    ) -> Result<BatchOutcome, AppError> {
        let eval_period = self.evaluations.get_or_create_period(&period).await?;
        let targets = self.resolve_targets(person_id).await?;
        if targets.is_empty() {
            return Err(
                DomainError::NotFound("No team leaders found for evaluation".to_string()).into(),
            );
        }

        if self.catalog.find_tl_kpi_items().await?.is_empty() {
            return Err(DomainError::Configuration(
                "No KPI items configured for team leaders".to_string(),
            )
            .into());
        }

        let index = self.catalog_index().await?;

        if person_id.is_some() {
            let mut succeeded = Vec::with_capacity(targets.len());
            for person in &targets {
                succeeded.push(self.evaluate_person(person, &eval_period, &index).await?);
            }
            return Ok(BatchOutcome {
                succeeded,
                skipped: Vec::new(),
            });
        }

        let eval_period = &eval_period;
        let index = &index;
        let results: Vec<(PersonId, Result<EvaluationResponse, DomainError>)> =
            stream::iter(targets)
                .map(|person: Person| async move {
                    let result = self.evaluate_person(&person, eval_period, index).await;
                    (person.id, result)
                })
                .buffered(self.concurrency)
                .collect()
                .await;

        let mut outcome = BatchOutcome::default();
        for (person_id, result) in results {
            match result {
                Ok(response) => outcome.succeeded.push(response),
                Err(e) => {
                    tracing::warn!(
                        person_id = %person_id,
                        period = %period,
                        reason = %e,
                        "Skipping person in batch evaluation"
                    );
                    outcome.skipped.push(SkippedPerson {
                        person_id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            period = %period,
            succeeded = outcome.succeeded.len(),
            skipped = outcome.skipped.len(),
            "Batch evaluation finished"
        );

        Ok(outcome)
    }

    /// Drop existing evaluations for the targeted people, then calculate again
    pub async fn recalculate(
        &self,
        period: PeriodKey,
        person_id: Option<PersonId>,
    ) -> Result<Vec<EvaluationResponse>, AppError> {
        Ok(self.recalculate_batch(period, person_id).await?.succeeded)
    }

    /// Like `recalculate` but also reports who was skipped
    pub async fn recalculate_batch(
        &self,
        period: PeriodKey,
        person_id: Option<PersonId>,
    ) -> Result<BatchOutcome, AppError> {
        if let Some(existing) = self.evaluations.find_period(&period).await? {
            let targets = self.resolve_targets(person_id).await?;
            for person in &targets {
                let _guard = self.locks.acquire(person.id, period).await;
                let Some(evaluation) = self
                    .evaluations
                    .find_by_person_and_period(&person.id, &existing.id)
                    .await?
                else {
                    continue;
                };
                match self.evaluations.delete(&evaluation.id).await {
                    Ok(()) | Err(DomainError::NotFound(_)) => {}
                    Err(e) => {
                        tracing::warn!(
                            person_id = %person.id,
                            evaluation_id = %evaluation.id,
                            error = %e,
                            "Failed to delete evaluation before recalculation"
                        );
                    }
                }
            }
        }

        self.calculate_batch(period, person_id).await
    }

    pub async fn get_by_id(&self, id: &EvaluationId) -> Result<EvaluationResponse, AppError> {
        let evaluation = self
            .evaluations
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Evaluation not found: {}", id)))?;

        let index = self.catalog_index().await?;
        Ok(self.respond(&evaluation, &index).await?)
    }

    pub async fn get_by_person_and_period(
        &self,
        person_id: &PersonId,
        period: PeriodKey,
    ) -> Result<EvaluationResponse, AppError> {
        let eval_period = self
            .evaluations
            .find_period(&period)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Period not found: {}", period)))?;

        let evaluation = self
            .evaluations
            .find_by_person_and_period(person_id, &eval_period.id)
            .await?
            .ok_or_else(|| {
                DomainError::NotFound(format!(
                    "Evaluation not found for person {} in {}",
                    person_id, period
                ))
            })?;

        let index = self.catalog_index().await?;
        Ok(self.respond(&evaluation, &index).await?)
    }

    /// One page of evaluations with breakdowns, plus the total row count.
    /// Rows whose breakdown cannot be built are left out of the page.
    pub async fn list(
        &self,
        query: &EvaluationQuery,
    ) -> Result<(Vec<EvaluationResponse>, u64), AppError> {
        let (evaluations, total) = self.evaluations.list(query).await?;
        let index = self.catalog_index().await?;

        let mut responses = Vec::with_capacity(evaluations.len());
        for evaluation in &evaluations {
            match self.respond(evaluation, &index).await {
                Ok(response) => responses.push(response),
                Err(e) => {
                    tracing::warn!(
                        evaluation_id = %evaluation.id,
                        error = %e,
                        "Dropping evaluation from listing"
                    );
                }
            }
        }

        Ok((responses, total))
    }

    /// Highest scores first; `limit == 0` returns everyone.
    ///
    /// The limit applies to stored evaluations before names are joined, so
    /// an evaluation whose person is gone from the directory is dropped and
    /// the board can hold fewer than `limit` entries. Ranks follow output order.
    pub async fn leaderboard(
        &self,
        period: PeriodKey,
        limit: u64,
    ) -> Result<LeaderboardResponse, AppError> {
        let eval_period = self
            .evaluations
            .find_period(&period)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Period not found: {}", period)))?;

        let ranked = self.evaluations.find_ranked(&eval_period.id, limit).await?;
        let ids: Vec<PersonId> = ranked.iter().map(|e| e.person_id).collect();
        let persons: HashMap<PersonId, Person> = self
            .persons
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let entries = leaderboard_entries(&ranked, &persons);
        Ok(LeaderboardResponse {
            period: period.to_string(),
            total: entries.len(),
            entries,
        })
    }

    async fn resolve_targets(&self, person_id: Option<PersonId>) -> Result<Vec<Person>, DomainError> {
        match person_id {
            Some(id) => {
                let person = self
                    .persons
                    .find_by_id(&id)
                    .await?
                    .ok_or_else(|| DomainError::NotFound(format!("Person not found: {}", id)))?;
                if !person.is_team_leader() {
                    return Err(DomainError::Validation(format!(
                        "Person {} is not a team leader",
                        id
                    )));
                }
                Ok(vec![person])
            }
            None => self.persons.find_active_by_role(Role::Teamleader).await,
        }
    }

    async fn catalog_index(&self) -> Result<CatalogIndex, DomainError> {
        let kpis = self.catalog.find_all_kpi_items().await?;
        let pillars = self.catalog.find_all_pillars().await?;
        Ok(CatalogIndex::new(kpis, pillars))
    }

    async fn evaluate_person(
        &self,
        person: &Person,
        period: &EvaluationPeriod,
        index: &CatalogIndex,
    ) -> Result<EvaluationResponse, DomainError> {
        let _guard = self.locks.acquire(person.id, period.key).await;

        let calculated = self.calculator.calculate(&person.id, &period.key).await?;
        let (evaluation, outcome) = self
            .evaluations
            .save(&person.id, period, &calculated)
            .await?;

        tracing::info!(
            person_id = %person.id,
            period = %period.key,
            total_score = evaluation.total_score,
            created = outcome == WriteOutcome::Created,
            "Evaluation stored"
        );

        let details: Vec<EvaluationDetail> = calculated
            .details
            .into_iter()
            .map(|d| EvaluationDetail {
                id: d.id,
                evaluation_id: evaluation.id,
                kpi_item_id: d.kpi_item_id,
                actual_value: d.actual_value,
                achievement_ratio: d.achievement_ratio,
                score: d.score,
            })
            .collect();

        Ok(index.build_response(&evaluation, person.name.clone(), &details))
    }

    async fn respond(
        &self,
        evaluation: &Evaluation,
        index: &CatalogIndex,
    ) -> Result<EvaluationResponse, DomainError> {
        let person = self
            .persons
            .find_by_id(&evaluation.person_id)
            .await?
            .ok_or_else(|| {
                DomainError::NotFound(format!("Person not found: {}", evaluation.person_id))
            })?;
        let details = self.evaluations.find_details(&evaluation.id).await?;
        Ok(index.build_response(evaluation, person.name, &details))
    }
}
