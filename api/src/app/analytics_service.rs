//! Analytics service
//!
//! Read-only views over stored evaluations: personal ranking, the admin
//! overview, team comparison and personal trend.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::app::breakdown::{CatalogIndex, PillarScoreSummary};
use crate::app::ranking::{
    leaderboard_entries, overall_statistics, rank_of, score_distribution, trend,
    LeaderboardEntry, OverallStatistics, PeriodComparison, RankingInfo, ScoreDistribution,
};
use crate::app::scoring_config::{
    DEFAULT_TREND_MONTHS, MAX_COMPARE_PERSONS, MIN_COMPARE_PERSONS,
};
use crate::domain::entities::{Evaluation, PeriodId, PeriodKey, Person, PersonId, PillarId};
use crate::domain::ports::{EvaluationRepository, KpiCatalog, PersonRepository};
use crate::error::{AppError, DomainError};

#[derive(Debug, Clone, Serialize)]
pub struct PillarAnalysis {
    pub pillar_name: String,
    pub average_score: f64,
    pub max_possible: f64,
    pub achievement_pct: f64,
    pub top_scorer: String,
    pub top_score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminOverview {
    /// "YYYY-MM"
    pub period: String,
    pub overall_stats: OverallStatistics,
    pub top_performers: Vec<LeaderboardEntry>,
    pub bottom_performers: Vec<LeaderboardEntry>,
    pub pillar_analysis: Vec<PillarAnalysis>,
    pub trend_comparison: Vec<PeriodComparison>,
    pub distributions: ScoreDistribution,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemberComparison {
    pub person_id: PersonId,
    pub person_name: String,
    pub total_score: f64,
    pub rank: usize,
    pub pillar_scores: Vec<PillarScoreSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartScore {
    pub person_name: String,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PillarChart {
    pub pillar_name: String,
    pub tl_scores: Vec<ChartScore>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamComparison {
    pub period: String,
    pub comparisons: Vec<MemberComparison>,
    pub pillar_chart: Vec<PillarChart>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceTrendPoint {
    pub period_month: u32,
    pub period_year: i32,
    /// e.g. "Mar 2025"
    pub period_label: String,
    pub total_score: f64,
}

pub struct AnalyticsService<PR, KC, ER>
where
    PR: PersonRepository,
    KC: KpiCatalog,
    ER: EvaluationRepository,
{
    persons: Arc<PR>,
    catalog: Arc<KC>,
    evaluations: Arc<ER>,
}

impl<PR, KC, ER> AnalyticsService<PR, KC, ER>
where
    PR: PersonRepository,
    KC: KpiCatalog,
    ER: EvaluationRepository,
{
    pub fn new(persons: Arc<PR>, catalog: Arc<KC>, evaluations: Arc<ER>) -> Self {
        Self {
            persons,
            catalog,
            evaluations,
        }
    }

    /// `None` when the period does not exist or the person has no evaluation in it
    pub async fn ranking_for_person(
        &self,
        person_id: &PersonId,
        period: PeriodKey,
    ) -> Result<Option<RankingInfo>, AppError> {
        let Some(eval_period) = self.evaluations.find_period(&period).await? else {
            return Ok(None);
        };
        let ranked = self.evaluations.find_ranked(&eval_period.id, 0).await?;
        Ok(rank_of(&ranked, person_id))
    }

    pub async fn overview(
        &self,
        period: PeriodKey,
        top_n: usize,
        trend_months: u32,
    ) -> Result<AdminOverview, AppError> {
        let eval_period = self
            .evaluations
            .find_period(&period)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Period not found: {}", period)))?;

        let ranked = self.evaluations.find_ranked(&eval_period.id, 0).await?;
        let scores: Vec<f64> = ranked.iter().map(|e| e.total_score).collect();
        let overall_stats = overall_statistics(&scores).ok_or_else(|| {
            DomainError::NotFound(format!("No evaluations found for {}", period))
        })?;

        let persons = self.persons_of(&ranked).await?;

        let top: Vec<Evaluation> = ranked.iter().take(top_n).cloned().collect();
        let bottom: Vec<Evaluation> = ranked.iter().rev().take(top_n).cloned().collect();

        let pillar_analysis = self.pillar_analysis(&eval_period.id, &ranked, &persons).await?;
        let trend_comparison = self.trend_comparison(period, trend_months).await?;

        Ok(AdminOverview {
            period: period.to_string(),
            overall_stats,
            top_performers: leaderboard_entries(&top, &persons),
            bottom_performers: leaderboard_entries(&bottom, &persons),
            pillar_analysis,
            trend_comparison,
            distributions: score_distribution(&scores),
        })
    }

    /// Side-by-side totals and pillar scores. People without an evaluation
    /// in the period are left out; an evaluated id missing from the person
    /// directory is kept with an empty name. The chart only lists pillars
    /// that appear in someone's details, each in request order.
    pub async fn compare_team(
        &self,
        person_ids: &[PersonId],
        period: PeriodKey,
    ) -> Result<TeamComparison, AppError> {
        if !(MIN_COMPARE_PERSONS..=MAX_COMPARE_PERSONS).contains(&person_ids.len()) {
            return Err(DomainError::Validation(format!(
                "Between {} and {} people can be compared, got {}",
                MIN_COMPARE_PERSONS,
                MAX_COMPARE_PERSONS,
                person_ids.len()
            ))
            .into());
        }

        let eval_period = self
            .evaluations
            .find_period(&period)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Period not found: {}", period)))?;

        let index = CatalogIndex::new(
            self.catalog.find_all_kpi_items().await?,
            self.catalog.find_all_pillars().await?,
        );
        let names: HashMap<PersonId, String> = self
            .persons
            .find_by_ids(person_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p.name))
            .collect();

        let mut comparisons = Vec::with_capacity(person_ids.len());
        let mut pillar_chart: Vec<PillarChart> = Vec::new();
        for person_id in person_ids {
            let Some(evaluation) = self
                .evaluations
                .find_by_person_and_period(person_id, &eval_period.id)
                .await?
            else {
                continue;
            };
            let details = self.evaluations.find_details(&evaluation.id).await?;
            let person_name = names.get(person_id).cloned().unwrap_or_default();
            let pillar_scores = index.pillar_summaries(&details);

            for summary in &pillar_scores {
                let score = ChartScore {
                    person_name: person_name.clone(),
                    score: summary.score,
                };
                match pillar_chart.iter_mut().find(|c| c.pillar_name == summary.name) {
                    Some(chart) => chart.tl_scores.push(score),
                    None => pillar_chart.push(PillarChart {
                        pillar_name: summary.name.clone(),
                        tl_scores: vec![score],
                    }),
                }
            }

            comparisons.push(MemberComparison {
                person_id: *person_id,
                person_name,
                total_score: evaluation.total_score,
                rank: 0,
                pillar_scores,
            });
        }

        comparisons.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));
        for (i, comparison) in comparisons.iter_mut().enumerate() {
            comparison.rank = i + 1;
        }

        Ok(TeamComparison {
            period: period.to_string(),
            comparisons,
            pillar_chart,
        })
    }

    /// Latest `months` evaluations of a person, oldest first
    pub async fn performance_trend(
        &self,
        person_id: &PersonId,
        months: u32,
    ) -> Result<Vec<PerformanceTrendPoint>, AppError> {
        let months = if months == 0 { DEFAULT_TREND_MONTHS } else { months };
        let mut recent = self
            .evaluations
            .find_recent_by_person(person_id, u64::from(months))
            .await?;
        recent.reverse();

        Ok(recent
            .into_iter()
            .map(|e| PerformanceTrendPoint {
                period_month: e.period.month(),
                period_year: e.period.year(),
                period_label: e.period.label(),
                total_score: e.total_score,
            })
            .collect())
    }

    async fn persons_of(
        &self,
        evaluations: &[Evaluation],
    ) -> Result<HashMap<PersonId, Person>, DomainError> {
        let ids: Vec<PersonId> = evaluations.iter().map(|e| e.person_id).collect();
        Ok(self
            .persons
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect())
    }

    /// Average detail score and top scorer for every pillar. Pillars with
    /// no details in the period report zeros and an empty top scorer.
    async fn pillar_analysis(
        &self,
        period_id: &PeriodId,
        ranked: &[Evaluation],
        persons: &HashMap<PersonId, Person>,
    ) -> Result<Vec<PillarAnalysis>, DomainError> {
        let pillars = self.catalog.find_all_pillars().await?;
        let index = CatalogIndex::new(self.catalog.find_all_kpi_items().await?, pillars.clone());
        let details = self.evaluations.find_details_for_period(period_id).await?;

        let owner: HashMap<_, PersonId> = ranked.iter().map(|e| (e.id, e.person_id)).collect();

        // (sum, count) of detail scores and per-person sums, keyed by pillar
        let mut totals: HashMap<PillarId, (f64, usize)> = HashMap::new();
        let mut by_person: HashMap<PillarId, HashMap<PersonId, f64>> = HashMap::new();
        for detail in &details {
            let Some(pillar) = index.pillar_of(&detail.kpi_item_id) else {
                continue;
            };
            let entry = totals.entry(pillar.id).or_insert((0.0, 0));
            entry.0 += detail.score;
            entry.1 += 1;
            if let Some(person_id) = owner.get(&detail.evaluation_id) {
                *by_person
                    .entry(pillar.id)
                    .or_default()
                    .entry(*person_id)
                    .or_insert(0.0) += detail.score;
            }
        }

        Ok(pillars
            .iter()
            .map(|pillar| {
                let average_score = match totals.get(&pillar.id) {
                    Some((sum, count)) if *count > 0 => sum / *count as f64,
                    _ => 0.0,
                };

                let mut top_scorer = String::new();
                let mut top_score = 0.0;
                if let Some(sums) = by_person.get(&pillar.id) {
                    // walk in rank order so ties go to the higher total
                    let mut best: Option<(PersonId, f64)> = None;
                    for evaluation in ranked {
                        if let Some(&sum) = sums.get(&evaluation.person_id) {
                            if best.map_or(true, |(_, s)| sum > s) {
                                best = Some((evaluation.person_id, sum));
                            }
                        }
                    }
                    if let Some((person_id, sum)) = best {
                        top_scorer = persons
                            .get(&person_id)
                            .map(|p| p.name.clone())
                            .unwrap_or_default();
                        top_score = sum;
                    }
                }

                PillarAnalysis {
                    pillar_name: pillar.name.clone(),
                    average_score,
                    max_possible: pillar.weight,
                    achievement_pct: if pillar.weight > 0.0 {
                        average_score / pillar.weight * 100.0
                    } else {
                        0.0
                    },
                    top_scorer,
                    top_score,
                }
            })
            .collect())
    }

    async fn trend_comparison(
        &self,
        period: PeriodKey,
        months: u32,
    ) -> Result<Vec<PeriodComparison>, DomainError> {
        let mut keys = Vec::with_capacity(months as usize);
        let mut key = period;
        for _ in 0..months {
            keys.push(key);
            key = key.previous();
        }
        keys.reverse();

        let mut points = Vec::with_capacity(keys.len());
        for key in keys {
            let Some(eval_period) = self.evaluations.find_period(&key).await? else {
                continue;
            };
            let scores: Vec<f64> = self
                .evaluations
                .find_ranked(&eval_period.id, 0)
                .await?
                .iter()
                .map(|e| e.total_score)
                .collect();
            points.push((key, scores));
        }

        Ok(trend(points))
    }
}
