//! Leaderboard and ranking derivations
//!
//! Pure functions over the descending-score list of a period.

use std::collections::HashMap;

use serde::Serialize;

use crate::app::scoring_config::DISTRIBUTION_BOUNDS;
use crate::domain::entities::{Evaluation, PeriodKey, Person, PersonId};

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub person_id: PersonId,
    pub person_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub dealer_code: String,
    pub total_score: f64,
    pub period_month: u32,
    pub period_year: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardResponse {
    /// "YYYY-MM"
    pub period: String,
    pub entries: Vec<LeaderboardEntry>,
    pub total: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RankingInfo {
    pub rank: usize,
    pub total_tls: usize,
    /// "Top X%" figure
    pub percentile: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallStatistics {
    pub total_tls: usize,
    pub average_score: f64,
    pub median_score: f64,
    pub highest_score: f64,
    pub lowest_score: f64,
    pub standard_deviation: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScoreDistribution {
    pub range_0_20: usize,
    pub range_20_40: usize,
    pub range_40_60: usize,
    pub range_60_80: usize,
    pub range_80_100: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodComparison {
    pub period_month: u32,
    pub period_year: i32,
    /// e.g. "Mar 2025"
    pub period_label: String,
    pub average_score: f64,
    pub participating_tls: usize,
    /// Difference from the previous point in the series
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<f64>,
}

/// `100 - trunc(rank / total * 100)`
pub fn percentile(rank: usize, total: usize) -> i64 {
    if total == 0 {
        return 0;
    }
    100 - ((rank as f64 / total as f64) * 100.0) as i64
}

/// Position of a person in an already ranked list
pub fn rank_of(ranked: &[Evaluation], person_id: &PersonId) -> Option<RankingInfo> {
    let index = ranked.iter().position(|e| &e.person_id == person_id)?;
    let rank = index + 1;
    Some(RankingInfo {
        rank,
        total_tls: ranked.len(),
        percentile: percentile(rank, ranked.len()),
    })
}

/// Leaderboard rows for ranked evaluations.
///
/// Evaluations whose person is no longer in the directory are dropped and
/// ranks are assigned in output order.
pub fn leaderboard_entries(
    ranked: &[Evaluation],
    persons: &HashMap<PersonId, Person>,
) -> Vec<LeaderboardEntry> {
    ranked
        .iter()
        .filter_map(|evaluation| {
            persons
                .get(&evaluation.person_id)
                .map(|person| (evaluation, person))
        })
        .enumerate()
        .map(|(index, (evaluation, person))| LeaderboardEntry {
            rank: index + 1,
            person_id: person.id,
            person_name: person.name.clone(),
            dealer_code: person.dealer_code.clone().unwrap_or_default(),
            total_score: evaluation.total_score,
            period_month: evaluation.period.month(),
            period_year: evaluation.period.year(),
        })
        .collect()
}

/// Mean, median, extremes and population standard deviation
pub fn overall_statistics(scores: &[f64]) -> Option<OverallStatistics> {
    if scores.is_empty() {
        return None;
    }

    let count = scores.len() as f64;
    let average = scores.iter().sum::<f64>() / count;

    let mut sorted = scores.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    let median = if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    };

    let variance = scores.iter().map(|s| (s - average).powi(2)).sum::<f64>() / count;

    Some(OverallStatistics {
        total_tls: scores.len(),
        average_score: average,
        median_score: median,
        highest_score: sorted[sorted.len() - 1],
        lowest_score: sorted[0],
        standard_deviation: variance.sqrt(),
    })
}

/// Count scores into the five fixed buckets. Scores outside `[0, 100]`
/// are not counted.
pub fn score_distribution(scores: &[f64]) -> ScoreDistribution {
    let mut dist = ScoreDistribution::default();
    let [b1, b2, b3, b4, b5] = DISTRIBUTION_BOUNDS;

    for &score in scores {
        if score < 0.0 {
            continue;
        } else if score < b1 {
            dist.range_0_20 += 1;
        } else if score < b2 {
            dist.range_20_40 += 1;
        } else if score < b3 {
            dist.range_40_60 += 1;
        } else if score < b4 {
            dist.range_60_80 += 1;
        } else if score <= b5 {
            dist.range_80_100 += 1;
        }
    }

    dist
}

/// Build a chronological trend from periods that have scores.
///
/// `points` must be oldest first. `change` compares each point with the
/// previous point in the output, so skipped months do not count.
pub fn trend(points: Vec<(PeriodKey, Vec<f64>)>) -> Vec<PeriodComparison> {
    let mut out: Vec<PeriodComparison> = Vec::with_capacity(points.len());

    for (period, scores) in points {
        if scores.is_empty() {
            continue;
        }
        let average = scores.iter().sum::<f64>() / scores.len() as f64;
        let change = out.last().map(|prev| average - prev.average_score);

        out.push(PeriodComparison {
            period_month: period.month(),
            period_year: period.year(),
            period_label: period.label(),
            average_score: average,
            participating_tls: scores.len(),
            change,
        });
    }

    out
}
