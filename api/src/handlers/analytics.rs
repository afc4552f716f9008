//! Analytics handlers
//!
//! Read-only views derived from stored evaluations.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::app::scoring_config::{DEFAULT_TOP_PERFORMERS, DEFAULT_TREND_MONTHS};
use crate::app::{AdminOverview, PerformanceTrendPoint, RankingInfo, TeamComparison};
use crate::domain::entities::PersonId;
use crate::error::AppError;
use crate::handlers::evaluations::PeriodQuery;
use crate::handlers::parse_period;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct OverviewQuery {
    pub period_month: u32,
    pub period_year: i32,
    pub top_n: Option<usize>,
    pub trend_months: Option<u32>,
}

impl OverviewQuery {
    fn top_n(&self) -> usize {
        match self.top_n {
            Some(n) if n > 0 => n,
            _ => DEFAULT_TOP_PERFORMERS,
        }
    }

    fn trend_months(&self) -> u32 {
        match self.trend_months {
            Some(n) if n > 0 => n,
            _ => DEFAULT_TREND_MONTHS,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub person_ids: Vec<Uuid>,
    pub period_month: u32,
    pub period_year: i32,
}

#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    #[serde(default = "default_trend_months")]
    pub months: u32,
}

fn default_trend_months() -> u32 {
    DEFAULT_TREND_MONTHS
}

/// GET /analytics/ranking/:person_id
pub async fn get_ranking(
    State(state): State<AppState>,
    Path(person_id): Path<Uuid>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<RankingInfo>, AppError> {
    let period = parse_period(query.period_month, query.period_year)?;
    let ranking = state
        .analytics_service
        .ranking_for_person(&PersonId(person_id), period)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "No ranking for person {} in {}",
                person_id, period
            ))
        })?;

    Ok(Json(ranking))
}

/// GET /analytics/overview
pub async fn get_overview(
    State(state): State<AppState>,
    Query(query): Query<OverviewQuery>,
) -> Result<Json<AdminOverview>, AppError> {
    let period = parse_period(query.period_month, query.period_year)?;
    let overview = state
        .analytics_service
        .overview(period, query.top_n(), query.trend_months())
        .await?;

    Ok(Json(overview))
}

/// POST /analytics/compare
pub async fn compare_team(
    State(state): State<AppState>,
    Json(request): Json<CompareRequest>,
) -> Result<Json<TeamComparison>, AppError> {
    let period = parse_period(request.period_month, request.period_year)?;
    let person_ids: Vec<PersonId> = request.person_ids.into_iter().map(PersonId).collect();
    let comparison = state
        .analytics_service
        .compare_team(&person_ids, period)
        .await?;

    Ok(Json(comparison))
}

/// GET /analytics/trend/:person_id
pub async fn get_performance_trend(
    State(state): State<AppState>,
    Path(person_id): Path<Uuid>,
    Query(query): Query<TrendQuery>,
) -> Result<Json<Vec<PerformanceTrendPoint>>, AppError> {
    let trend = state
        .analytics_service
        .performance_trend(&PersonId(person_id), query.months)
        .await?;

    Ok(Json(trend))
}
