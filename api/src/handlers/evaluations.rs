//! Evaluation handlers
//!
//! Endpoints for calculating, reading and ranking evaluations.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app::scoring_config::{DEFAULT_LEADERBOARD_LIMIT, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::app::{BatchOutcome, EvaluationResponse, LeaderboardResponse, SkippedPerson};
use crate::domain::entities::{EvaluationQuery, EvaluationSort, PersonId, SortDirection};
use crate::error::AppError;
use crate::handlers::{parse_optional_period, parse_period};
use crate::AppState;

/// Body for calculate and recalculate
#[derive(Debug, Deserialize)]
pub struct CalculateRequest {
    pub period_month: u32,
    pub period_year: i32,
    /// Limit the run to one team leader
    pub person_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct CalculateResponse {
    pub evaluations: Vec<EvaluationResponse>,
    pub skipped: Vec<SkippedPerson>,
}

impl From<BatchOutcome> for CalculateResponse {
    fn from(outcome: BatchOutcome) -> Self {
        Self {
            evaluations: outcome.succeeded,
            skipped: outcome.skipped,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    pub period_month: u32,
    pub period_year: i32,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListEvaluationsQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub period_month: Option<u32>,
    pub period_year: Option<i32>,
    pub person_id: Option<Uuid>,
    pub sort_by: Option<EvaluationSort>,
    pub sort_dir: Option<SortDirection>,
}

impl ListEvaluationsQuery {
    fn into_query(self) -> Result<EvaluationQuery, AppError> {
        let limit = match self.limit {
            None | Some(0) => DEFAULT_PAGE_SIZE,
            Some(limit) => limit.min(MAX_PAGE_SIZE),
        };

        let page = self.page.unwrap_or(1).max(1);
        let within_range = (page - 1)
            .checked_mul(limit)
            .is_some_and(|offset| offset <= i64::MAX as u64);
        if !within_range {
            return Err(AppError::BadRequest(format!("page {} is out of range", page)));
        }

        Ok(EvaluationQuery {
            period: parse_optional_period(self.period_month, self.period_year)?,
            person_id: self.person_id.map(PersonId),
            sort_by: self.sort_by.unwrap_or_default(),
            direction: self.sort_dir.unwrap_or_default(),
            page,
            limit,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ListEvaluationsResponse {
    pub evaluations: Vec<EvaluationResponse>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub period_month: u32,
    pub period_year: i32,
    pub limit: Option<i64>,
}

impl LeaderboardQuery {
    fn effective_limit(&self) -> u64 {
        match self.limit {
            Some(limit) if limit >= 1 => limit as u64,
            _ => DEFAULT_LEADERBOARD_LIMIT,
        }
    }
}

/// POST /evaluations/calculate
pub async fn calculate(
    State(state): State<AppState>,
    Json(request): Json<CalculateRequest>,
) -> Result<Json<CalculateResponse>, AppError> {
    let period = parse_period(request.period_month, request.period_year)?;
    let outcome = state
        .evaluation_service
        .calculate_batch(period, request.person_id.map(PersonId))
        .await?;

    Ok(Json(outcome.into()))
}

/// POST /evaluations/recalculate
///
/// Deletes the existing evaluations of the targeted people before calculating.
pub async fn recalculate(
    State(state): State<AppState>,
    Json(request): Json<CalculateRequest>,
) -> Result<Json<CalculateResponse>, AppError> {
    let period = parse_period(request.period_month, request.period_year)?;
    let outcome = state
        .evaluation_service
        .recalculate_batch(period, request.person_id.map(PersonId))
        .await?;

    Ok(Json(outcome.into()))
}

/// GET /evaluations/:id
pub async fn get_evaluation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EvaluationResponse>, AppError> {
    let evaluation = state.evaluation_service.get_by_id(&id.into()).await?;
    Ok(Json(evaluation))
}

/// GET /evaluations/person/:person_id
pub async fn get_by_person(
    State(state): State<AppState>,
    Path(person_id): Path<Uuid>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<EvaluationResponse>, AppError> {
    let period = parse_period(query.period_month, query.period_year)?;
    let evaluation = state
        .evaluation_service
        .get_by_person_and_period(&PersonId(person_id), period)
        .await?;

    Ok(Json(evaluation))
}

/// GET /evaluations
pub async fn list_evaluations(
    State(state): State<AppState>,
    Query(query): Query<ListEvaluationsQuery>,
) -> Result<Json<ListEvaluationsResponse>, AppError> {
    let query = query.into_query()?;
    let (evaluations, total) = state.evaluation_service.list(&query).await?;

    Ok(Json(ListEvaluationsResponse {
        evaluations,
        total,
        page: query.page,
        limit: query.limit,
    }))
}

/// GET /evaluations/leaderboard
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<LeaderboardResponse>, AppError> {
    let period = parse_period(query.period_month, query.period_year)?;
    let leaderboard = state
        .evaluation_service
        .leaderboard(period, query.effective_limit())
        .await?;

    Ok(Json(leaderboard))
}
