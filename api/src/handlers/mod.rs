//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod analytics;
pub mod catalog;
pub mod evaluations;

pub use analytics::{compare_team, get_overview, get_performance_trend, get_ranking};
pub use catalog::refresh_catalog;
pub use evaluations::{
    calculate, get_by_person, get_evaluation, get_leaderboard, list_evaluations, recalculate,
};

use crate::app::scoring_config::MIN_PERIOD_YEAR;
use crate::domain::entities::PeriodKey;
use crate::error::AppError;

/// Validate a (month, year) pair coming off the wire
pub(crate) fn parse_period(month: u32, year: i32) -> Result<PeriodKey, AppError> {
    if year < MIN_PERIOD_YEAR {
        return Err(AppError::BadRequest(format!(
            "period_year must be {} or later, got {}",
            MIN_PERIOD_YEAR, year
        )));
    }
    PeriodKey::new(month, year).map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Month and year filters must be given together
pub(crate) fn parse_optional_period(
    month: Option<u32>,
    year: Option<i32>,
) -> Result<Option<PeriodKey>, AppError> {
    match (month, year) {
        (Some(month), Some(year)) => parse_period(month, year).map(Some),
        (None, None) => Ok(None),
        _ => Err(AppError::BadRequest(
            "period_month and period_year must be given together".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_period() {
        let period = parse_period(3, 2025).unwrap();
        assert_eq!(period.month(), 3);
        assert_eq!(period.year(), 2025);
    }

    #[test]
    fn rejects_month_out_of_range() {
        assert!(matches!(parse_period(0, 2025), Err(AppError::BadRequest(_))));
        assert!(matches!(parse_period(13, 2025), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn rejects_years_before_minimum() {
        assert!(matches!(parse_period(6, 2019), Err(AppError::BadRequest(_))));
        assert!(parse_period(1, MIN_PERIOD_YEAR).is_ok());
    }

    #[test]
    fn optional_period_needs_both_parts() {
        assert!(parse_optional_period(None, None).unwrap().is_none());
        assert!(parse_optional_period(Some(4), Some(2025)).unwrap().is_some());
        assert!(parse_optional_period(Some(4), None).is_err());
        assert!(parse_optional_period(None, Some(2025)).is_err());
    }
}
