//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities and ports.

pub mod analytics_service;
pub mod breakdown;
pub mod evaluation_calculator;
pub mod evaluation_service;
pub mod kpi_scorer;
pub mod metric_aggregator;
pub mod ranking;
pub mod scoring_config;

pub use analytics_service::{
    AdminOverview, AnalyticsService, PerformanceTrendPoint, TeamComparison,
};
pub use breakdown::EvaluationResponse;
pub use evaluation_calculator::ScoringPolicy;
pub use evaluation_service::{BatchOutcome, EvaluationService, EvaluationSettings, SkippedPerson};
pub use ranking::{LeaderboardResponse, RankingInfo};
