//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod cache;
pub mod postgres;

pub use cache::CachedKpiCatalog;
pub use postgres::{
    PostgresEvaluationRepository, PostgresKpiCatalog, PostgresMetricRepository,
    PostgresPersonRepository,
};
