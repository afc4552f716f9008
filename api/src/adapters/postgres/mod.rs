//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.

pub mod evaluation_repo;
pub mod kpi_catalog_repo;
pub mod metric_repo;
pub mod person_repo;

#[cfg(test)]
mod integration_tests;

pub use evaluation_repo::PostgresEvaluationRepository;
pub use kpi_catalog_repo::PostgresKpiCatalog;
pub use metric_repo::PostgresMetricRepository;
pub use person_repo::PostgresPersonRepository;
