//! In-process caching adapters

pub mod kpi_catalog;

pub use kpi_catalog::CachedKpiCatalog;
