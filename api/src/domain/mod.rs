//! Domain layer
//!
//! Contains pure business logic with no external dependencies.
//! - `entities`: Domain models for people, KPIs, metrics and evaluations
//! - `ports`: Trait definitions for external dependencies

pub mod entities;
pub mod ports;
