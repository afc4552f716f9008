//! TL Score API Server
//!
//! Computes monthly KPI evaluations for team leaders from operational
//! metrics and serves rankings and analytics over the stored results.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Json, Router,
};
use sea_orm::{Database, DatabaseConnection};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;

use adapters::{
    CachedKpiCatalog, PostgresEvaluationRepository, PostgresKpiCatalog, PostgresMetricRepository,
    PostgresPersonRepository,
};
use app::{AnalyticsService, EvaluationService, EvaluationSettings, ScoringPolicy};
use config::Config;

pub type KpiCatalogCache = CachedKpiCatalog<PostgresKpiCatalog>;

pub type Evaluations = EvaluationService<
    PostgresPersonRepository,
    KpiCatalogCache,
    PostgresMetricRepository,
    PostgresEvaluationRepository,
>;

pub type Analytics =
    AnalyticsService<PostgresPersonRepository, KpiCatalogCache, PostgresEvaluationRepository>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub evaluation_service: Arc<Evaluations>,
    pub analytics_service: Arc<Analytics>,
    pub kpi_catalog: Arc<KpiCatalogCache>,
}

impl AppState {
    fn new(db: DatabaseConnection, config: &Config) -> Self {
        let person_repo = Arc::new(PostgresPersonRepository::new(db.clone()));
        let metric_repo = Arc::new(PostgresMetricRepository::new(db.clone()));
        let evaluation_repo = Arc::new(PostgresEvaluationRepository::new(db.clone()));
        let kpi_catalog = Arc::new(CachedKpiCatalog::new(
            Arc::new(PostgresKpiCatalog::new(db)),
            config.kpi_cache_ttl,
        ));

        let evaluation_service = Arc::new(EvaluationService::new(
            person_repo.clone(),
            kpi_catalog.clone(),
            metric_repo,
            evaluation_repo.clone(),
            EvaluationSettings {
                concurrency: config.evaluation_concurrency,
                policy: ScoringPolicy {
                    apply_person_targets: config.apply_person_targets,
                },
            },
        ));

        let analytics_service = Arc::new(AnalyticsService::new(
            person_repo,
            kpi_catalog.clone(),
            evaluation_repo,
        ));

        Self {
            evaluation_service,
            analytics_service,
            kpi_catalog,
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        // Evaluations
        .route("/evaluations", get(handlers::list_evaluations))
        .route("/evaluations/calculate", post(handlers::calculate))
        .route("/evaluations/recalculate", post(handlers::recalculate))
        .route("/evaluations/leaderboard", get(handlers::get_leaderboard))
        .route("/evaluations/person/:person_id", get(handlers::get_by_person))
        .route("/evaluations/:id", get(handlers::get_evaluation))
        // Analytics
        .route("/analytics/ranking/:person_id", get(handlers::get_ranking))
        .route("/analytics/overview", get(handlers::get_overview))
        .route("/analytics/compare", post(handlers::compare_team))
        .route(
            "/analytics/trend/:person_id",
            get(handlers::get_performance_trend),
        )
        // Catalog
        .route("/kpi-catalog/refresh", post(handlers::refresh_catalog))
        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tlscore_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting TL Score API...");

    let config = Config::from_env()?;

    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    let state = AppState::new(db, &config);
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(
        concurrency = config.evaluation_concurrency,
        cache_ttl_secs = config.kpi_cache_ttl.as_secs(),
        person_targets = config.apply_person_targets,
        "Listening on {}",
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::time::Duration;
    use tower::ServiceExt;

    /// Router over a connection that never reaches a database. Only requests
    /// rejected before touching storage can be exercised.
    fn offline_router() -> Router {
        let config = Config {
            database_url: String::new(),
            port: 0,
            evaluation_concurrency: 1,
            kpi_cache_ttl: Duration::ZERO,
            apply_person_targets: false,
        };
        router(AppState::new(DatabaseConnection::Disconnected, &config))
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = offline_router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn calculate_rejects_old_period() {
        let request = Request::post("/evaluations/calculate")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"period_month": 3, "period_year": 2019}"#))
            .unwrap();
        let response = offline_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn leaderboard_rejects_bad_month() {
        let request = Request::get("/evaluations/leaderboard?period_month=13&period_year=2025")
            .body(Body::empty())
            .unwrap();
        let response = offline_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn list_rejects_half_a_period() {
        let request = Request::get("/evaluations?period_month=4")
            .body(Body::empty())
            .unwrap();
        let response = offline_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn list_rejects_unreachable_page() {
        let request = Request::get("/evaluations?page=18446744073709551615")
            .body(Body::empty())
            .unwrap();
        let response = offline_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn refresh_catalog_succeeds_without_database() {
        let request = Request::post("/kpi-catalog/refresh")
            .body(Body::empty())
            .unwrap();
        let response = offline_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
