//! KPI catalog handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub status: &'static str,
}

/// POST /kpi-catalog/refresh
///
/// Drops the cached KPI items and pillars so the next read hits the database.
pub async fn refresh_catalog(State(state): State<AppState>) -> Json<RefreshResponse> {
    state.kpi_catalog.invalidate().await;
    tracing::info!("KPI catalog cache invalidated");

    Json(RefreshResponse {
        status: "refreshed",
    })
}
