/// Health check endpoint
///
/// `GET /health` — public liveness probe that also pings the database so
/// orchestrators notice a lost connection.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::app::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status ("ok" or "degraded")
    pub status: &'static str,

    /// API server version
    pub version: &'static str,

    /// Database reachability ("up" or "down")
    pub database: &'static str,
}

/// Health check handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database_up = taskboard_shared::db::pool::health_check(&state.db)
        .await
        .is_ok();

    Json(HealthResponse {
        status: if database_up { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        database: if database_up { "up" } else { "down" },
    })
}
