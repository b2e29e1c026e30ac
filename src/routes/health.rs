// src/routes/health.rs
//! Service health check endpoint.
//!
//! `GET /health` answers whether the service can still reach its SQLite
//! store. Mounted at the root, outside `/api`.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::Config;

/// JSON response body for the `/health` endpoint.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Handle `GET /health`.
///
/// Runs a trivial `SELECT 1`. Returns `200 {"status":"ok"}` when the store
/// answers and `503 {"status":"unavailable"}` otherwise.
async fn health(
    State((pool, _config)): State<(SqlitePool, Config)>,
) -> (StatusCode, Json<HealthResponse>) {
    match sqlx::query("SELECT 1").execute(&pool).await {
        Ok(_) => (StatusCode::OK, Json(HealthResponse { status: "ok" })),
        Err(e) => {
            tracing::error!(error = %e, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unavailable",
                }),
            )
        }
    }
}

/// Create a subrouter containing the `/health` route.
pub fn router() -> Router<(SqlitePool, Config)> {
    Router::new().route("/health", get(health))
}
