use axum::{extract::Path, extract::State, routing::get, Json, Router};
use sqlx::SqlitePool;
use tracing::debug;

use crate::{AppError, Area, Config};

// ---

pub fn router() -> Router<(SqlitePool, Config)> {
    // ---
    Router::new().route("/areas/{name}", get(handler))
}

async fn handler(
    Path(area_name): Path<String>,
    State((pool, _config)): State<(SqlitePool, Config)>,
) -> Result<Json<Area>, AppError> {
    // ---
    debug!("GET /api/areas/{}", area_name);

    find_area(&pool, &area_name)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

/// Look up one area by name, ignoring case.
async fn find_area(pool: &SqlitePool, name: &str) -> Result<Option<Area>, sqlx::Error> {
    // ---
    sqlx::query_as::<_, Area>(
        "SELECT id, name, status, details, eta FROM areas WHERE LOWER(name) = ?",
    )
    .bind(name.to_lowercase())
    .fetch_optional(pool)
    .await
}
