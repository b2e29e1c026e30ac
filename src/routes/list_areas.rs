use axum::{extract::Query, extract::State, routing::get, Json, Router};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::debug;

use crate::{AppError, Area, Config};

// ---

pub fn router() -> Router<(SqlitePool, Config)> {
    // ---
    Router::new().route("/areas", get(handler))
}

/// Query parameters accepted by `GET /api/areas`.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    search: Option<String>,
}

async fn handler(
    Query(params): Query<ListQuery>,
    State((pool, _config)): State<(SqlitePool, Config)>,
) -> Result<Json<Vec<Area>>, AppError> {
    // ---
    let areas = match params.search.as_deref() {
        Some(term) if !term.is_empty() => search_areas(&pool, term).await?,
        _ => all_areas(&pool).await?,
    };

    debug!("GET /api/areas - returning {} area(s)", areas.len());
    Ok(Json(areas))
}

// ---

async fn all_areas(pool: &SqlitePool) -> Result<Vec<Area>, sqlx::Error> {
    // ---
    sqlx::query_as::<_, Area>("SELECT id, name, status, details, eta FROM areas ORDER BY id")
        .fetch_all(pool)
        .await
}

/// Areas whose lower-cased name contains the lower-cased `term`.
async fn search_areas(pool: &SqlitePool, term: &str) -> Result<Vec<Area>, sqlx::Error> {
    // ---
    let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
    debug!("Searching areas with pattern {:?}", pattern);

    sqlx::query_as::<_, Area>(
        r#"
        SELECT id, name, status, details, eta
        FROM areas
        WHERE LOWER(name) LIKE ? ESCAPE '\'
        ORDER BY id
        "#,
    )
    .bind(pattern)
    .fetch_all(pool)
    .await
}

/// Escape `LIKE` wildcards so the term only ever matches literally.
fn escape_like(term: &str) -> String {
    // ---
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
