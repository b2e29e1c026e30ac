//! Admin-only status update for a single area.
//!
//! The `X-Admin-Key` check runs before the body is parsed; a rejected caller
//! never reaches the store.

use axum::{
    body::Bytes, extract::Path, extract::State, http::HeaderMap, routing::put, Json, Router,
};
use sqlx::SqlitePool;
use subtle::ConstantTimeEq;
use tracing::{info, warn};

use crate::{AppError, Config, StatusUpdate, UpdateConfirmation};

// ---

/// Header carrying the shared admin secret.
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

pub fn router() -> Router<(SqlitePool, Config)> {
    // ---
    Router::new().route("/admin/areas/{name}", put(handler))
}

async fn handler(
    Path(area_name): Path<String>,
    State((pool, config)): State<(SqlitePool, Config)>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<UpdateConfirmation>, AppError> {
    // ---
    if !is_authorized(&headers, &config.admin_key) {
        warn!("PUT /api/admin/areas/{} - rejected admin key", area_name);
        return Err(AppError::Unauthorized);
    }

    let update = StatusUpdate::from_body(&body)?;

    let affected = apply_update(&pool, &area_name, &update).await?;
    if affected == 0 {
        return Err(AppError::NotFound);
    }

    info!(
        "Area {} set to {:?} (details: {:?}, eta: {:?})",
        area_name, update.status, update.details, update.eta
    );
    Ok(Json(UpdateConfirmation::new(area_name)))
}

/// Compare the supplied header with the configured key in constant time.
fn is_authorized(headers: &HeaderMap, admin_key: &str) -> bool {
    // ---
    headers
        .get(ADMIN_KEY_HEADER)
        .map(|supplied| bool::from(supplied.as_bytes().ct_eq(admin_key.as_bytes())))
        .unwrap_or(false)
}

/// Overwrite `status`, `details` and `eta`; returns the number of rows touched.
async fn apply_update(
    pool: &SqlitePool,
    name: &str,
    update: &StatusUpdate,
) -> Result<u64, sqlx::Error> {
    // ---
    let result = sqlx::query(
        r#"
        UPDATE areas
        SET status = ?, details = ?, eta = ?
        WHERE LOWER(name) = ?
        "#,
    )
    .bind(&update.status)
    .bind(&update.details)
    .bind(&update.eta)
    .bind(name.to_lowercase())
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
