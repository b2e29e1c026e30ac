//! Database schema management for `water-status`.
//!
//! Ensures the `areas` table exists and holds the seed rows before serving
//! requests. Applied once on startup from `main.rs` (EMBP: single gateway call).

use anyhow::Result;
use sqlx::SqlitePool;

// ---

/// Areas inserted on first start: `(name, status, details, eta)`.
pub const SEED_AREAS: [(&str, &str, &str, &str); 3] = [
    ("randburg", "Outage", "Planned Maintenance", "6 PM today"),
    ("rosebank", "Normal", "All clear", "N/A"),
    (
        "soweto",
        "Low Pressure",
        "High demand",
        "Expected to improve by 10 PM",
    ),
];

/// Create the database schema (idempotent).
///
/// Creates the `areas` table. Safe to call on every startup; no-op if the
/// table already exists.
///
/// Errors are propagated if any SQL execution fails.
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    // ---
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS areas (
            id      INTEGER PRIMARY KEY AUTOINCREMENT,
            name    TEXT    NOT NULL UNIQUE,
            status  TEXT    NOT NULL,
            details TEXT,
            eta     TEXT
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}

/// Insert every [`SEED_AREAS`] row whose `name` is not already present.
///
/// Existing rows keep their current `status`, `details` and `eta`, so this is
/// safe to run on every startup.
pub async fn seed_areas(pool: &SqlitePool) -> Result<()> {
    // ---
    let mut tx = pool.begin().await?;
    let mut inserted = 0;

    for (name, status, details, eta) in SEED_AREAS {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO areas (name, status, details, eta)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(name)
        .bind(status)
        .bind(details)
        .bind(eta)
        .execute(&mut *tx)
        .await?;

        inserted += result.rows_affected();
    }

    tx.commit().await?;
    tracing::info!("Seeded {} new area(s)", inserted);
    Ok(())
}
