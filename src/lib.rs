//! Library half of the `water-status` backend service.
//!
//! The binary in `main.rs` only wires these pieces together; keeping them in a
//! library lets the integration tests start the very same router.
//!
//! Modules follow the Explicit Module Boundary Pattern (EMBP): `routes/*.rs`
//! reach shared types through this crate root, never through each other.
use std::str::FromStr;

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod schema;

pub use config::Config;
pub use error::AppError;
pub use models::{Area, StatusUpdate, UpdateConfirmation};

// ---

/// Open the SQLite connection pool described by `cfg`.
///
/// The database file is created if it does not exist yet.
pub async fn connect(cfg: &Config) -> Result<SqlitePool> {
    // ---
    let options = SqliteConnectOptions::from_str(&cfg.db_url)
        .map_err(|e| anyhow::anyhow!("Invalid DATABASE_URL '{}': {}", cfg.db_url, e))?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(cfg.db_pool_max)
        .connect_with(options)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to database '{}': {}", cfg.db_url, e))?;

    Ok(pool)
}

/// Configuration for tests: a private in-memory database on one connection.
#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        db_url: "sqlite::memory:".to_string(),
        db_pool_max: 1,
        admin_key: "test-admin-key".to_string(),
        bind_host: std::net::IpAddr::from([127, 0, 0, 1]),
        port: 0,
    }
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    connect(&test_config()).await.unwrap()
}
