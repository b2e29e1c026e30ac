//! Configuration loader for the `water-status` backend service.
//!
//! This module centralizes all runtime configuration values and their defaults,
//! loading from environment variables (with optional `.env` file support
//! provided by the caller). Nothing else in the crate reads `env::var`.
//!
use std::{
    env, fmt,
    net::{IpAddr, Ipv4Addr},
};

use anyhow::{anyhow, bail, Result};

/// Parse an optional variable into `$ty` with a default value.
macro_rules! parse_env {
    ($lookup:expr, $var_name:expr, $ty:ty, $default:expr) => {
        $lookup($var_name)
            .map(|v| v.parse::<$ty>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Parse a required string variable.
macro_rules! require_env {
    ($lookup:expr, $var_name:expr) => {
        $lookup($var_name)
            .ok_or_else(|| anyhow!("{} must be set in .env or environment", $var_name))?
    };
}

pub const DEFAULT_DATABASE_URL: &str = "sqlite:water_status.db";
pub const DEFAULT_BIND_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DB_POOL_MAX: u32 = 5;

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent configuration
/// snapshot for the lifetime of the application.
#[derive(Clone)]
pub struct Config {
    // ---
    /// SQLite connection string, e.g. `sqlite:water_status.db`.
    pub db_url: String,

    /// Maximum number of database connections in the pool.
    pub db_pool_max: u32,

    /// Shared secret expected in the `X-Admin-Key` header.
    pub admin_key: String,

    /// Address the HTTP listener binds to.
    pub bind_host: IpAddr,

    /// Port the HTTP listener binds to.
    pub port: u16,
}

/// Load configuration from environment variables with defaults.
///
/// Required:
/// - `ADMIN_KEY` – shared secret for admin updates (must be non-empty)
///
/// Optional:
/// - `DATABASE_URL` – SQLite connection string (default: `sqlite:water_status.db`)
/// - `DB_POOL_MAX` – max DB connections (default: 5)
/// - `BIND_HOST` – listen address (default: `0.0.0.0`)
/// - `PORT` – listen port (default: 5000)
///
/// Returns an error if any required variable is missing or invalid.
pub fn load_from_env() -> Result<Config> {
    load_from(|name| env::var(name).ok())
}

/// Build a [`Config`] from any variable source; `lookup` returns `None` for
/// unset variables.
pub fn load_from(lookup: impl Fn(&str) -> Option<String>) -> Result<Config> {
    // ---
    let admin_key = require_env!(lookup, "ADMIN_KEY");
    if admin_key.is_empty() {
        bail!("ADMIN_KEY must not be empty");
    }

    let db_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
    let db_pool_max = parse_env!(lookup, "DB_POOL_MAX", u32, DEFAULT_DB_POOL_MAX);
    let port = parse_env!(lookup, "PORT", u16, DEFAULT_PORT);
    let bind_host = parse_env!(lookup, "BIND_HOST", IpAddr, DEFAULT_BIND_HOST);

    if db_pool_max == 0 {
        bail!("DB_POOL_MAX must be at least 1");
    }

    Ok(Config {
        db_url,
        db_pool_max,
        admin_key,
        bind_host,
        port,
    })
}

impl Config {
    /// Log the loaded configuration for debugging purposes.
    ///
    /// The admin key is never written out; only its length is shown.
    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!("  DATABASE_URL : {}", self.db_url);
        tracing::info!("  DB_POOL_MAX  : {}", self.db_pool_max);
        tracing::info!("  ADMIN_KEY    : {}", self.masked_admin_key());
        tracing::info!("  BIND_HOST    : {}", self.bind_host);
        tracing::info!("  PORT         : {}", self.port);
    }

    fn masked_admin_key(&self) -> String {
        format!("**** ({} chars)", self.admin_key.chars().count())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("db_url", &self.db_url)
            .field("db_pool_max", &self.db_pool_max)
            .field("admin_key", &self.masked_admin_key())
            .field("bind_host", &self.bind_host)
            .field("port", &self.port)
            .finish()
    }
}
