//! Data models for the area status service.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::AppError;

// ---

/// Keys an admin update body must carry, even when their value is `null`.
pub const REQUIRED_UPDATE_FIELDS: [&str; 3] = ["status", "details", "eta"];

/// A named area and its current water-service status, as stored and served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Area {
    // ---
    pub id: i64,
    pub name: String,
    pub status: String,
    pub details: Option<String>,
    pub eta: Option<String>,
}

/// New status values supplied by an administrator.
///
/// `status` is free text; no set of allowed values is enforced.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusUpdate {
    // ---
    pub status: String,
    pub details: Option<String>,
    pub eta: Option<String>,
}

impl StatusUpdate {
    /// Parse a raw request body.
    ///
    /// The body must be a JSON object holding every key in
    /// [`REQUIRED_UPDATE_FIELDS`]. `details` and `eta` may be `null`, `status`
    /// may not. Anything else is [`AppError::InvalidInput`].
    pub fn from_body(body: &[u8]) -> Result<Self, AppError> {
        // ---
        let value: Value = serde_json::from_slice(body).map_err(|_| AppError::InvalidInput)?;

        let object = value.as_object().ok_or(AppError::InvalidInput)?;
        if !REQUIRED_UPDATE_FIELDS
            .iter()
            .all(|key| object.contains_key(*key))
        {
            return Err(AppError::InvalidInput);
        }

        serde_json::from_value(value).map_err(|_| AppError::InvalidInput)
    }
}

/// JSON body returned after a successful admin update.
#[derive(Debug, Serialize)]
pub struct UpdateConfirmation {
    // ---
    pub message: String,
    pub area_name: String,
}

impl UpdateConfirmation {
    pub fn new(area_name: impl Into<String>) -> Self {
        Self {
            message: "Status updated successfully".to_string(),
            area_name: area_name.into(),
        }
    }
}
