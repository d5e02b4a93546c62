//! Request handlers, grouped by surface.

pub mod diplomacy;
pub mod gameplay;
pub mod health;
pub mod world;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::error::ApiError;

/// Optional `now` query parameter shared by the tick endpoints.
#[derive(Debug, Deserialize)]
pub struct NowQuery {
    pub now: Option<String>,
}

/// Parse an ISO-8601 instant; naive timestamps are read as UTC.
pub fn parse_now(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| ApiError::unprocessable(format!("invalid timestamp: {raw}")))
}
