//! Fetch-log model definitions

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::constants::DEFAULT_FETCHED_AT;

/// Last time a logical feed type was polled. One row per `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct FetchLog {
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    pub fetched_at: DateTime<Utc>,
}

/// [`DEFAULT_FETCHED_AT`] as a timestamp, used for feed types that were never recorded.
pub fn default_fetched_at() -> Result<DateTime<Utc>, chrono::ParseError> {
    DEFAULT_FETCHED_AT.parse()
}
