//! HTTP services, one `Scope` per resource, registered in `main.rs`.

pub mod config;
pub mod export;
pub mod identity;
pub mod submissions;
pub mod weeks;

use crate::error::ApiError;
use chrono::NaiveDate;
use common::schedule::parse_week_ending;

/// Parses the `{week}` path segment shared by several routes.
pub(crate) fn parse_week(raw: &str) -> Result<NaiveDate, ApiError> {
    parse_week_ending(raw).ok_or_else(|| ApiError::InvalidWeek(raw.to_string()))
}
