//! Component operations. Each takes any [`sea_orm::ConnectionTrait`], so the
//! HTTP layer decides the transaction boundary.

pub mod artists;
pub mod identity;
pub mod musics;
pub mod profiles;

use chrono::{DateTime, FixedOffset};
use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::validation::{parse_datetime, parse_non_negative_integer, validate_not_future_date};

const INVALID_DATE: &str = "Please enter a valid date.";

/// Read an optional date field that must not lie in the future. Missing or
/// empty input yields `None`.
pub(crate) fn past_date_field(
    value: Option<&str>,
    future_message: &str,
) -> ApiResult<Option<DateTime<FixedOffset>>> {
    let Some(raw) = value.filter(|s| !s.trim().is_empty()) else {
        return Ok(None);
    };
    let invalid = || ApiError::Validation(INVALID_DATE.to_string());
    match validate_not_future_date(raw) {
        Ok(true) => parse_datetime(raw).map(Some).map_err(|_| invalid()),
        Ok(false) => Err(ApiError::Validation(future_message.to_string())),
        Err(_) => Err(invalid()),
    }
}

/// Read an optional non-negative integer field. Missing, `null`, or empty
/// string input yields `None`.
pub(crate) fn count_field(value: Option<&Value>, invalid_message: &str) -> ApiResult<Option<i32>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(v) => parse_non_negative_integer(v)
            .and_then(|n| i32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| ApiError::Validation(invalid_message.to_string())),
    }
}
