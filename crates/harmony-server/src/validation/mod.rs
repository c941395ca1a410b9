//! Input checks that gate every write.
//!
//! All functions are pure; callers turn a failed check into an
//! [`ApiError::Validation`](crate::error::ApiError) with their own message.

use std::collections::HashSet;
use std::net::IpAddr;
use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use serde_json::Value;

const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_EMAIL_LENGTH: usize = 320;

/// Domains accepted even though they have no TLD.
const DOMAIN_ALLOWLIST: &[&str] = &["localhost"];

static COMMON_PASSWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    include_str!("common_passwords.txt")
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
});

static USER_RE: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"(?i)^(?:[-!#$%&'*+/=?^_`{}|~0-9A-Z]+(?:\.[-!#$%&'*+/=?^_`{}|~0-9A-Z]+)*"#,
        r#"|"(?:[\x01-\x08\x0b\x0c\x0e-\x1f!#-\[\]-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])*")$"#,
    ))
});

static DOMAIN_RE: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+[A-Z0-9-]{2,63}$")
});

static LITERAL_RE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"(?i)^\[(?:IPv6:)?([A-F0-9:.]+)\]$"));

fn matches(re: &LazyLock<Result<Regex, regex::Error>>, value: &str) -> bool {
    match &**re {
        Ok(re) => re.is_match(value),
        Err(e) => {
            tracing::error!("email pattern failed to compile: {e}");
            false
        }
    }
}

/// Syntactic email check: dot-atom or quoted local part, then a hostname with
/// a TLD or a bracketed IP literal. Case-insensitive.
pub fn validate_email(email: &str) -> bool {
    if email.is_empty() || email.len() > MAX_EMAIL_LENGTH {
        return false;
    }
    let Some((user, domain)) = email.rsplit_once('@') else {
        return false;
    };
    if !matches(&USER_RE, user) {
        return false;
    }
    if DOMAIN_ALLOWLIST.contains(&domain.to_ascii_lowercase().as_str()) {
        return true;
    }
    validate_domain_part(domain)
}

fn validate_domain_part(domain: &str) -> bool {
    if matches(&DOMAIN_RE, domain) {
        // The TLD may contain hyphens but not end with one.
        return !domain.ends_with('-');
    }
    match &*LITERAL_RE {
        Ok(re) => re
            .captures(domain)
            .and_then(|c| c.get(1))
            .is_some_and(|ip| ip.as_str().parse::<IpAddr>().is_ok()),
        Err(_) => false,
    }
}

/// Lowercase the domain part and keep the local part as written.
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((user, domain)) => format!("{user}@{}", domain.to_lowercase()),
        None => email.to_string(),
    }
}

/// Length, all-numeric and common-password checks.
pub fn validate_password_strength(password: &str) -> bool {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return false;
    }
    if password.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    !COMMON_PASSWORDS.contains(password.trim().to_lowercase().as_str())
}

/// [`validate_password_strength`] plus a check that the password is not too
/// close to the account's email local part.
pub fn validate_password_for(email: &str, password: &str) -> bool {
    if !validate_password_strength(password) {
        return false;
    }
    let local = email
        .rsplit_once('@')
        .map(|(user, _)| user)
        .unwrap_or(email)
        .to_lowercase();
    if local.chars().count() < 4 {
        return true;
    }
    let password = password.to_lowercase();
    !(password.contains(&local) || local.contains(&password))
}

/// Parses integers given as JSON numbers or numeric strings. Negative and
/// fractional values yield `None`.
pub fn parse_non_negative_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                (i >= 0).then_some(i)
            } else if let Some(u) = n.as_u64() {
                i64::try_from(u).ok()
            } else {
                n.as_f64()
                    .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= i64::MAX as f64)
                    .map(|f| f as i64)
            }
        }
        Value::String(s) => s.trim().parse::<i64>().ok().filter(|i| *i >= 0),
        _ => None,
    }
}

pub fn validate_non_negative_integer(value: &Value) -> bool {
    parse_non_negative_integer(value).is_some()
}

/// The date string could not be read as any accepted format.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid date: {0}")]
pub struct InvalidInput(pub String);

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Read an RFC 3339 timestamp, a naive date-time, or a bare date. Values
/// without an offset are taken as UTC; a bare date means midnight.
pub fn parse_datetime(input: &str) -> Result<DateTime<FixedOffset>, InvalidInput> {
    let s = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt);
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive.and_utc().fixed_offset());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN).and_utc().fixed_offset());
    }
    Err(InvalidInput(input.to_string()))
}

/// `Ok(false)` when the date lies after `now`.
pub fn validate_not_future_date_at(input: &str, now: DateTime<Utc>) -> Result<bool, InvalidInput> {
    let parsed = parse_datetime(input)?.with_timezone(&Utc);
    Ok(parsed <= now)
}

pub fn validate_not_future_date(input: &str) -> Result<bool, InvalidInput> {
    validate_not_future_date_at(input, Utc::now())
}
