use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use regex::Regex;
use thiserror::Error;

/// Time limit applied when the entered one is missing or invalid.
pub const DEFAULT_TIME_LIMIT: &str = "00:30";

/// Highest accepted prerequisite minimum score.
pub const MAX_MIN_SCORE: u32 = 100;

/// Validation errors for settings form input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid time limit: {0}")]
    InvalidTimeLimit(String),
    #[error("the minimum score must be an integer between 0 and 100: {0}")]
    InvalidMinScore(String),
    #[error("invalid date: {0}")]
    InvalidDate(String),
    #[error("invalid time: {0}")]
    InvalidTime(String),
}

static TIME_LIMIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{1,2}):([0-5][0-9])$").expect("valid hardcoded regex")
});

/// Validates an exam time limit in `H:MM` or `HH:MM` form. `00:00` is rejected.
pub fn validate_time_limit(time_limit: &str) -> Result<(), ValidationError> {
    if TIME_LIMIT_RE.is_match(time_limit) && time_limit != "00:00" {
        Ok(())
    } else {
        Err(ValidationError::InvalidTimeLimit(time_limit.to_string()))
    }
}

/// Converts an `H:MM`/`HH:MM` time limit to minutes (`hours * 60 + minutes`).
///
/// Unlike [`validate_time_limit`] this accepts `00:00`, which is what the
/// form holds when no special exam is selected.
pub fn time_limit_to_minutes(time_limit: &str) -> Result<u32, ValidationError> {
    let invalid = || ValidationError::InvalidTimeLimit(time_limit.to_string());
    let caps = TIME_LIMIT_RE.captures(time_limit).ok_or_else(invalid)?;
    let hours: u32 = caps[1].parse().map_err(|_| invalid())?;
    let minutes: u32 = caps[2].parse().map_err(|_| invalid())?;
    Ok(hours * 60 + minutes)
}

/// Formats minutes as a zero-padded `HH:MM` time limit.
pub fn minutes_to_time_limit(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Validates a prerequisite minimum score.
///
/// The trimmed input must be empty (no minimum) or the canonical decimal form
/// of an integer in `0..=100`; `"007"`, `"+5"` and `"12.5"` are rejected.
pub fn validate_min_score(min_score: &str) -> Result<Option<u32>, ValidationError> {
    let trimmed = min_score.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<u32>() {
        Ok(score) if score <= MAX_MIN_SCORE && score.to_string() == trimmed => Ok(Some(score)),
        _ => Err(ValidationError::InvalidMinScore(trimmed.to_string())),
    }
}

/// Date input format, e.g. `3/7/2026`.
const DATE_FORMAT: &str = "%m/%d/%Y";
/// Time input format, 24h, e.g. `09:30`.
const TIME_FORMAT: &str = "%H:%M";

/// Combines date and time inputs into a UTC timestamp.
///
/// An empty date means no date (`Ok(None)`); an empty time with a date means
/// midnight.
pub fn parse_date_time(date: &str, time: &str) -> Result<Option<DateTime<Utc>>, ValidationError> {
    let date = date.trim();
    let time = time.trim();
    if date.is_empty() {
        return Ok(None);
    }
    let day = NaiveDate::parse_from_str(date, DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(date.to_string()))?;
    let at = if time.is_empty() {
        NaiveTime::default()
    } else {
        NaiveTime::parse_from_str(time, TIME_FORMAT)
            .map_err(|_| ValidationError::InvalidTime(time.to_string()))?
    };
    Ok(Some(day.and_time(at).and_utc()))
}

/// Splits a timestamp into `(date, time)` input strings.
pub fn format_date_time(value: &DateTime<Utc>) -> (String, String) {
    (
        value.format("%-m/%-d/%Y").to_string(),
        value.format(TIME_FORMAT).to_string(),
    )
}
