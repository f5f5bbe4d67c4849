//! Applies update payloads to stored records.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::error::StorageError;
use crate::model::{METADATA, NOT_GRADED, Payload, ShowCorrectness, XBlockInfo, validate_min_score};

fn invalid(field: &str, value: &Value) -> StorageError {
    StorageError::InvalidField {
        field: field.to_string(),
        value: value.clone(),
    }
}

fn as_str<'v>(field: &str, value: &'v Value) -> Result<&'v str, StorageError> {
    value.as_str().ok_or_else(|| invalid(field, value))
}

fn as_bool(field: &str, value: &Value) -> Result<bool, StorageError> {
    value.as_bool().ok_or_else(|| invalid(field, value))
}

/// `true` sets the flag, `null` clears it.
fn as_flag(field: &str, value: &Value) -> Result<bool, StorageError> {
    match value {
        Value::Null => Ok(false),
        Value::Bool(true) => Ok(true),
        _ => Err(invalid(field, value)),
    }
}

/// Empty strings clear.
fn as_optional_str<'v>(field: &str, value: &'v Value) -> Result<Option<&'v str>, StorageError> {
    let text = as_str(field, value)?.trim();
    Ok((!text.is_empty()).then_some(text))
}

fn as_date(field: &str, value: &Value) -> Result<Option<DateTime<Utc>>, StorageError> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) => DateTime::parse_from_rfc3339(text)
            .map(|d| Some(d.with_timezone(&Utc)))
            .map_err(|_| invalid(field, value)),
        _ => Err(invalid(field, value)),
    }
}

fn as_weight(field: &str, value: &Value) -> Result<Option<f64>, StorageError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n.as_f64().map(Some).ok_or_else(|| invalid(field, value)),
        Value::String(_) => match as_optional_str(field, value)? {
            None => Ok(None),
            Some(text) => text
                .parse::<f64>()
                .ok()
                .filter(|w| w.is_finite() && *w >= 0.0)
                .map(Some)
                .ok_or_else(|| invalid(field, value)),
        },
        _ => Err(invalid(field, value)),
    }
}

fn apply_metadata(
    record: &mut XBlockInfo,
    metadata: &Map<String, Value>,
) -> Result<(), StorageError> {
    for (key, value) in metadata {
        match key.as_str() {
            "start" => record.start = as_date(key, value)?,
            "due" => record.due = as_date(key, value)?,
            "visible_to_staff_only" => record.has_explicit_staff_lock = as_flag(key, value)?,
            "hide_after_due" => record.hide_after_due = as_flag(key, value)?,
            "show_correctness" => {
                let show = ShowCorrectness::from_str_value(as_str(key, value)?)
                    .ok_or_else(|| invalid(key, value))?;
                record.show_correctness = Some(show);
            }
            "is_time_limited" => record.is_time_limited = as_bool(key, value)?,
            "is_practice_exam" => record.is_practice_exam = as_bool(key, value)?,
            "is_proctored_enabled" => record.is_proctored_exam = as_bool(key, value)?,
            "exam_review_rules" => record.exam_review_rules = as_str(key, value)?.to_string(),
            "default_time_limit_minutes" => {
                let minutes = value
                    .as_u64()
                    .and_then(|m| u32::try_from(m).ok())
                    .ok_or_else(|| invalid(key, value))?;
                record.default_time_limit_minutes = Some(minutes);
            }
            "weight" => record.weight = as_weight(key, value)?,
            other => tracing::debug!(key = other, "ignoring unknown metadata key"),
        }
    }
    Ok(())
}

/// Applies every key of `payload` to `record`.
///
/// Stops at the first malformed value; callers apply to a copy if they need
/// all-or-nothing behaviour.
pub fn apply_payload(record: &mut XBlockInfo, payload: &Payload) -> Result<(), StorageError> {
    for (key, value) in payload.as_map() {
        match key.as_str() {
            METADATA => {
                let metadata = value.as_object().ok_or_else(|| invalid(key, value))?;
                apply_metadata(record, metadata)?;
            }
            "graderType" => {
                record.format = match as_str(key, value)? {
                    NOT_GRADED => None,
                    format => Some(format.to_string()),
                };
            }
            "isPrereq" => record.is_prereq = Some(as_bool(key, value)?),
            "prereqUsageKey" => record.prereq = as_optional_str(key, value)?.map(str::to_string),
            "prereqMinScore" => {
                record.prereq_min_score =
                    validate_min_score(as_str(key, value)?).map_err(|_| invalid(key, value))?;
            }
            "publish" => match as_str(key, value)? {
                "make_public" | "republish" => record.published = true,
                _ => return Err(invalid(key, value)),
            },
            other => tracing::debug!(key = other, "ignoring unknown payload key"),
        }
    }
    Ok(())
}
