use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};

/// A single record that cannot become a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizationError {
    #[error("record is not a JSON object")]
    NotAnObject,
    #[error("record has no `_id`")]
    MissingId,
}

pub(crate) type Record = Map<String, Value>;

/// Returns the record object together with its identity.
pub(crate) fn identified(raw: &Value) -> Result<(&Record, String), NormalizationError> {
    let record = raw.as_object().ok_or(NormalizationError::NotAnObject)?;
    let id = record
        .get("_id")
        .or_else(|| record.get("id"))
        .and_then(scalar_text)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(NormalizationError::MissingId)?;
    Ok((record, id))
}

pub(crate) fn text(record: &Record, field: &str) -> String {
    record.get(field).and_then(scalar_text).unwrap_or_default()
}

pub(crate) fn optional_text(record: &Record, field: &str) -> Option<String> {
    record
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Non-empty string entries of an array field; anything else yields nothing.
pub(crate) fn text_list(record: &Record, field: &str) -> Vec<String> {
    match record.get(field) {
        Some(Value::Array(values)) => values
            .iter()
            .filter_map(Value::as_str)
            .filter(|value| !value.trim().is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

pub(crate) fn date(record: &Record, field: &str) -> Option<NaiveDate> {
    record
        .get(field)
        .and_then(Value::as_str)
        .and_then(parse_datetime)
        .map(|dt| dt.date())
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

pub(crate) fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    None
}
