use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::catalog::NormalizationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryStatus {
    Loading,
    Error,
    Empty,
    Success,
}

impl QueryStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Loading => "Loading",
            Self::Error => "Error",
            Self::Empty => "Empty",
            Self::Success => "Success",
        }
    }
}

/// What a renderer sees for one query. The four variants are mutually
/// exclusive and cover every outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum QueryResult<T> {
    Loading,
    Error { message: String },
    Empty,
    Success { data: Vec<T> },
}

impl<T> QueryResult<T> {
    pub fn status(&self) -> QueryStatus {
        match self {
            Self::Loading => QueryStatus::Loading,
            Self::Error { .. } => QueryStatus::Error,
            Self::Empty => QueryStatus::Empty,
            Self::Success { .. } => QueryStatus::Success,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Loading)
    }

    /// Items of a successful query; empty for every other state.
    pub fn data(&self) -> &[T] {
        match self {
            Self::Success { data } => data.as_slice(),
            _ => &[],
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error { message } => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> QueryResult<U> {
        match self {
            Self::Loading => QueryResult::Loading,
            Self::Error { message } => QueryResult::Error { message },
            Self::Empty => QueryResult::Empty,
            Self::Success { data } => QueryResult::Success {
                data: data.into_iter().map(f).collect(),
            },
        }
    }

    pub(crate) fn failed(context: &str, reason: impl std::fmt::Display) -> Self {
        Self::Error {
            message: format!("{context}: {reason}"),
        }
    }

    /// Settles a fetched payload.
    ///
    /// No records is `Empty`. Records that fail normalization are skipped; if
    /// none survive the whole result is an `Error`.
    pub(crate) fn from_records<F>(records: Vec<&Value>, context: &str, normalize: F) -> Self
    where
        F: Fn(&Value) -> Result<T, NormalizationError>,
    {
        if records.is_empty() {
            return Self::Empty;
        }

        let total = records.len();
        let mut data = Vec::with_capacity(total);
        for (position, raw) in records.into_iter().enumerate() {
            match normalize(raw) {
                Ok(item) => data.push(item),
                Err(err) => warn!(position, error = %err, "skipping malformed record"),
            }
        }

        if data.is_empty() {
            return Self::failed(context, format_args!("all {total} records were malformed"));
        }

        Self::Success { data }
    }
}
