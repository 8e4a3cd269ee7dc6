use std::fmt;

use serde_json::Value;

use super::source::SourceRequest;
use crate::catalog::{normalize_grant, normalize_plan, Grant, NormalizationError, Plan};

/// Stable identity of a query; requests with equal keys share one fetch and
/// one cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(String);

impl QueryKey {
    pub fn new(resource: &str) -> Self {
        Self(resource.to_string())
    }

    pub fn with_param(mut self, name: &str, value: impl fmt::Display) -> Self {
        self.0.push_str(&format!("|{name}={value}"));
        self
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A remote collection the client knows how to request and normalize.
pub trait Resource: Send + Sync + 'static {
    type Item: Clone + Send + Sync + 'static;

    /// Prefix for user-facing error messages.
    const FAILURE_CONTEXT: &'static str;

    fn key(&self) -> QueryKey;

    fn request(&self) -> SourceRequest;

    fn normalize(raw: &Value) -> Result<Self::Item, NormalizationError>;

    /// Raw records inside a response payload, in arrival order.
    fn records(payload: &Value) -> Vec<&Value> {
        collection_items(payload)
    }
}

/// Grant listing, optionally paginated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GrantsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl Resource for GrantsQuery {
    type Item = Grant;

    const FAILURE_CONTEXT: &'static str = "Failed to load grants";

    fn key(&self) -> QueryKey {
        let mut key = QueryKey::new("grants");
        if let Some(page) = self.page {
            key = key.with_param("page", page);
        }
        if let Some(limit) = self.limit {
            key = key.with_param("limit", limit);
        }
        key
    }

    fn request(&self) -> SourceRequest {
        let mut request = SourceRequest::new("grant");
        if let Some(page) = self.page {
            request = request.with_param("page", page);
        }
        if let Some(limit) = self.limit {
            request = request.with_param("limit", limit);
        }
        request
    }

    fn normalize(raw: &Value) -> Result<Grant, NormalizationError> {
        normalize_grant(raw)
    }
}

/// A single grant looked up by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantDetailQuery {
    pub id: String,
}

impl GrantDetailQuery {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl Resource for GrantDetailQuery {
    type Item = Grant;

    const FAILURE_CONTEXT: &'static str = "Failed to load grant";

    fn key(&self) -> QueryKey {
        QueryKey::new("grant").with_param("id", &self.id)
    }

    fn request(&self) -> SourceRequest {
        SourceRequest::new(format!("grant/{}", self.id))
    }

    fn normalize(raw: &Value) -> Result<Grant, NormalizationError> {
        normalize_grant(raw)
    }

    fn records(payload: &Value) -> Vec<&Value> {
        single_record(payload)
    }
}

/// Every plan shown on the pricing page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlansQuery;

impl Resource for PlansQuery {
    type Item = Plan;

    const FAILURE_CONTEXT: &'static str = "Failed to load pricing plans";

    fn key(&self) -> QueryKey {
        QueryKey::new("plans")
    }

    fn request(&self) -> SourceRequest {
        SourceRequest::new("plan")
    }

    fn normalize(raw: &Value) -> Result<Plan, NormalizationError> {
        normalize_plan(raw)
    }
}

/// Accepts `{data: {items}}`, `{data: [..]}`, `{items}` or a bare array.
/// Anything else counts as a collection with no records.
pub(crate) fn collection_items(payload: &Value) -> Vec<&Value> {
    let items = match payload {
        Value::Array(items) => Some(items),
        Value::Object(envelope) => match envelope.get("data") {
            Some(Value::Array(items)) => Some(items),
            Some(Value::Object(data)) => data.get("items").and_then(Value::as_array),
            _ => envelope.get("items").and_then(Value::as_array),
        },
        _ => None,
    };

    items.map(|items| items.iter().collect()).unwrap_or_default()
}

/// Accepts `{data: {record}}` or the record itself; `null` data means not found.
pub(crate) fn single_record(payload: &Value) -> Vec<&Value> {
    match payload.get("data") {
        Some(Value::Object(record)) if record.contains_key("items") => {
            collection_items(payload).into_iter().take(1).collect()
        }
        Some(record @ Value::Object(_)) => vec![record],
        Some(_) => Vec::new(),
        None if payload.is_object() => vec![payload],
        None => Vec::new(),
    }
}
