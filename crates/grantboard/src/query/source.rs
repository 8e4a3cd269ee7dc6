use std::fmt;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::debug;

use crate::config::ApiConfig;

/// Path and query string of one read against the catalog API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRequest {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl SourceRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    pub fn with_param(mut self, name: &str, value: impl ToString) -> Self {
        self.query.push((name.to_string(), value.to_string()));
        self
    }
}

/// Network-level failure. Cloneable so one failed request can be reported to
/// every observer that shared it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Network(String),
    #[error("server responded with {status} {reason}")]
    Status { status: u16, reason: String },
    #[error("response body is not valid JSON: {0}")]
    Decode(String),
}

/// Read-only access to the remote catalog.
#[async_trait]
pub trait RemoteSource: Send + Sync + 'static {
    async fn get(&self, request: &SourceRequest) -> Result<Value, TransportError>;
}

#[derive(Debug, thiserror::Error)]
pub enum QueryClientError {
    #[error("failed to build http client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// [`RemoteSource`] backed by `reqwest`, attaching the bearer token when one
/// is configured.
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpSource {
    pub fn new(config: &ApiConfig) -> Result<Self, QueryClientError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl fmt::Debug for HttpSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpSource")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.token.is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl RemoteSource for HttpSource {
    async fn get(&self, request: &SourceRequest) -> Result<Value, TransportError> {
        let url = self.url_for(&request.path);
        debug!(%url, "dispatching catalog request");

        let mut builder = self
            .client
            .get(&url)
            .header(CONTENT_TYPE, "application/json");
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| TransportError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|err| TransportError::Decode(err.to_string()))
    }
}
