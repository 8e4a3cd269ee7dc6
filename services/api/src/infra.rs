use grantboard::config::{ApiConfig, AppConfig};
use grantboard::error::AppError;
use grantboard::query::{HttpSource, QueryClient};
use grantboard::telemetry;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Loads configuration, applies the CLI token override, and installs tracing.
pub(crate) fn bootstrap(token: Option<String>) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::load()?;
    config.api = config.api.with_token(token);
    telemetry::init(&config.telemetry)?;
    Ok(config)
}

pub(crate) fn query_client(api: &ApiConfig) -> Result<QueryClient<HttpSource>, AppError> {
    let source = HttpSource::new(api)?;
    Ok(QueryClient::new(Arc::new(source), api.stale_time))
}
