use crate::infra::AppState;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use grantboard::catalog::{
    arrange_plans, format_grant_for_display, Arrangement, Grant, GrantDisplay, Plan, PlanCard,
};
use grantboard::query::{
    GrantDetailQuery, GrantsQuery, PlansQuery, QueryClient, QueryResult, RemoteSource,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct GrantsParams {
    pub(crate) page: Option<u32>,
    pub(crate) limit: Option<u32>,
}

/// Pricing page payload; every query state has its own shape.
#[derive(Debug, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub(crate) enum PricingView {
    Loading,
    Error {
        message: String,
    },
    Empty,
    Success {
        arrangement: Arrangement,
        desktop: Vec<PlanCard>,
        stacked: Vec<PlanCard>,
    },
}

impl From<QueryResult<Plan>> for PricingView {
    fn from(result: QueryResult<Plan>) -> Self {
        match result {
            QueryResult::Loading => Self::Loading,
            QueryResult::Error { message } => Self::Error { message },
            QueryResult::Empty => Self::Empty,
            QueryResult::Success { data } => {
                let arrangement = arrange_plans(&data);
                Self::Success {
                    desktop: arrangement.cards(),
                    stacked: arrangement.stacked(),
                    arrangement,
                }
            }
        }
    }
}

pub(crate) fn with_catalog_routes<S: RemoteSource>(client: QueryClient<S>) -> Router {
    Router::new()
        .route("/api/v1/grants", get(grants_endpoint::<S>))
        .route("/api/v1/grants/:grant_id", get(grant_detail_endpoint::<S>))
        .route("/api/v1/pricing", get(pricing_endpoint::<S>))
        .with_state(client)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn grants_endpoint<S: RemoteSource>(
    State(client): State<QueryClient<S>>,
    Query(params): Query<GrantsParams>,
) -> Json<QueryResult<GrantDisplay>> {
    let query = GrantsQuery {
        page: params.page,
        limit: params.limit,
    };
    let result = client.fetch(&query).await;
    Json(result.map(|grant| format_grant_for_display(&grant)))
}

pub(crate) async fn grant_detail_endpoint<S: RemoteSource>(
    State(client): State<QueryClient<S>>,
    Path(grant_id): Path<String>,
) -> Json<QueryResult<Grant>> {
    Json(client.fetch(&GrantDetailQuery::new(grant_id)).await)
}

pub(crate) async fn pricing_endpoint<S: RemoteSource>(
    State(client): State<QueryClient<S>>,
) -> Json<PricingView> {
    Json(PricingView::from(client.fetch(&PlansQuery).await))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use grantboard::query::{SourceRequest, TransportError};
    use serde_json::Value;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    #[derive(Default)]
    struct StubSource {
        responses: HashMap<String, Value>,
    }

    impl StubSource {
        fn with(mut self, path: &str, payload: Value) -> Self {
            self.responses.insert(path.to_string(), payload);
            self
        }
    }

    #[async_trait]
    impl RemoteSource for StubSource {
        async fn get(&self, request: &SourceRequest) -> Result<Value, TransportError> {
            self.responses
                .get(&request.path)
                .cloned()
                .ok_or_else(|| TransportError::Status {
                    status: 502,
                    reason: "Bad Gateway".to_string(),
                })
        }
    }

    fn app(source: StubSource) -> Router {
        with_catalog_routes(QueryClient::new(Arc::new(source), Duration::from_secs(30)))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).expect("request builds"))
            .await
            .expect("router responds");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        let body = serde_json::from_slice(&bytes).expect("json body");
        (status, body)
    }

    #[tokio::test]
    async fn grants_endpoint_returns_display_rows() {
        let source = StubSource::default().with(
            "grant",
            json!({ "data": { "items": [
                { "_id": "g-1", "title": "Seed", "deadline": "2025-03-10T00:00:00Z", "funding": "$1,000", "type": "Rolling" }
            ], "total": 1 } }),
        );

        let (status, body) = get_json(app(source), "/api/v1/grants?page=1&limit=10").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], "success");
        assert_eq!(body["data"][0]["deadline_badge"], "10-03-2025");
        assert_eq!(body["data"][0]["details_path"], "/find-grants/g-1");
    }

    #[tokio::test]
    async fn grants_endpoint_reports_empty_state() {
        let source = StubSource::default().with("grant", json!({ "data": { "items": [] } }));

        let (status, body) = get_json(app(source), "/api/v1/grants").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "state": "empty" }));
    }

    #[tokio::test]
    async fn pricing_endpoint_arranges_plans() {
        let source = StubSource::default().with(
            "plan",
            json!({ "data": { "items": [
                { "_id": "1", "name": "Pro", "price": 29 },
                { "_id": "2", "name": "Premium", "price": 49 },
                { "_id": "3", "name": "Basic", "price": 9 }
            ] } }),
        );

        let (_, body) = get_json(app(source), "/api/v1/pricing").await;

        assert_eq!(body["state"], "success");
        assert_eq!(body["arrangement"]["center"]["name"], "Premium");
        assert_eq!(body["arrangement"]["right"]["name"], "Pro");
        assert_eq!(body["desktop"][1]["slot"], "center");
        assert_eq!(body["desktop"][1]["is_popular"], true);
        assert_eq!(body["stacked"][0]["plan"]["name"], "Premium");
    }

    #[tokio::test]
    async fn pricing_endpoint_surfaces_transport_errors() {
        let (status, body) = get_json(app(StubSource::default()), "/api/v1/pricing").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], "error");
        assert_eq!(
            body["message"],
            "Failed to load pricing plans: server responded with 502 Bad Gateway"
        );
    }

    #[tokio::test]
    async fn grant_detail_endpoint_returns_full_record() {
        let source = StubSource::default().with(
            "grant/g-7",
            json!({ "status": true, "data": {
                "_id": "g-7",
                "title": "Solar Retrofit",
                "fileUrls": ["https://files.example/a.pdf"]
            } }),
        );

        let (_, body) = get_json(app(source), "/api/v1/grants/g-7").await;

        assert_eq!(body["state"], "success");
        assert_eq!(body["data"][0]["id"], "g-7");
        assert_eq!(body["data"][0]["file_urls"][0], "https://files.example/a.pdf");
    }

    #[tokio::test]
    async fn readiness_follows_the_flag() {
        use metrics_exporter_prometheus::PrometheusBuilder;
        use std::sync::atomic::{AtomicBool, Ordering};

        let state = AppState {
            readiness: Arc::new(AtomicBool::new(false)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };

        let response = readiness_endpoint(Extension(state.clone()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        state.readiness.store(true, Ordering::Release);
        let response = readiness_endpoint(Extension(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let (status, body) = get_json(app(StubSource::default()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));
    }
}
