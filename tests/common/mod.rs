//! Shared test utilities for integration tests.
//!
//! `TestClient` drives the router directly with `oneshot` requests. Report
//! endpoints that talk to the upstream API are pointed at a small axum stub
//! started on a random local port by `spawn_upstream`.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use spendview::config::Config;
use spendview::handlers;
use spendview::server;
use spendview::state::AppState;
use tower::ServiceExt;

/// Nothing listens on port 1, so requests there fail to connect.
pub const UNREACHABLE_UPSTREAM: &str = "http://127.0.0.1:1/api/v1";

pub struct TestClient {
    state: AppState,
}

impl TestClient {
    /// Client whose upstream report API is unreachable.
    pub fn new() -> Self {
        Self::with_upstream(UNREACHABLE_UPSTREAM)
    }

    pub fn with_upstream(reports_url: &str) -> Self {
        Self::with_config(Config {
            host: "127.0.0.1".into(),
            reports_url: reports_url.into(),
            request_timeout_secs: 5,
            ..Config::default()
        })
    }

    pub fn with_config(config: Config) -> Self {
        let state = AppState::new(config).expect("Failed to create app state");
        Self { state }
    }

    pub fn router(&self) -> Router {
        handlers::routes().with_state(self.state.clone())
    }

    /// Make a GET request and return status and body.
    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        let response = self
            .router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8_lossy(&body).to_string())
    }

    /// Make a POST request with a JSON body and return status and body.
    pub async fn post_json(&self, uri: &str, payload: &Value) -> (StatusCode, String) {
        let response = self
            .router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("Content-Type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8_lossy(&body).to_string())
    }

    /// Get JSON from an endpoint and parse it.
    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let (status, body) = self.get(uri).await;
        (status, serde_json::from_str(&body).unwrap_or(Value::Null))
    }

    /// POST JSON to an endpoint and parse the response.
    pub async fn post_json_parsed(&self, uri: &str, payload: &Value) -> (StatusCode, Value) {
        let (status, body) = self.post_json(uri, payload).await;
        (status, serde_json::from_str(&body).unwrap_or(Value::Null))
    }
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Start a stand-in for the upstream report API serving fixed reports.
/// Returns its base URL.
pub async fn spawn_upstream(by_category: Value, by_subcategory: Value) -> String {
    let app = Router::new()
        .route(
            "/api/v1/reports/monthly_by_category",
            get(move || {
                let body = by_category.clone();
                async move { Json(body) }
            }),
        )
        .route(
            "/api/v1/reports/monthly_by_subcategory",
            get(move || {
                let body = by_subcategory.clone();
                async move { Json(body) }
            }),
        );
    serve(app).await
}

/// Start an upstream stand-in that fails every request with a 500.
pub async fn spawn_failing_upstream() -> String {
    let app = Router::new().fallback(|| async { StatusCode::INTERNAL_SERVER_ERROR });
    serve(app).await
}

async fn serve(app: Router) -> String {
    let (port, _) = server::serve(app, "127.0.0.1", 0)
        .await
        .expect("Failed to start upstream stub");
    format!("http://127.0.0.1:{}/api/v1", port)
}
