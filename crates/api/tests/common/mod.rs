#![allow(dead_code)]

use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use swarm_api::config::ServerConfig;
use swarm_api::router::build_app_router;
use swarm_api::state::AppState;
use swarm_pipeline::{PipelineConfig, RefillPolicy};

/// Build a test `ServerConfig` with millisecond stage timings so runs
/// complete quickly on the real clock.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        share_url: "https://swarm.test/join".to_string(),
        pipeline: PipelineConfig {
            bid_delay: Duration::from_millis(1),
            step_base: Duration::from_millis(1),
            proof_delay: Duration::from_millis(1),
            celebration: Duration::from_millis(1),
            refill_delay: Duration::from_millis(1),
            refill_policy: RefillPolicy::Manual,
        },
    }
}

/// Build the full application router plus a handle to its state, so tests
/// can observe the node directly.
pub fn build_test_app() -> (Router, AppState) {
    let state = AppState::new(test_config());
    (build_app_router(state.clone()), state)
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn send_json(app: Router, method: Method, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
