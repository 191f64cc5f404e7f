//! Integration tests for the catalog and session control endpoints.
//!
//! Stage timings are a millisecond each (see `common::test_config`), so full
//! runs complete on the real clock within a few hundred milliseconds.

mod common;

use std::time::Duration;

use axum::http::{Method, StatusCode};
use common::{body_json, get, post, send_json};
use serde_json::json;
use swarm_events::{NodeEvent, NodeEventKind, StageKind};
use tokio::sync::broadcast;

/// Receive until an event satisfies `pred`, failing after ten seconds.
async fn wait_for<F>(rx: &mut broadcast::Receiver<NodeEvent>, mut pred: F) -> NodeEvent
where
    F: FnMut(&NodeEvent) -> bool,
{
    tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            match rx.recv().await {
                Ok(event) if pred(&event) => return event,
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => panic!("event bus closed"),
            }
        }
    })
    .await
    .expect("expected event was not published")
}

// ---------------------------------------------------------------------------
// Test: catalogs
// ---------------------------------------------------------------------------

#[tokio::test]
async fn devices_endpoint_lists_catalog_in_order() {
    let (app, _state) = common::build_test_app();
    let response = get(app, "/api/v1/devices").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let devices = json["data"].as_array().unwrap();
    assert_eq!(devices.len(), 5);
    assert_eq!(devices[0]["id"], "m2-macbook");
    assert_eq!(devices[0]["speed"], 0.3);
    assert_eq!(devices[4]["name"], "H100");
    assert_eq!(devices[4]["power_draw_watts"], 700);
}

#[tokio::test]
async fn jobs_endpoint_lists_catalog_with_fixed_point_rewards() {
    let (app, _state) = common::build_test_app();
    let json = body_json(get(app, "/api/v1/jobs/catalog").await).await;

    let jobs = json["data"].as_array().unwrap();
    assert_eq!(jobs.len(), 5);
    assert_eq!(jobs[0]["id"], "llama-7b-finetune");
    assert_eq!(jobs[0]["base_reward"], "2.500000");
}

// ---------------------------------------------------------------------------
// Test: session snapshot and device selection
// ---------------------------------------------------------------------------

#[tokio::test]
async fn initial_session_is_idle_on_default_device() {
    let (app, _state) = common::build_test_app();
    let json = body_json(get(app, "/api/v1/session").await).await;

    let data = &json["data"];
    assert_eq!(data["running"], false);
    assert_eq!(data["paused"], false);
    assert_eq!(data["device"]["id"], "rtx-4090");
    assert_eq!(data["job_index"], 0);
    assert_eq!(data["reward"], "0.000000");
    assert_eq!(data["queue_len"], 5);
    assert!(data["log"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn select_device_updates_session() {
    let (app, _state) = common::build_test_app();

    let response = send_json(
        app.clone(),
        Method::PUT,
        "/api/v1/session/device",
        json!({ "device_id": "h100" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["name"], "H100");

    let json = body_json(get(app, "/api/v1/session").await).await;
    assert_eq!(json["data"]["device"]["id"], "h100");
}

#[tokio::test]
async fn select_unknown_device_returns_404() {
    let (app, _state) = common::build_test_app();
    let response = send_json(
        app,
        Method::PUT,
        "/api/v1/session/device",
        json!({ "device_id": "abacus" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert!(json["error"].as_str().unwrap().contains("abacus"));
}

#[tokio::test]
async fn select_blank_device_returns_400() {
    let (app, _state) = common::build_test_app();
    let response = send_json(
        app,
        Method::PUT,
        "/api/v1/session/device",
        json!({ "device_id": "  " }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn select_device_while_running_returns_409() {
    let (app, state) = common::build_test_app();
    assert_eq!(post(app.clone(), "/api/v1/session/start").await.status(), StatusCode::OK);

    let response = send_json(
        app,
        Method::PUT,
        "/api/v1/session/device",
        json!({ "device_id": "h100" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "SESSION_RUNNING");
    assert_eq!(state.node.snapshot().await.device.id, "rtx-4090");

    state.node.shutdown().await;
}

// ---------------------------------------------------------------------------
// Test: start, pause, continue
// ---------------------------------------------------------------------------

#[tokio::test]
async fn start_returns_run_id_and_running_snapshot() {
    let (app, state) = common::build_test_app();

    let json = body_json(post(app.clone(), "/api/v1/session/start").await).await;
    assert_eq!(json["data"]["run_id"], 1);
    assert_eq!(json["data"]["session"]["running"], true);
    assert_eq!(json["data"]["session"]["job_index"], 0);

    let json = body_json(post(app, "/api/v1/session/start").await).await;
    assert_eq!(json["data"]["run_id"], 2);

    state.node.shutdown().await;
}

#[tokio::test]
async fn pause_before_start_returns_409() {
    let (app, _state) = common::build_test_app();
    let response = post(app, "/api/v1/session/pause").await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "NOT_RUNNING");
}

#[tokio::test]
async fn pause_toggles_while_running() {
    let (app, state) = common::build_test_app();
    post(app.clone(), "/api/v1/session/start").await;

    let json = body_json(post(app.clone(), "/api/v1/session/pause").await).await;
    assert_eq!(json["data"]["paused"], true);
    let json = body_json(post(app, "/api/v1/session/pause").await).await;
    assert_eq!(json["data"]["paused"], false);

    let log = state.node.snapshot().await.log;
    assert!(log.iter().any(|entry| entry.message == "Node paused"));
    assert!(log.iter().any(|entry| entry.message == "Node resumed"));

    state.node.shutdown().await;
}

#[tokio::test]
async fn continue_without_refill_returns_409() {
    let (app, _state) = common::build_test_app();
    let response = post(app, "/api/v1/session/continue").await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "NOT_AWAITING_CONTINUE");
}

#[tokio::test]
async fn run_settles_exact_reward_for_selected_device() {
    let (app, state) = common::build_test_app();
    let mut rx = state.node.subscribe();

    send_json(
        app.clone(),
        Method::PUT,
        "/api/v1/session/device",
        json!({ "device_id": "m2-macbook" }),
    )
    .await;
    post(app.clone(), "/api/v1/session/start").await;

    // First queued job is the Llama fine-tune: 2.5 x 0.3.
    let event = wait_for(&mut rx, |e| matches!(e.kind, NodeEventKind::RewardSettled { .. })).await;
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["type"], "reward_settled");
    assert_eq!(json["reward"], "0.750000");
    assert_eq!(json["job_index"], 0);

    state.node.shutdown().await;
    let json = body_json(get(app, "/api/v1/session").await).await;
    assert_eq!(json["data"]["reward"], "0.750000");
    assert_eq!(json["data"]["job_index"], 1);
}

#[tokio::test]
async fn drained_queue_waits_for_continue_then_resumes() {
    let (app, state) = common::build_test_app();
    let mut rx = state.node.subscribe();
    post(app.clone(), "/api/v1/session/start").await;

    wait_for(&mut rx, |e| {
        matches!(
            e.kind,
            NodeEventKind::StageChanged {
                stage: StageKind::AwaitingContinue,
                ..
            }
        )
    })
    .await;

    let response = post(app, "/api/v1/session/continue").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["job_index"], 5);
    assert!(json["data"]["queue_len"].as_u64().unwrap() > 5);

    let event = wait_for(&mut rx, |e| {
        matches!(
            e.kind,
            NodeEventKind::StageChanged {
                stage: StageKind::Bidding,
                ..
            }
        )
    })
    .await;
    assert!(matches!(event.kind, NodeEventKind::StageChanged { job_index: 5, .. }));

    state.node.shutdown().await;
}

// ---------------------------------------------------------------------------
// Test: share and test sound
// ---------------------------------------------------------------------------

#[tokio::test]
async fn share_uses_clipboard_when_native_unavailable() {
    let (app, state) = common::build_test_app();
    let response = send_json(
        app,
        Method::POST,
        "/api/v1/session/share",
        json!({ "native_available": false }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["method"], "clipboard");
    assert_eq!(
        json["data"]["text"],
        "I've earned 0.00 SWARM running a node on the compute swarm! Join me: https://swarm.test/join"
    );

    let log = state.node.snapshot().await.log;
    assert_eq!(log.last().unwrap().message, "Share text copied to clipboard");
}

#[tokio::test]
async fn share_without_body_uses_clipboard() {
    let (app, state) = common::build_test_app();
    let response = post(app, "/api/v1/session/share").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["method"], "clipboard");
    assert!(json["data"]["text"]
        .as_str()
        .unwrap()
        .ends_with("https://swarm.test/join"));
    assert_eq!(
        state.node.snapshot().await.log.last().unwrap().message,
        "Share text copied to clipboard"
    );
}

#[tokio::test]
async fn share_with_empty_object_defaults_native_to_false() {
    let (app, state) = common::build_test_app();
    let response = send_json(app.clone(), Method::POST, "/api/v1/session/share", json!({})).await;
    assert_eq!(body_json(response).await["data"]["method"], "clipboard");

    let response = send_json(
        app,
        Method::POST,
        "/api/v1/session/share",
        json!({ "native_available": true }),
    )
    .await;
    assert_eq!(body_json(response).await["data"]["method"], "native");
    assert_eq!(state.node.snapshot().await.log.len(), 1);
}

#[tokio::test]
async fn test_sound_publishes_test_cue() {
    let (app, state) = common::build_test_app();
    let mut rx = state.node.subscribe();

    let json = body_json(post(app, "/api/v1/session/test-sound").await).await;
    assert_eq!(json["data"]["cue"], "test");
    assert_eq!(json["data"]["tone"]["waveform"], "sine");

    let event = serde_json::to_value(rx.recv().await.unwrap()).unwrap();
    assert_eq!(event["type"], "sound");
    assert_eq!(event["cue"], "test");
}
