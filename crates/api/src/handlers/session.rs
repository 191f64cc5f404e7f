//! Handlers for the node session controls.
//!
//! Each control maps to one [`NodeController`](swarm_pipeline::NodeController)
//! call. Everything the page renders afterwards arrives over the WebSocket;
//! these responses only confirm the control took effect.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use swarm_core::catalog::DeviceProfile;
use swarm_core::session::SessionSnapshot;
use swarm_core::sound::{SoundCue, Tone};
use swarm_events::RunId;
use swarm_pipeline::ShareOutcome;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SelectDeviceRequest {
    pub device_id: String,
}

#[derive(Debug, Serialize)]
pub struct StartResponse {
    pub run_id: RunId,
    pub session: SessionSnapshot,
}

#[derive(Debug, Serialize)]
pub struct PauseResponse {
    pub paused: bool,
}

/// Request body for the share endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ShareRequest {
    /// Whether the client can open a native share sheet.
    #[serde(default)]
    pub native_available: bool,
}

#[derive(Debug, Serialize)]
pub struct TestSoundResponse {
    pub cue: SoundCue,
    pub tone: Tone,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /session
pub async fn get_session(State(state): State<AppState>) -> Json<DataResponse<SessionSnapshot>> {
    Json(DataResponse {
        data: state.node.snapshot().await,
    })
}

/// PUT /session/device
///
/// Rejected with 409 while a run is active.
pub async fn select_device(
    State(state): State<AppState>,
    Json(body): Json<SelectDeviceRequest>,
) -> AppResult<Json<DataResponse<DeviceProfile>>> {
    let device_id = body.device_id.trim();
    if device_id.is_empty() {
        return Err(AppError::BadRequest("device_id must not be empty".into()));
    }
    let device = state.node.select_device(device_id).await?;
    Ok(Json(DataResponse { data: device }))
}

/// POST /session/start
///
/// Resets the session and starts a new run, replacing any active one.
pub async fn start(State(state): State<AppState>) -> Json<DataResponse<StartResponse>> {
    let run_id = state.node.start().await;
    let session = state.node.snapshot().await;
    Json(DataResponse {
        data: StartResponse { run_id, session },
    })
}

/// POST /session/pause
pub async fn toggle_pause(State(state): State<AppState>) -> AppResult<Json<DataResponse<PauseResponse>>> {
    let paused = state.node.toggle_pause().await?;
    Ok(Json(DataResponse {
        data: PauseResponse { paused },
    }))
}

/// POST /session/continue
///
/// Only valid while the node waits after a manual refill.
pub async fn continue_queue(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<SessionSnapshot>>> {
    state.node.continue_queue().await?;
    Ok(Json(DataResponse {
        data: state.node.snapshot().await,
    }))
}

/// POST /session/share
///
/// The body is optional; without one the clipboard fallback is used.
pub async fn share(
    State(state): State<AppState>,
    body: Option<Json<ShareRequest>>,
) -> Json<DataResponse<ShareOutcome>> {
    let Json(body) = body.unwrap_or_default();
    let outcome = state
        .node
        .share(&state.config.share_url, body.native_available)
        .await;
    tracing::info!(method = ?outcome.method, "Share text generated");
    Json(DataResponse { data: outcome })
}

/// POST /session/test-sound
pub async fn test_sound(State(state): State<AppState>) -> Json<DataResponse<TestSoundResponse>> {
    state.node.test_sound().await;
    Json(DataResponse {
        data: TestSoundResponse {
            cue: SoundCue::Test,
            tone: SoundCue::Test.tone(),
        },
    })
}
