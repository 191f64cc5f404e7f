use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::session;
use crate::state::AppState;

/// Session control routes mounted at `/session`.
///
/// ```text
/// GET  /              -> get_session
/// PUT  /device        -> select_device
/// POST /start         -> start
/// POST /pause         -> toggle_pause
/// POST /continue      -> continue_queue
/// POST /share         -> share
/// POST /test-sound    -> test_sound
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(session::get_session))
        .route("/device", put(session::select_device))
        .route("/start", post(session::start))
        .route("/pause", post(session::toggle_pause))
        .route("/continue", post(session::continue_queue))
        .route("/share", post(session::share))
        .route("/test-sound", post(session::test_sound))
}
