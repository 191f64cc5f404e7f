pub mod catalog;
pub mod health;
pub mod session;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /ws                      WebSocket event stream
/// /devices                 device catalog
/// /jobs/catalog            job catalog
/// /session                 snapshot
/// /session/device          select device
/// /session/start           start or restart
/// /session/pause           toggle pause
/// /session/continue        continue after manual refill
/// /session/share           share text
/// /session/test-sound      test sound cue
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .merge(catalog::router())
        .nest("/session", session::router())
}
