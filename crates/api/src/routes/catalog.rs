use axum::routing::get;
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// Catalog routes mounted at the API root.
///
/// ```text
/// GET /devices        -> list_devices
/// GET /jobs/catalog   -> list_jobs
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/devices", get(catalog::list_devices))
        .route("/jobs/catalog", get(catalog::list_jobs))
}
