//! Read-only catalog endpoints.

use axum::Json;
use swarm_core::catalog::{DeviceProfile, JobDescriptor, DEVICES, JOBS};

use crate::response::DataResponse;

/// GET /devices
pub async fn list_devices() -> Json<DataResponse<&'static [DeviceProfile]>> {
    Json(DataResponse { data: DEVICES })
}

/// GET /jobs/catalog
pub async fn list_jobs() -> Json<DataResponse<&'static [JobDescriptor]>> {
    Json(DataResponse { data: JOBS })
}
