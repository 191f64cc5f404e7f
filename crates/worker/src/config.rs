use swarm_core::catalog::{self, DeviceProfile, DEFAULT_DEVICE_ID};
use swarm_core::error::CoreError;

const DEFAULT_MAX_JOBS: usize = 5;

/// Settings for a headless run.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub device: DeviceProfile,
    /// Stop after this many settled jobs.
    pub max_jobs: usize,
}

impl WorkerConfig {
    /// Read `DEVICE_ID` and `MAX_JOBS` from the environment. Malformed
    /// values are errors, not defaults.
    pub fn from_env() -> Result<Self, CoreError> {
        let device_id = std::env::var("DEVICE_ID").unwrap_or_else(|_| DEFAULT_DEVICE_ID.into());
        let max_jobs = std::env::var("MAX_JOBS").ok();
        Self::parse(&device_id, max_jobs.as_deref())
    }

    pub fn parse(device_id: &str, max_jobs: Option<&str>) -> Result<Self, CoreError> {
        let device = catalog::find_device(device_id.trim())?;
        let max_jobs = match max_jobs {
            None => DEFAULT_MAX_JOBS,
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(0) | Err(_) => {
                    return Err(CoreError::Validation(format!(
                        "MAX_JOBS must be a positive integer, got '{raw}'"
                    )))
                }
                Ok(n) => n,
            },
        };
        Ok(Self { device, max_jobs })
    }
}
