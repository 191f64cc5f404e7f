//! Reward settlement.

use crate::catalog::{DeviceProfile, JobDescriptor};
use crate::types::Credits;

/// Reward paid for settling `job` on `device`: base reward times device speed.
pub fn settled_reward(job: &JobDescriptor, device: &DeviceProfile) -> Credits {
    job.base_reward.scale(device.speed)
}
