//! Static device and job catalogs.
//!
//! Both catalogs are immutable. The job queue is seeded from [`JOBS`] and
//! topped up with random draws from it whenever it runs dry.

use rand::Rng;
use serde::Serialize;

use crate::error::CoreError;
use crate::types::{Credits, SpeedMultiplier};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A virtual compute accelerator the node can "run" on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeviceProfile {
    pub id: &'static str,
    pub name: &'static str,
    pub power_draw_watts: u32,
    /// Scales both per-step wait (inversely) and settled reward.
    pub speed: SpeedMultiplier,
}

/// A unit of simulated work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JobDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    /// Informational only; training always runs a fixed step count.
    pub nominal_duration_secs: u32,
    pub base_reward: Credits,
}

// ---------------------------------------------------------------------------
// Catalogs
// ---------------------------------------------------------------------------

/// Device used when nothing has been selected yet.
pub const DEFAULT_DEVICE_ID: &str = "rtx-4090";

pub static DEVICES: &[DeviceProfile] = &[
    DeviceProfile {
        id: "m2-macbook",
        name: "M2 MacBook",
        power_draw_watts: 30,
        speed: SpeedMultiplier::from_hundredths(30),
    },
    DeviceProfile {
        id: "rtx-3060",
        name: "RTX 3060",
        power_draw_watts: 170,
        speed: SpeedMultiplier::from_hundredths(50),
    },
    DeviceProfile {
        id: "rtx-4090",
        name: "RTX 4090",
        power_draw_watts: 450,
        speed: SpeedMultiplier::from_hundredths(100),
    },
    DeviceProfile {
        id: "a100",
        name: "A100",
        power_draw_watts: 400,
        speed: SpeedMultiplier::from_hundredths(110),
    },
    DeviceProfile {
        id: "h100",
        name: "H100",
        power_draw_watts: 700,
        speed: SpeedMultiplier::from_hundredths(120),
    },
];

pub static JOBS: &[JobDescriptor] = &[
    JobDescriptor {
        id: "llama-7b-finetune",
        name: "Fine-tune Llama-7B",
        nominal_duration_secs: 12,
        base_reward: Credits::from_millis(2_500),
    },
    JobDescriptor {
        id: "sd-proof",
        name: "Stable Diffusion Proof",
        nominal_duration_secs: 6,
        base_reward: Credits::from_millis(800),
    },
    JobDescriptor {
        id: "resnet-shard",
        name: "ResNet-50 Training Shard",
        nominal_duration_secs: 8,
        base_reward: Credits::from_millis(1_200),
    },
    JobDescriptor {
        id: "mistral-inference",
        name: "Mistral-7B Inference Batch",
        nominal_duration_secs: 4,
        base_reward: Credits::from_millis(500),
    },
    JobDescriptor {
        id: "whisper-eval",
        name: "Whisper Eval Sweep",
        nominal_duration_secs: 5,
        base_reward: Credits::from_millis(600),
    },
];

/// Fewest jobs appended by one refill.
pub const REFILL_MIN_JOBS: usize = 1;
/// Most jobs appended by one refill.
pub const REFILL_MAX_JOBS: usize = 3;

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

pub fn find_device(id: &str) -> Result<DeviceProfile, CoreError> {
    DEVICES
        .iter()
        .find(|d| d.id == id)
        .copied()
        .ok_or_else(|| CoreError::UnknownDevice(id.to_string()))
}

pub fn find_job(id: &str) -> Result<JobDescriptor, CoreError> {
    JOBS.iter()
        .find(|j| j.id == id)
        .copied()
        .ok_or_else(|| CoreError::UnknownJob(id.to_string()))
}

pub fn default_device() -> DeviceProfile {
    // DEFAULT_DEVICE_ID is always present in DEVICES.
    find_device(DEFAULT_DEVICE_ID).unwrap_or(DEVICES[0])
}

/// The queue a fresh session starts with: every job, in catalog order.
pub fn initial_queue() -> Vec<JobDescriptor> {
    JOBS.to_vec()
}

/// Draw a refill batch of [`REFILL_MIN_JOBS`]..=[`REFILL_MAX_JOBS`] jobs,
/// each chosen uniformly (with replacement) from [`JOBS`].
pub fn draw_refill<R: Rng + ?Sized>(rng: &mut R) -> Vec<JobDescriptor> {
    let count = rng.random_range(REFILL_MIN_JOBS..=REFILL_MAX_JOBS);
    (0..count)
        .map(|_| JOBS[rng.random_range(0..JOBS.len())])
        .collect()
}
