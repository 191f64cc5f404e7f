use std::str::FromStr;
use std::time::Duration;

use swarm_core::error::CoreError;

/// What happens after a refill appends new jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefillPolicy {
    /// Idle until [`NodeController::continue_queue`](crate::NodeController::continue_queue).
    Manual,
    /// Go straight back to bidding on the new jobs.
    Auto,
}

impl FromStr for RefillPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manual" => Ok(RefillPolicy::Manual),
            "auto" => Ok(RefillPolicy::Auto),
            other => Err(CoreError::Validation(format!(
                "REFILL_POLICY must be 'manual' or 'auto', got '{other}'"
            ))),
        }
    }
}

/// Stage timings for the simulated pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Pause after the bid is placed.
    pub bid_delay: Duration,
    /// Per training step wait at speed 1.0x; divided by the device speed.
    pub step_base: Duration,
    /// Simulated proof generation time.
    pub proof_delay: Duration,
    /// How long the page shows the celebration effect.
    pub celebration: Duration,
    /// Delay before a drained queue is topped up.
    pub refill_delay: Duration,
    pub refill_policy: RefillPolicy,
}

const DEFAULT_BID_DELAY_MS: u64 = 1000;
const DEFAULT_STEP_BASE_MS: u64 = 800;
const DEFAULT_PROOF_DELAY_MS: u64 = 1500;
const DEFAULT_CELEBRATION_MS: u64 = 3000;
const DEFAULT_REFILL_DELAY_MS: u64 = 2000;

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            bid_delay: Duration::from_millis(DEFAULT_BID_DELAY_MS),
            step_base: Duration::from_millis(DEFAULT_STEP_BASE_MS),
            proof_delay: Duration::from_millis(DEFAULT_PROOF_DELAY_MS),
            celebration: Duration::from_millis(DEFAULT_CELEBRATION_MS),
            refill_delay: Duration::from_millis(DEFAULT_REFILL_DELAY_MS),
            refill_policy: RefillPolicy::Manual,
        }
    }
}

impl PipelineConfig {
    /// Load timings from environment variables, falling back to defaults.
    ///
    /// | Env Var           | Default  |
    /// |-------------------|----------|
    /// | `BID_DELAY_MS`    | `1000`   |
    /// | `STEP_BASE_MS`    | `800`    |
    /// | `PROOF_DELAY_MS`  | `1500`   |
    /// | `CELEBRATION_MS`  | `3000`   |
    /// | `REFILL_DELAY_MS` | `2000`   |
    /// | `REFILL_POLICY`   | `manual` |
    ///
    /// Unparseable values are logged and replaced by the default.
    pub fn from_env() -> Self {
        let refill_policy = match std::env::var("REFILL_POLICY") {
            Ok(raw) => raw.parse().unwrap_or_else(|e: CoreError| {
                tracing::warn!(error = %e, "Falling back to manual refill policy");
                RefillPolicy::Manual
            }),
            Err(_) => RefillPolicy::Manual,
        };

        Self {
            bid_delay: millis_from_env("BID_DELAY_MS", DEFAULT_BID_DELAY_MS),
            step_base: millis_from_env("STEP_BASE_MS", DEFAULT_STEP_BASE_MS),
            proof_delay: millis_from_env("PROOF_DELAY_MS", DEFAULT_PROOF_DELAY_MS),
            celebration: millis_from_env("CELEBRATION_MS", DEFAULT_CELEBRATION_MS),
            refill_delay: millis_from_env("REFILL_DELAY_MS", DEFAULT_REFILL_DELAY_MS),
            refill_policy,
        }
    }
}

fn millis_from_env(var: &str, default: u64) -> Duration {
    let millis = match std::env::var(var) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(var, value = %raw, default, "Invalid millisecond value, using default");
            default
        }),
        Err(_) => default,
    };
    Duration::from_millis(millis)
}
