//! Simulated job pipeline.
//!
//! [`JobMachine`] is an explicit state machine over the per-job stages
//! (`Bidding -> Training -> Proving -> Settled`, plus `Refilling` when the
//! queue runs dry). Each call to [`JobMachine::advance`] performs one
//! transition and reports how long to wait before the next one.
//!
//! [`NodeController`] owns the machine, runs a single driver task per run,
//! and exposes the user-facing controls.

pub mod config;
pub mod controller;
mod driver;
pub mod machine;

pub use config::{PipelineConfig, RefillPolicy};
pub use controller::{NodeController, ShareOutcome};
pub use machine::{JobMachine, Next, Stage, Transition};
