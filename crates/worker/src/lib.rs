//! Headless node runner.
//!
//! Drives a single [`NodeController`](swarm_pipeline::NodeController) without
//! the HTTP surface and stops after a fixed number of settled jobs.

pub mod config;
pub mod runner;
