//! Domain types and pure logic for the swarm node simulator.
//!
//! Nothing in this crate touches timers or I/O: catalogs, fixed-point
//! credits, the session aggregate, and the synthetic training step all live
//! here so the pipeline, API, and headless runner share one definition.

pub mod catalog;
pub mod error;
pub mod log;
pub mod reward;
pub mod session;
pub mod share;
pub mod sound;
pub mod training;
pub mod types;
