//! Node event bus.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`NodeEvent`]: envelope for everything the pipeline reports to the
//!   presentation layer (log lines, progress, sound cues, celebrations).
//! - [`TracingSink`]: background subscriber that mirrors events into
//!   `tracing` output.

pub mod bus;
pub mod sink;

pub use bus::{EventBus, NodeEvent, NodeEventKind, RunId, StageKind};
pub use sink::TracingSink;
