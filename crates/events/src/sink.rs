//! Mirrors node events into `tracing` output.
//!
//! [`TracingSink`] subscribes to the [`EventBus`](crate::bus::EventBus) and
//! writes every received [`NodeEvent`] as a structured log record. Session
//! log lines are logged at `info`; everything else at `debug`. It shuts down
//! when the bus is dropped.

use tokio::sync::broadcast;

use crate::bus::{NodeEvent, NodeEventKind};

pub struct TracingSink;

impl TracingSink {
    /// Run the sink loop until the channel closes.
    pub async fn run(mut receiver: broadcast::Receiver<NodeEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => Self::record(&event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Tracing sink lagged, some events were not logged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, tracing sink shutting down");
                    break;
                }
            }
        }
    }

    fn record(event: &NodeEvent) {
        match &event.kind {
            NodeEventKind::Log { entry } => {
                tracing::info!(
                    run_id = event.run_id,
                    category = ?entry.category,
                    "{}",
                    entry.message,
                );
            }
            NodeEventKind::RewardSettled {
                job, reward, total, ..
            } => {
                tracing::info!(
                    run_id = event.run_id,
                    job = job.name,
                    reward = %reward,
                    total = %total,
                    "Reward settled",
                );
            }
            other => {
                tracing::debug!(
                    run_id = event.run_id,
                    event_type = other.name(),
                    "Node event",
                );
            }
        }
    }
}
