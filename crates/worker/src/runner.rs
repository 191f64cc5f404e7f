use std::future::Future;
use std::sync::Arc;

use swarm_core::error::CoreError;
use swarm_core::types::Credits;
use swarm_events::{NodeEventKind, StageKind};
use swarm_pipeline::NodeController;
use tokio::sync::broadcast;

/// Why [`Runner::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The configured number of jobs settled.
    MaxJobs,
    /// The shutdown future resolved first.
    Shutdown,
    /// The event bus closed underneath the runner.
    BusClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub settled: usize,
    pub total: Credits,
    pub reason: StopReason,
}

/// Starts a node and watches its events until enough jobs have settled.
///
/// After a manual refill the runner continues the queue itself, so a
/// headless node never idles in `awaiting_continue`.
pub struct Runner {
    node: Arc<NodeController>,
    max_jobs: usize,
}

impl Runner {
    pub fn new(node: Arc<NodeController>, max_jobs: usize) -> Self {
        Self { node, max_jobs }
    }

    /// Run until `max_jobs` settle or `shutdown` resolves, then stop the node.
    pub async fn run<F>(self, shutdown: F) -> RunSummary
    where
        F: Future<Output = ()>,
    {
        let mut events = self.node.subscribe();
        let run_id = self.node.start().await;
        tracing::info!(run_id, max_jobs = self.max_jobs, "Headless run started");

        let mut settled = 0;
        let mut total = Credits::ZERO;
        tokio::pin!(shutdown);

        let reason = loop {
            let received = tokio::select! {
                () = &mut shutdown => break StopReason::Shutdown,
                received = events.recv() => received,
            };

            match received {
                Ok(event) if event.run_id != run_id => {}
                Ok(event) => match event.kind {
                    NodeEventKind::RewardSettled {
                        job,
                        reward,
                        total: new_total,
                        ..
                    } => {
                        settled += 1;
                        total = new_total;
                        tracing::info!(
                            job = job.name,
                            reward = %reward,
                            total = %total,
                            settled,
                            "Job settled",
                        );
                        if settled >= self.max_jobs {
                            break StopReason::MaxJobs;
                        }
                    }
                    NodeEventKind::StageChanged {
                        stage: StageKind::AwaitingContinue,
                        ..
                    } => self.continue_queue().await,
                    _ => {}
                },
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Runner lagged behind the event bus");
                    // A skipped awaiting_continue would stall the run.
                    self.continue_queue().await;
                }
                Err(broadcast::error::RecvError::Closed) => break StopReason::BusClosed,
            }
        };

        self.node.shutdown().await;
        tracing::info!(settled, total = %total, ?reason, "Headless run finished");
        RunSummary {
            settled,
            total,
            reason,
        }
    }

    async fn continue_queue(&self) {
        match self.node.continue_queue().await {
            Ok(()) => tracing::debug!("Continued job queue after refill"),
            Err(CoreError::NotAwaitingContinue) => {}
            Err(e) => tracing::warn!(error = %e, "Failed to continue job queue"),
        }
    }
}
