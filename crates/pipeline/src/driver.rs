//! The single task that drives a run's [`JobMachine`].
//!
//! Each iteration takes the machine lock, performs one transition, publishes
//! its events while still holding the lock (so events from concurrent
//! controls never interleave out of order), then waits as the transition
//! asks. Cancellation is checked under the lock, so once a newer run has
//! cancelled this one no further transition can touch the session.

use std::sync::Arc;

use swarm_events::{EventBus, NodeEvent, RunId};
use tokio::sync::{watch, Mutex, Notify};
use tokio_util::sync::CancellationToken;

use crate::machine::{JobMachine, Next};

pub(crate) struct Driver {
    pub machine: Arc<Mutex<JobMachine>>,
    pub bus: Arc<EventBus>,
    pub run_id: RunId,
    pub cancel: CancellationToken,
    pub paused: watch::Receiver<bool>,
    pub resume_queue: Arc<Notify>,
}

impl Driver {
    pub async fn run(mut self) {
        tracing::info!(run_id = self.run_id, "Pipeline driver started");

        loop {
            let next = {
                let mut machine = self.machine.lock().await;
                if self.cancel.is_cancelled() || machine.run_id() != self.run_id {
                    break;
                }
                let transition = machine.advance();
                for kind in transition.events {
                    self.bus.publish(NodeEvent::new(self.run_id, kind));
                }
                tracing::trace!(run_id = self.run_id, stage = ?machine.stage(), "Transition");
                transition.next
            };

            let keep_going = match next {
                Next::After(delay) => {
                    tokio::select! {
                        _ = self.cancel.cancelled() => false,
                        _ = tokio::time::sleep(delay) => true,
                    }
                }
                Next::WaitForResume => {
                    tracing::debug!(run_id = self.run_id, "Training paused, waiting for resume");
                    tokio::select! {
                        _ = self.cancel.cancelled() => false,
                        changed = self.paused.wait_for(|paused| !*paused) => changed.is_ok(),
                    }
                }
                Next::WaitForContinue => {
                    tracing::debug!(run_id = self.run_id, "Queue refilled, waiting for continue");
                    tokio::select! {
                        _ = self.cancel.cancelled() => false,
                        _ = self.resume_queue.notified() => true,
                    }
                }
                Next::Halt => false,
            };

            if !keep_going {
                break;
            }
        }

        tracing::info!(run_id = self.run_id, "Pipeline driver stopped");
    }
}
