//! User-facing controls for a single simulated node.
//!
//! [`NodeController`] is the only owner of the session. Controls that mutate
//! it (start, pause, continue, device selection, share) go through the same
//! mutex the driver uses, and their events are published under that lock.

use std::sync::Arc;

use serde::Serialize;
use swarm_core::catalog::{self, DeviceProfile};
use swarm_core::error::CoreError;
use swarm_core::log::LogCategory;
use swarm_core::session::SessionSnapshot;
use swarm_core::share::{share_text, ShareMethod};
use swarm_core::sound::SoundCue;
use swarm_events::{EventBus, NodeEvent, NodeEventKind, RunId};
use tokio::sync::{broadcast, watch, Mutex, Notify};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::driver::Driver;
use crate::machine::JobMachine;

/// Handle to the driver task of the active run.
struct RunHandle {
    cancel: CancellationToken,
    resume_queue: Arc<Notify>,
    task: JoinHandle<()>,
}

/// Result of the share action, returned to the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareOutcome {
    pub text: String,
    pub method: ShareMethod,
}

pub struct NodeController {
    machine: Arc<Mutex<JobMachine>>,
    bus: Arc<EventBus>,
    paused_tx: watch::Sender<bool>,
    run: Mutex<Option<RunHandle>>,
}

impl NodeController {
    pub fn new(machine: JobMachine, bus: Arc<EventBus>) -> Self {
        let (paused_tx, _) = watch::channel(false);
        Self {
            machine: Arc::new(Mutex::new(machine)),
            bus,
            paused_tx,
            run: Mutex::new(None),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NodeEvent> {
        self.bus.subscribe()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.machine.lock().await.snapshot()
    }

    pub async fn run_id(&self) -> RunId {
        self.machine.lock().await.run_id()
    }

    /// Change the virtual device. Only allowed while no run is active.
    pub async fn select_device(&self, device_id: &str) -> Result<DeviceProfile, CoreError> {
        let device = catalog::find_device(device_id)?;
        self.machine.lock().await.select_device(device)?;
        tracing::info!(device = device.name, "Device selected");
        Ok(device)
    }

    /// Reset the session and start a new run, cancelling any previous one.
    ///
    /// The previous driver is cancelled and joined before the reset, so no
    /// transition scheduled by an older run can land in the new one.
    pub async fn start(&self) -> RunId {
        let mut run = self.run.lock().await;
        if let Some(previous) = run.take() {
            previous.cancel.cancel();
            if let Err(e) = previous.task.await {
                tracing::error!(error = %e, "Previous pipeline driver panicked");
            }
        }

        let cancel = CancellationToken::new();
        let resume_queue = Arc::new(Notify::new());

        let run_id = {
            let mut machine = self.machine.lock().await;
            let run_id = machine.run_id() + 1;
            self.paused_tx.send_replace(false);
            for kind in machine.start(run_id) {
                self.bus.publish(NodeEvent::new(run_id, kind));
            }
            tracing::info!(run_id, device = machine.session().device().name, "Node started");
            run_id
        };

        let driver = Driver {
            machine: Arc::clone(&self.machine),
            bus: Arc::clone(&self.bus),
            run_id,
            cancel: cancel.clone(),
            paused: self.paused_tx.subscribe(),
            resume_queue: Arc::clone(&resume_queue),
        };
        let task = tokio::spawn(driver.run());

        *run = Some(RunHandle {
            cancel,
            resume_queue,
            task,
        });
        run_id
    }

    /// Flip the pause flag. Returns the new value.
    pub async fn toggle_pause(&self) -> Result<bool, CoreError> {
        let mut machine = self.machine.lock().await;
        let (paused, events) = machine.toggle_pause()?;
        self.paused_tx.send_replace(paused);
        self.publish(machine.run_id(), events);
        tracing::info!(paused, "Pause toggled");
        Ok(paused)
    }

    /// Resume consumption after a manual refill.
    pub async fn continue_queue(&self) -> Result<(), CoreError> {
        let run = self.run.lock().await;
        let mut machine = self.machine.lock().await;
        let events = machine.continue_queue()?;
        self.publish(machine.run_id(), events);
        if let Some(handle) = run.as_ref() {
            handle.resume_queue.notify_one();
        }
        Ok(())
    }

    /// Build the share text for the current reward.
    ///
    /// Uses the native share sheet when the page reports one; otherwise the
    /// page copies to the clipboard and the copy is confirmed in the log.
    pub async fn share(&self, url: &str, native_available: bool) -> ShareOutcome {
        let mut machine = self.machine.lock().await;
        let text = share_text(machine.session().reward(), url);
        let method = ShareMethod::choose(native_available);
        if method == ShareMethod::Clipboard {
            let event = machine.append_log("Share text copied to clipboard", LogCategory::Success);
            self.publish(machine.run_id(), [event]);
        }
        ShareOutcome { text, method }
    }

    /// Emit the manual "test sound" cue.
    pub async fn test_sound(&self) {
        let run_id = self.machine.lock().await.run_id();
        self.bus
            .publish(NodeEvent::new(run_id, NodeEventKind::sound(SoundCue::Test)));
    }

    /// Cancel the active run (if any) and mark the session stopped.
    pub async fn shutdown(&self) {
        let mut run = self.run.lock().await;
        if let Some(previous) = run.take() {
            previous.cancel.cancel();
            if let Err(e) = previous.task.await {
                tracing::error!(error = %e, "Pipeline driver panicked");
            }
        }
        self.machine.lock().await.stop();
        tracing::info!("Node controller shut down");
    }

    fn publish(&self, run_id: RunId, events: impl IntoIterator<Item = NodeEventKind>) {
        for kind in events {
            self.bus.publish(NodeEvent::new(run_id, kind));
        }
    }
}
