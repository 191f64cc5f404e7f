//! Per-job state machine.
//!
//! ```text
//!            queue empty                 Auto
//!   Bidding ────────────▶ Refilling ─────────────▶ Bidding
//!      │                      │ Manual
//!      ▼                      ▼
//!   Training{0..N} ──▶ Proving ──▶ Settling ──▶ Bidding (next job)
//!      ▲   │ paused                         AwaitingContinue ──continue──▶ Bidding
//!      └───┘ (no step counted)
//! ```
//!
//! [`JobMachine::advance`] performs the work of the current stage, moves to
//! the next one, and returns a [`Transition`] carrying the events produced
//! and how the driver should wait before calling `advance` again.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use swarm_core::catalog::{self, DeviceProfile, JobDescriptor};
use swarm_core::error::CoreError;
use swarm_core::log::LogCategory;
use swarm_core::reward::settled_reward;
use swarm_core::session::{SessionSnapshot, SessionState};
use swarm_core::sound::SoundCue;
use swarm_core::training::{illustrative_accuracy, SyntheticModel, TRAINING_STEPS};
use swarm_events::{NodeEventKind, RunId, StageKind};

use crate::config::{PipelineConfig, RefillPolicy};

// ---------------------------------------------------------------------------
// Stage / Next / Transition
// ---------------------------------------------------------------------------

/// The stage whose work the next [`JobMachine::advance`] call will perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// No run active.
    Idle,
    Bidding,
    Training { completed: u32 },
    Proving,
    Settling,
    Refilling,
    AwaitingContinue,
}

/// How the driver should wait before the next transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next {
    After(Duration),
    /// Training is paused; wait for the pause flag to clear.
    WaitForResume,
    /// Manual refill policy; wait for an explicit continue.
    WaitForContinue,
    /// Nothing left to drive.
    Halt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub next: Next,
    pub events: Vec<NodeEventKind>,
}

impl Transition {
    fn new(next: Next) -> Self {
        Self {
            next,
            events: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// JobMachine
// ---------------------------------------------------------------------------

pub struct JobMachine {
    config: PipelineConfig,
    session: SessionState,
    stage: Stage,
    run_id: RunId,
    model: Option<SyntheticModel>,
    rng: StdRng,
}

impl JobMachine {
    pub fn new(config: PipelineConfig, session: SessionState) -> Self {
        Self::with_rng(config, session, StdRng::from_os_rng())
    }

    /// Deterministic randomness for tests.
    pub fn with_rng(config: PipelineConfig, session: SessionState, rng: StdRng) -> Self {
        Self {
            config,
            session,
            stage: Stage::Idle,
            run_id: 0,
            model: None,
            rng,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Controls
    // -----------------------------------------------------------------------

    pub fn select_device(&mut self, device: DeviceProfile) -> Result<(), CoreError> {
        self.session.select_device(device)
    }

    /// Reset the session and begin bidding on the job at index 0.
    pub fn start(&mut self, run_id: RunId) -> Vec<NodeEventKind> {
        self.run_id = run_id;
        self.session.reset_for_run();
        self.stage = Stage::Bidding;
        self.model = None;

        let device = *self.session.device();
        let mut events = vec![NodeEventKind::RunStarted { device }];
        self.log(
            &mut events,
            format!(
                "Joined swarm on {} ({} W, {} speed)",
                device.name, device.power_draw_watts, device.speed
            ),
            LogCategory::Info,
        );
        events
    }

    pub fn toggle_pause(&mut self) -> Result<(bool, Vec<NodeEventKind>), CoreError> {
        let before = self.session.log().len();
        let paused = self.session.toggle_pause()?;
        let mut events = vec![NodeEventKind::PauseToggled { paused }];
        events.extend(self.session.log()[before..].iter().map(|entry| NodeEventKind::Log {
            entry: entry.clone(),
        }));
        Ok((paused, events))
    }

    /// Leave [`Stage::AwaitingContinue`] and resume bidding.
    pub fn continue_queue(&mut self) -> Result<Vec<NodeEventKind>, CoreError> {
        if self.stage != Stage::AwaitingContinue {
            return Err(CoreError::NotAwaitingContinue);
        }
        self.stage = Stage::Bidding;
        let mut events = Vec::new();
        self.log(&mut events, "Resuming job queue", LogCategory::Info);
        Ok(events)
    }

    /// End the run. Pending transitions become no-ops.
    pub fn stop(&mut self) {
        self.stage = Stage::Idle;
        self.model = None;
        self.session.stop();
    }

    pub fn append_log(&mut self, message: impl Into<String>, category: LogCategory) -> NodeEventKind {
        let entry = self.session.append_log(message, category).clone();
        NodeEventKind::Log { entry }
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// Perform the current stage's work and move to the next stage.
    pub fn advance(&mut self) -> Transition {
        match self.stage {
            Stage::Idle => Transition::new(Next::Halt),
            Stage::Bidding => self.bid(),
            Stage::Training { completed } => self.train(completed),
            Stage::Proving => self.prove(),
            Stage::Settling => self.settle(),
            Stage::Refilling => self.refill(),
            Stage::AwaitingContinue => Transition::new(Next::WaitForContinue),
        }
    }

    fn bid(&mut self) -> Transition {
        let Some(job) = self.session.current_job().copied() else {
            self.stage = Stage::Refilling;
            let mut t = Transition::new(Next::After(self.config.refill_delay));
            t.events.push(self.stage_changed(StageKind::Refilling, None));
            self.log(
                &mut t.events,
                "Job queue empty, requesting more work from the swarm",
                LogCategory::Info,
            );
            return t;
        };

        self.session.set_progress(0);
        self.model = Some(SyntheticModel::new(&mut self.rng));
        self.stage = Stage::Training { completed: 0 };

        let mut t = Transition::new(Next::After(self.config.bid_delay));
        t.events.push(self.stage_changed(StageKind::Bidding, Some(job)));
        self.log(
            &mut t.events,
            format!("Bidding on {} (base reward {})", job.name, job.base_reward),
            LogCategory::Bid,
        );
        t.events.push(NodeEventKind::sound(SoundCue::Bid));
        t.events.push(self.progress_event(0));
        t
    }

    fn train(&mut self, completed: u32) -> Transition {
        if self.session.is_paused() {
            return Transition::new(Next::WaitForResume);
        }

        let mut t = Transition::new(Next::After(
            self.session.device().speed.scale_wait(self.config.step_base),
        ));
        if completed == 0 {
            let job = self.session.current_job().copied();
            t.events.push(self.stage_changed(StageKind::Training, job));
        }

        let model = self
            .model
            .get_or_insert_with(|| SyntheticModel::new(&mut self.rng));
        let loss = model.train_step(&mut self.rng);

        let step = completed + 1;
        let accuracy = illustrative_accuracy(TRAINING_STEPS - step, TRAINING_STEPS);
        self.session.set_progress(step * 100 / TRAINING_STEPS);

        self.log(
            &mut t.events,
            format!(
                "Step {step}/{TRAINING_STEPS} · loss {loss:.4} · accuracy {accuracy:.1}% (illustrative)"
            ),
            LogCategory::Info,
        );
        t.events.push(self.progress_event(step));
        t.events.push(NodeEventKind::sound(SoundCue::Step));

        self.stage = if step >= TRAINING_STEPS {
            Stage::Proving
        } else {
            Stage::Training { completed: step }
        };
        t
    }

    fn prove(&mut self) -> Transition {
        let job = self.session.current_job().copied();
        self.stage = Stage::Settling;

        let mut t = Transition::new(Next::After(self.config.proof_delay));
        t.events.push(self.stage_changed(StageKind::Proving, job));
        self.log(&mut t.events, "Generating proof of work...", LogCategory::Info);
        t.events.push(NodeEventKind::sound(SoundCue::Proof));
        t
    }

    fn settle(&mut self) -> Transition {
        self.stage = Stage::Bidding;
        self.model = None;

        let mut t = Transition::new(Next::After(Duration::ZERO));
        let Some(job) = self.session.current_job().copied() else {
            return t;
        };

        // Reported before `settle` advances the index to the next job.
        t.events.push(self.stage_changed(StageKind::Settled, Some(job)));

        let job_index = self.session.job_index();
        let reward = settled_reward(&job, self.session.device());
        let total = self.session.settle(reward);

        self.log(
            &mut t.events,
            format!("Proof accepted for {}: +{reward} SWARM", job.name),
            LogCategory::Success,
        );
        t.events.push(NodeEventKind::RewardSettled {
            job,
            reward,
            total,
            job_index,
        });
        t.events.push(NodeEventKind::sound(SoundCue::Reward));
        t.events.push(NodeEventKind::Celebration {
            duration_ms: self.config.celebration.as_millis() as u64,
        });
        t.events.push(self.progress_event(0));
        t
    }

    fn refill(&mut self) -> Transition {
        let added = catalog::draw_refill(&mut self.rng);
        self.session.enqueue(added.iter().copied());

        let mut t = Transition::new(Next::After(Duration::ZERO));
        self.log(
            &mut t.events,
            format!("Received {} new job(s) from the swarm", added.len()),
            LogCategory::Info,
        );
        t.events.push(NodeEventKind::QueueRefilled {
            added,
            queue_len: self.session.queue().len(),
        });

        match self.config.refill_policy {
            RefillPolicy::Auto => {
                self.stage = Stage::Bidding;
            }
            RefillPolicy::Manual => {
                self.stage = Stage::AwaitingContinue;
                t.next = Next::WaitForContinue;
                t.events
                    .push(self.stage_changed(StageKind::AwaitingContinue, None));
            }
        }
        t
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn log(&mut self, events: &mut Vec<NodeEventKind>, message: impl Into<String>, category: LogCategory) {
        events.push(self.append_log(message, category));
    }

    fn stage_changed(&self, stage: StageKind, job: Option<JobDescriptor>) -> NodeEventKind {
        NodeEventKind::StageChanged {
            stage,
            job_index: self.session.job_index(),
            job,
        }
    }

    fn progress_event(&self, step: u32) -> NodeEventKind {
        NodeEventKind::Progress {
            percent: self.session.progress(),
            step,
            total_steps: TRAINING_STEPS,
        }
    }
}
