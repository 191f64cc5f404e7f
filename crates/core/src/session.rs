//! The session aggregate: everything the page renders.
//!
//! All fields are private. The pipeline controller is the only writer and
//! goes through the methods below, which is where the invariants live:
//!
//! - job index only moves forward within a run and is zeroed on reset;
//! - progress is clamped to `0..=100`;
//! - accumulated reward only grows within a run;
//! - the log is append-only with non-decreasing timestamps.

use serde::Serialize;

use crate::catalog::{self, DeviceProfile, JobDescriptor};
use crate::error::CoreError;
use crate::log::{LogCategory, LogEntry};
use crate::types::{Credits, Timestamp};

/// Number of upcoming jobs included in a snapshot's queue preview.
pub const QUEUE_PREVIEW_LEN: usize = 4;

/// Upper bound for [`SessionState::progress`].
pub const MAX_PROGRESS: u8 = 100;

#[derive(Debug, Clone)]
pub struct SessionState {
    device: DeviceProfile,
    running: bool,
    paused: bool,
    progress: u8,
    reward: Credits,
    job_index: usize,
    queue: Vec<JobDescriptor>,
    log: Vec<LogEntry>,
}

impl SessionState {
    /// An idle session on `device` with the catalog's initial queue.
    pub fn new(device: DeviceProfile) -> Self {
        Self::with_queue(device, catalog::initial_queue())
    }

    pub fn with_queue(device: DeviceProfile, queue: Vec<JobDescriptor>) -> Self {
        Self {
            device,
            running: false,
            paused: false,
            progress: 0,
            reward: Credits::ZERO,
            job_index: 0,
            queue,
            log: Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub fn device(&self) -> &DeviceProfile {
        &self.device
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn reward(&self) -> Credits {
        self.reward
    }

    pub fn job_index(&self) -> usize {
        self.job_index
    }

    pub fn queue(&self) -> &[JobDescriptor] {
        &self.queue
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    /// The job at the current index, or `None` when the queue is exhausted.
    pub fn current_job(&self) -> Option<&JobDescriptor> {
        self.queue.get(self.job_index)
    }

    pub fn queue_exhausted(&self) -> bool {
        self.job_index >= self.queue.len()
    }

    /// Jobs from the current index onward, at most `n` of them.
    pub fn upcoming(&self, n: usize) -> &[JobDescriptor] {
        let start = self.job_index.min(self.queue.len());
        let end = (start + n).min(self.queue.len());
        &self.queue[start..end]
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Swap the active device. Rejected while a run is in progress.
    pub fn select_device(&mut self, device: DeviceProfile) -> Result<(), CoreError> {
        if self.running {
            return Err(CoreError::SessionRunning {
                action: "change device",
            });
        }
        self.device = device;
        Ok(())
    }

    /// Append a log line stamped with the current wall-clock time.
    pub fn append_log(&mut self, message: impl Into<String>, category: LogCategory) -> &LogEntry {
        self.append_log_at(chrono::Utc::now(), message, category)
    }

    /// Append with an explicit timestamp, clamped so it never precedes the
    /// previous entry.
    pub fn append_log_at(
        &mut self,
        timestamp: Timestamp,
        message: impl Into<String>,
        category: LogCategory,
    ) -> &LogEntry {
        let timestamp = match self.log.last() {
            Some(last) if last.timestamp > timestamp => last.timestamp,
            _ => timestamp,
        };
        self.log.push(LogEntry {
            timestamp,
            message: message.into(),
            category,
        });
        // Just pushed, so the log is non-empty.
        &self.log[self.log.len() - 1]
    }

    /// Start a fresh run: clear the log, zero counters, mark running.
    ///
    /// The queue survives resets; consumption restarts from index 0.
    pub fn reset_for_run(&mut self) {
        self.log.clear();
        self.reward = Credits::ZERO;
        self.progress = 0;
        self.job_index = 0;
        self.running = true;
        self.paused = false;
    }

    /// Mark the run finished. Counters and log are left for inspection.
    pub fn stop(&mut self) {
        self.running = false;
        self.paused = false;
    }

    /// Flip the paused flag and log the new state. Returns the new flag.
    pub fn toggle_pause(&mut self) -> Result<bool, CoreError> {
        if !self.running {
            return Err(CoreError::NotRunning);
        }
        self.paused = !self.paused;
        let message = if self.paused {
            "Node paused"
        } else {
            "Node resumed"
        };
        self.append_log(message, LogCategory::Info);
        Ok(self.paused)
    }

    pub fn set_progress(&mut self, percent: u32) {
        self.progress = percent.min(u32::from(MAX_PROGRESS)) as u8;
    }

    /// Credit `reward`, move to the next job, and zero progress.
    ///
    /// Returns the new accumulated total.
    pub fn settle(&mut self, reward: Credits) -> Credits {
        self.reward = self.reward.saturating_add(reward);
        self.job_index += 1;
        self.progress = 0;
        self.reward
    }

    /// Append jobs to the end of the queue. Returns how many were added.
    pub fn enqueue(&mut self, jobs: impl IntoIterator<Item = JobDescriptor>) -> usize {
        let before = self.queue.len();
        self.queue.extend(jobs);
        self.queue.len() - before
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            device: self.device,
            running: self.running,
            paused: self.paused,
            progress: self.progress,
            reward: self.reward,
            job_index: self.job_index,
            current_job: self.current_job().copied(),
            queue_len: self.queue.len(),
            queue_preview: self.upcoming(QUEUE_PREVIEW_LEN).to_vec(),
            log: self.log.clone(),
        }
    }
}

/// Read-only view of a session for the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub device: DeviceProfile,
    pub running: bool,
    pub paused: bool,
    pub progress: u8,
    pub reward: Credits,
    pub job_index: usize,
    pub current_job: Option<JobDescriptor>,
    pub queue_len: usize,
    pub queue_preview: Vec<JobDescriptor>,
    pub log: Vec<LogEntry>,
}
