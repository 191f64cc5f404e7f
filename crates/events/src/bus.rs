//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`NodeEvent`]s. It is
//! shared via `Arc<EventBus>` between the pipeline driver, the WebSocket
//! relay, and the tracing sink.

use serde::Serialize;
use swarm_core::catalog::{DeviceProfile, JobDescriptor};
use swarm_core::log::LogEntry;
use swarm_core::sound::{SoundCue, Tone};
use swarm_core::types::{Credits, Timestamp};
use tokio::sync::broadcast;

/// Monotonic run generation. Every start of the node gets a new one.
pub type RunId = u64;

// ---------------------------------------------------------------------------
// NodeEvent
// ---------------------------------------------------------------------------

/// Coarse pipeline stage, as reported to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Bidding,
    Training,
    Proving,
    Settled,
    Refilling,
    AwaitingContinue,
}

/// What happened. Serialized with a `"type"` tag for the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeEventKind {
    RunStarted {
        device: DeviceProfile,
    },
    StageChanged {
        stage: StageKind,
        job_index: usize,
        job: Option<JobDescriptor>,
    },
    Log {
        entry: LogEntry,
    },
    Progress {
        percent: u8,
        step: u32,
        total_steps: u32,
    },
    Sound {
        cue: SoundCue,
        tone: Tone,
    },
    Celebration {
        duration_ms: u64,
    },
    RewardSettled {
        job: JobDescriptor,
        reward: Credits,
        total: Credits,
        job_index: usize,
    },
    QueueRefilled {
        added: Vec<JobDescriptor>,
        queue_len: usize,
    },
    PauseToggled {
        paused: bool,
    },
}

impl NodeEventKind {
    /// Build a sound event with the cue's canonical tone.
    pub fn sound(cue: SoundCue) -> Self {
        NodeEventKind::Sound {
            cue,
            tone: cue.tone(),
        }
    }

    /// Stable snake_case name, matching the serialized `"type"` tag.
    pub fn name(&self) -> &'static str {
        match self {
            NodeEventKind::RunStarted { .. } => "run_started",
            NodeEventKind::StageChanged { .. } => "stage_changed",
            NodeEventKind::Log { .. } => "log",
            NodeEventKind::Progress { .. } => "progress",
            NodeEventKind::Sound { .. } => "sound",
            NodeEventKind::Celebration { .. } => "celebration",
            NodeEventKind::RewardSettled { .. } => "reward_settled",
            NodeEventKind::QueueRefilled { .. } => "queue_refilled",
            NodeEventKind::PauseToggled { .. } => "pause_toggled",
        }
    }
}

/// An event published by a node run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeEvent {
    /// Run that produced the event; observers drop events from older runs.
    pub run_id: RunId,

    /// When the event was created (UTC).
    pub timestamp: Timestamp,

    #[serde(flatten)]
    pub kind: NodeEventKind,
}

impl NodeEvent {
    pub fn new(run_id: RunId, kind: NodeEventKind) -> Self {
        Self {
            run_id,
            timestamp: chrono::Utc::now(),
            kind,
        }
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// ```rust
/// use swarm_events::bus::{EventBus, NodeEvent, NodeEventKind};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(NodeEvent::new(1, NodeEventKind::PauseToggled { paused: true }));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<NodeEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest un-consumed events are dropped
    /// and slow receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// With no subscribers the event is silently dropped.
    pub fn publish(&self, event: NodeEvent) {
        // SendError only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NodeEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use swarm_core::catalog::find_job;

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(NodeEvent::new(3, NodeEventKind::Celebration { duration_ms: 3000 }));

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.run_id, 3);
        assert_eq!(
            received.kind,
            NodeEventKind::Celebration { duration_ms: 3000 }
        );
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(NodeEvent::new(1, NodeEventKind::sound(SoundCue::Bid)));

        let e1 = rx1.recv().await.expect("subscriber 1 should receive");
        let e2 = rx2.recv().await.expect("subscriber 2 should receive");
        assert_eq!(e1.kind.name(), "sound");
        assert_eq!(e2.kind.name(), "sound");
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        bus.publish(NodeEvent::new(1, NodeEventKind::PauseToggled { paused: false }));
    }

    #[test]
    fn events_serialize_with_flat_type_tag() {
        let job = find_job("sd-proof").unwrap();
        let event = NodeEvent::new(
            9,
            NodeEventKind::RewardSettled {
                job,
                reward: Credits::from_millis(240),
                total: Credits::from_millis(240),
                job_index: 1,
            },
        );

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "reward_settled");
        assert_eq!(json["run_id"], 9);
        assert_eq!(json["reward"], "0.240000");
        assert_eq!(json["job"]["id"], "sd-proof");
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn sound_event_carries_tone() {
        let json = serde_json::to_value(NodeEventKind::sound(SoundCue::Reward)).unwrap();
        assert_eq!(json["type"], "sound");
        assert_eq!(json["cue"], "reward");
        assert_eq!(json["tone"]["frequency_hz"], 880);
        assert_eq!(json["tone"]["waveform"], "sine");
    }

    #[test]
    fn name_matches_serialized_tag() {
        let kinds = [
            NodeEventKind::PauseToggled { paused: true },
            NodeEventKind::Celebration { duration_ms: 1 },
            NodeEventKind::Progress {
                percent: 10,
                step: 1,
                total_steps: 10,
            },
        ];
        for kind in kinds {
            let json = serde_json::to_value(&kind).unwrap();
            assert_eq!(json["type"], kind.name());
        }
    }
}
