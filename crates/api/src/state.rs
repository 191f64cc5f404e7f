use std::sync::Arc;

use swarm_core::catalog;
use swarm_core::session::SessionState;
use swarm_events::EventBus;
use swarm_pipeline::{JobMachine, NodeController};

use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// The single simulated node this server hosts.
    pub node: Arc<NodeController>,
    /// WebSocket connection manager (browser clients).
    pub ws_manager: Arc<WsManager>,
    /// Event bus the node publishes to.
    pub event_bus: Arc<EventBus>,
}

impl AppState {
    /// Build the state for a fresh server: one idle node on the default
    /// device with the initial job queue.
    pub fn new(config: ServerConfig) -> Self {
        let event_bus = Arc::new(EventBus::default());
        let session = SessionState::new(catalog::default_device());
        let machine = JobMachine::new(config.pipeline.clone(), session);
        let node = Arc::new(NodeController::new(machine, Arc::clone(&event_bus)));

        Self {
            config: Arc::new(config),
            node,
            ws_manager: Arc::new(WsManager::new()),
            event_bus,
        }
    }
}
