//! Event-to-WebSocket fan-out.
//!
//! [`EventRelay`] subscribes to the node's event bus and broadcasts each
//! [`NodeEvent`] to every connected page as a JSON text frame.

use std::sync::Arc;

use axum::extract::ws::Message;
use serde_json::json;
use swarm_events::NodeEvent;
use tokio::sync::broadcast;

use crate::ws::WsManager;

pub struct EventRelay {
    ws_manager: Arc<WsManager>,
}

impl EventRelay {
    pub fn new(ws_manager: Arc<WsManager>) -> Self {
        Self { ws_manager }
    }

    /// Run the relay loop until the event bus is dropped.
    ///
    /// When the relay falls behind, clients receive a `resync` message in
    /// place of the skipped events and should re-fetch `GET /session`.
    pub async fn run(self, mut receiver: broadcast::Receiver<NodeEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => self.forward(&event).await,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Event relay lagged, resyncing clients");
                    self.resync().await;
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, event relay shutting down");
                    break;
                }
            }
        }
    }

    async fn forward(&self, event: &NodeEvent) {
        match serde_json::to_string(event) {
            Ok(text) => self.ws_manager.broadcast(Message::Text(text.into())).await,
            Err(e) => {
                tracing::error!(error = %e, event_type = event.kind.name(), "Failed to encode event");
            }
        }
    }

    async fn resync(&self) {
        let text = json!({ "type": "resync" }).to_string();
        self.ws_manager.broadcast(Message::Text(text.into())).await;
    }
}
