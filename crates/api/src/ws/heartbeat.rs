//! Keep-alive pings for page sockets.
//!
//! A paused node, or one waiting in `awaiting_continue`, publishes nothing,
//! so proxies would otherwise drop the idle page connection.

use std::sync::Arc;
use std::time::Duration;

use crate::ws::manager::WsManager;

/// Interval between keep-alive pings.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Spawn the keep-alive task. The first ping goes out immediately.
///
/// Ticks with no connected page are skipped. Abort the handle on shutdown.
pub fn start_heartbeat(ws_manager: Arc<WsManager>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(HEARTBEAT_INTERVAL);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            let pages = ws_manager.connection_count().await;
            if pages == 0 {
                continue;
            }
            tracing::trace!(pages, "Pinging page sockets");
            ws_manager.ping_all().await;
        }
    })
}
