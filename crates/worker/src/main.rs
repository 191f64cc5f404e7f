//! `swarm-worker` -- headless swarm node.
//!
//! Runs the same job pipeline as the server without HTTP, logging every node
//! event through `tracing`, and exits after a fixed number of settled jobs or
//! on Ctrl-C.
//!
//! # Environment variables
//!
//! | Variable          | Required | Default    | Description                         |
//! |-------------------|----------|------------|-------------------------------------|
//! | `DEVICE_ID`       | no       | `rtx-4090` | Device from the catalog             |
//! | `MAX_JOBS`        | no       | `5`        | Settled jobs before exiting         |
//! | `REFILL_POLICY`   | no       | `manual`   | `manual` or `auto`                  |
//! | `*_MS`            | no       | --         | Stage timings, as for `swarm-api`   |

use std::sync::Arc;

use swarm_core::session::SessionState;
use swarm_events::{EventBus, TracingSink};
use swarm_pipeline::{JobMachine, NodeController, PipelineConfig};
use swarm_worker::config::WorkerConfig;
use swarm_worker::runner::Runner;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "swarm_worker=info,swarm_events=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = WorkerConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid worker configuration");
        std::process::exit(1);
    });
    let pipeline = PipelineConfig::from_env();

    tracing::info!(
        device = config.device.name,
        max_jobs = config.max_jobs,
        refill_policy = ?pipeline.refill_policy,
        "Starting swarm-worker",
    );

    let bus = Arc::new(EventBus::default());
    let sink_handle = tokio::spawn(TracingSink::run(bus.subscribe()));

    let machine = JobMachine::new(pipeline, SessionState::new(config.device));
    let node = Arc::new(NodeController::new(machine, Arc::clone(&bus)));
    drop(bus);

    let summary = Runner::new(Arc::clone(&node), config.max_jobs)
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to install Ctrl-C handler");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received Ctrl-C, stopping");
        })
        .await;

    tracing::info!(
        settled = summary.settled,
        total = %summary.total,
        reason = ?summary.reason,
        "swarm-worker exiting",
    );

    // Dropping the last node handle closes the bus and ends the sink.
    drop(node);
    let _ = sink_handle.await;
}
