//! Tests for the headless runner on a paused Tokio clock.

use std::sync::Arc;
use std::time::Duration;

use swarm_core::catalog::find_device;
use swarm_core::session::SessionState;
use swarm_core::types::Credits;
use swarm_events::EventBus;
use swarm_pipeline::{JobMachine, NodeController, PipelineConfig, RefillPolicy};
use swarm_worker::runner::{Runner, StopReason};

fn node(device: &str, policy: RefillPolicy) -> Arc<NodeController> {
    let config = PipelineConfig {
        refill_policy: policy,
        ..Default::default()
    };
    let machine = JobMachine::new(config, SessionState::new(find_device(device).unwrap()));
    Arc::new(NodeController::new(machine, Arc::new(EventBus::default())))
}

#[tokio::test(start_paused = true)]
async fn stops_after_max_jobs() {
    let node = node("h100", RefillPolicy::Manual);
    let summary = Runner::new(Arc::clone(&node), 2)
        .run(std::future::pending())
        .await;

    assert_eq!(summary.reason, StopReason::MaxJobs);
    assert_eq!(summary.settled, 2);
    // Llama fine-tune then Stable Diffusion on an H100: 3.0 + 0.96.
    assert_eq!(summary.total, Credits::from_micros(3_960_000));

    let snapshot = node.snapshot().await;
    assert!(!snapshot.running);
    assert_eq!(snapshot.reward, summary.total);
}

#[tokio::test(start_paused = true)]
async fn continues_past_manual_refill() {
    let node = node("rtx-4090", RefillPolicy::Manual);
    let summary = Runner::new(Arc::clone(&node), 7)
        .run(std::future::pending())
        .await;

    assert_eq!(summary.reason, StopReason::MaxJobs);
    assert_eq!(summary.settled, 7);
    assert_eq!(node.snapshot().await.job_index, 7);
}

#[tokio::test(start_paused = true)]
async fn runs_through_auto_refill() {
    let node = node("a100", RefillPolicy::Auto);
    let summary = Runner::new(node, 6).run(std::future::pending()).await;

    assert_eq!(summary.reason, StopReason::MaxJobs);
    assert_eq!(summary.settled, 6);
}

#[tokio::test(start_paused = true)]
async fn shutdown_future_stops_the_run_early() {
    let node = node("m2-macbook", RefillPolicy::Manual);
    let summary = Runner::new(Arc::clone(&node), 5)
        .run(tokio::time::sleep(Duration::from_secs(1)))
        .await;

    assert_eq!(summary.reason, StopReason::Shutdown);
    assert_eq!(summary.settled, 0);
    assert_eq!(summary.total, Credits::ZERO);
    assert!(!node.snapshot().await.running);
}
