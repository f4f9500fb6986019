// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace-level integration tests: the daemon's wire listener driven
//! end-to-end by a real `tharsis-agent` loop, rather than unit-level
//! scheduler or transport tests (those live in their own crates).

use std::sync::Arc;
use std::time::Duration;

use tharsis_adapters::FakeExecutor;
use tharsis_agent::{AgentConfig, AgentMetrics, WireTransport};
use tharsis_core::{Clock, Job, JobType, Runner, RunId, SystemClock, Workspace};
use tharsis_daemon::lifecycle::DaemonState;
use tharsis_daemon::listener;
use tharsis_storage::JobRepository;
use tokio_util::sync::CancellationToken;

async fn spawn_daemon() -> (Arc<DaemonState>, String, CancellationToken) {
    let mut state = DaemonState::bootstrap();
    state.bind_addr = "127.0.0.1:0".to_string();
    let tcp_listener = listener::bind(&state).await.unwrap();
    state.bind_addr = tcp_listener.local_addr().unwrap().to_string();
    let addr = state.bind_addr.clone();
    let state = Arc::new(state);

    let shutdown = CancellationToken::new();
    let serve_state = state.clone();
    let serve_shutdown = shutdown.clone();
    tokio::spawn(async move {
        let _ = listener::serve(tcp_listener, serve_state, serve_shutdown).await;
    });

    (state, addr, shutdown)
}

/// A queued job gets claimed, dispatched through a `FakeExecutor`, and
/// the agent's metrics reflect exactly one successful dispatch.
#[tokio::test]
async fn agent_claims_and_dispatches_a_queued_job_end_to_end() {
    let (state, addr, shutdown) = spawn_daemon().await;

    let workspace = Workspace::builder().build();
    state.store.insert_workspace(workspace.clone());
    let runner = Runner::shared("shared-1");
    state.store.insert_runner(runner.clone());
    let job = Job::new(workspace.id, RunId::new(), JobType::Plan, 30, SystemClock.epoch_ms());
    state.store.create_job(job.clone()).await.unwrap();

    let transport = Arc::new(WireTransport::new(addr, "caller-token"));
    let executor = Arc::new(FakeExecutor::new());
    let config = AgentConfig::new("shared-1", "http://localhost", "");
    let metrics = Arc::new(AgentMetrics::new());
    let agent_shutdown = CancellationToken::new();

    let loop_shutdown = agent_shutdown.clone();
    let loop_metrics = metrics.clone();
    let agent_task = tokio::spawn(async move {
        tharsis_agent::run(transport, executor, config, SystemClock, loop_metrics, loop_shutdown).await
    });

    // Give the claim-dispatch loop a chance to pick up the one queued job,
    // then ask it to stop.
    tokio::time::sleep(Duration::from_millis(200)).await;
    agent_shutdown.cancel();
    tokio::time::timeout(Duration::from_secs(2), agent_task).await.unwrap().unwrap().unwrap();

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.claim_count, 1);
    assert_eq!(snapshot.dispatch_count, 1);
    assert_eq!(snapshot.launch_fails, 0);

    shutdown.cancel();
}

/// `internal_runners` wiring: the daemon can drive its own in-process
/// agent loop against a job with no external agent process involved.
#[tokio::test]
async fn internal_runner_claims_a_job_without_an_external_agent() {
    std::env::remove_var("THARSIS_INTERNAL_RUNNERS_PATH");
    let state = Arc::new(DaemonState::bootstrap());

    let workspace = Workspace::builder().build();
    state.store.insert_workspace(workspace.clone());
    let runner = Runner::shared("local");
    state.store.insert_runner(runner.clone());
    let job = Job::new(workspace.id, RunId::new(), JobType::Plan, 30, SystemClock.epoch_ms());
    state.store.create_job(job.clone()).await.unwrap();

    let internal_shutdown = CancellationToken::new();
    let transport = Arc::new(tharsis_daemon::internal_transport::InternalTransport::new(
        state.scheduler.clone(),
        state.store.clone(),
        SystemClock,
        internal_shutdown.clone(),
    ));
    let executor = Arc::new(FakeExecutor::new());
    let config = AgentConfig::new("local", "http://localhost", "");
    let metrics = Arc::new(AgentMetrics::new());

    let loop_shutdown = internal_shutdown.clone();
    let loop_metrics = metrics.clone();
    let agent_task = tokio::spawn(async move {
        tharsis_agent::run(transport, executor, config, SystemClock, loop_metrics, loop_shutdown).await
    });

    tokio::time::sleep(Duration::from_millis(200)).await;
    internal_shutdown.cancel();
    tokio::time::timeout(Duration::from_secs(2), agent_task).await.unwrap().unwrap().unwrap();

    assert_eq!(metrics.snapshot().claim_count, 1);
}
