// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;
use std::time::Duration;

use tharsis_core::{Clock, Job, JobType, Runner, RunId, SystemClock, Workspace};
use tharsis_scheduler::{AllowAllAuthorizer, EventBus, LogStreamManager, Scheduler};
use tharsis_storage::{JobRepository, MemoryStore};
use tharsis_token::{issue_job_token, InMemorySigningKeyManager};
use tharsis_wire::{decode, encode, read_message, write_message, Request, Response};
use tokio::net::TcpStream;
use tokio_util::sync::CancellationToken;

use super::*;
use crate::lifecycle::DaemonState;

async fn spawn_daemon() -> (Arc<DaemonState>, String, CancellationToken) {
    let store = Arc::new(MemoryStore::new());
    let bus = Arc::new(EventBus::spawn(store.clone()));
    let signer = Arc::new(InMemorySigningKeyManager::new(b"listener-test-secret".to_vec()));
    let authorizer = Arc::new(AllowAllAuthorizer);
    let scheduler = Arc::new(Scheduler::new(
        store.clone(),
        store.clone(),
        store.clone(),
        signer.clone(),
        authorizer.clone(),
        bus.clone(),
        SystemClock,
    ));
    let log_streams = Arc::new(LogStreamManager::new(store.clone(), bus));

    let mut state =
        DaemonState { store, scheduler, log_streams, signer, authorizer, bind_addr: "127.0.0.1:0".to_string() };
    let tcp_listener = super::bind(&state).await.unwrap();
    let addr = tcp_listener.local_addr().unwrap().to_string();
    state.bind_addr = addr.clone();
    let state = Arc::new(state);

    let shutdown = CancellationToken::new();
    let serve_state = state.clone();
    let serve_shutdown = shutdown.clone();
    tokio::spawn(async move {
        let _ = super::serve(tcp_listener, serve_state, serve_shutdown).await;
    });

    (state, addr, shutdown)
}

async fn call(addr: &str, credential: &[u8], request: &Request) -> Response {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    write_message(&mut stream, credential).await.unwrap();
    write_message(&mut stream, &encode(request).unwrap()).await.unwrap();
    let bytes = read_message(&mut stream).await.unwrap();
    decode(&bytes).unwrap()
}

#[tokio::test]
async fn claim_job_round_trips_through_the_wire() {
    let (state, addr, _shutdown) = spawn_daemon().await;
    let workspace = Workspace::builder().build();
    state.store.insert_workspace(workspace.clone());
    let runner = Runner::shared("shared-1");
    state.store.insert_runner(runner.clone());
    let job = Job::new(workspace.id, RunId::new(), JobType::Plan, 30, SystemClock.epoch_ms());
    state.store.create_job(job.clone()).await.unwrap();

    let response = tokio::time::timeout(
        Duration::from_secs(2),
        call(&addr, b"caller-token", &Request::ClaimJob { runner_path: "shared-1".to_string() }),
    )
    .await
    .unwrap();

    match response {
        Response::ClaimJob { job_id, token } => {
            assert_eq!(job_id, job.id);
            assert!(!token.is_empty());
        }
        other => panic!("unexpected response: {other:?}"),
    }
}

#[tokio::test]
async fn create_session_then_heartbeat_round_trips() {
    let (state, addr, _shutdown) = spawn_daemon().await;
    let runner = Runner::shared("shared-1");
    state.store.insert_runner(runner.clone());

    let session_response = call(
        &addr,
        b"caller-token",
        &Request::CreateRunnerSession { runner_path: "shared-1".to_string(), internal: false },
    )
    .await;
    let Response::CreateRunnerSession { session_id } = session_response else {
        panic!("expected CreateRunnerSession response");
    };

    let heartbeat_response =
        call(&addr, b"caller-token", &Request::SendRunnerSessionHeartbeat { session_id }).await;
    assert_eq!(heartbeat_response, Response::Ok);
}

#[tokio::test]
async fn save_and_get_logs_round_trip_with_a_job_token() {
    let (state, addr, _shutdown) = spawn_daemon().await;
    let workspace = Workspace::builder().build();
    state.store.insert_workspace(workspace.clone());
    let job = Job::new(workspace.id, RunId::new(), JobType::Plan, 30, SystemClock.epoch_ms());
    let created = state.store.create_job(job).await.unwrap();
    let token = issue_job_token(&created, SystemClock.epoch_ms(), state.signer.as_ref()).await.unwrap();

    let save_response = call(
        &addr,
        &token,
        &Request::SaveLogs { job_id: created.id, start_offset: 0, bytes: b"hello".to_vec() },
    )
    .await;
    assert_eq!(save_response, Response::Ok);

    let get_response =
        call(&addr, &token, &Request::GetLogs { job_id: created.id, start_offset: 0, limit: 16 }).await;
    assert_eq!(get_response, Response::Logs { bytes: b"hello".to_vec() });
}

#[tokio::test]
async fn save_logs_with_a_mismatched_job_token_is_rejected() {
    let (state, addr, _shutdown) = spawn_daemon().await;
    let workspace = Workspace::builder().build();
    state.store.insert_workspace(workspace.clone());
    let job_a = state
        .store
        .create_job(Job::new(workspace.id, RunId::new(), JobType::Plan, 30, SystemClock.epoch_ms()))
        .await
        .unwrap();
    let job_b = state
        .store
        .create_job(Job::new(workspace.id, RunId::new(), JobType::Plan, 30, SystemClock.epoch_ms()))
        .await
        .unwrap();
    let token_for_a = issue_job_token(&job_a, SystemClock.epoch_ms(), state.signer.as_ref()).await.unwrap();

    let response = call(
        &addr,
        &token_for_a,
        &Request::SaveLogs { job_id: job_b.id, start_offset: 0, bytes: b"x".to_vec() },
    )
    .await;
    assert!(matches!(response, Response::Error { .. }));
}

#[tokio::test]
async fn save_logs_at_a_non_boundary_offset_reports_invalid_offset() {
    let (state, addr, _shutdown) = spawn_daemon().await;
    let workspace = Workspace::builder().build();
    state.store.insert_workspace(workspace.clone());
    let job = state
        .store
        .create_job(Job::new(workspace.id, RunId::new(), JobType::Plan, 30, SystemClock.epoch_ms()))
        .await
        .unwrap();
    let token = issue_job_token(&job, SystemClock.epoch_ms(), state.signer.as_ref()).await.unwrap();

    let response = call(
        &addr,
        &token,
        &Request::SaveLogs { job_id: job.id, start_offset: 50, bytes: b"x".to_vec() },
    )
    .await;
    assert_eq!(response, Response::InvalidOffset);
}

#[tokio::test]
async fn subscribe_cancellation_reports_true_once_requested() {
    let (state, addr, _shutdown) = spawn_daemon().await;
    let workspace = Workspace::builder().build();
    state.store.insert_workspace(workspace.clone());
    let job = state
        .store
        .create_job(Job::new(workspace.id, RunId::new(), JobType::Plan, 30, SystemClock.epoch_ms()))
        .await
        .unwrap();
    let token = issue_job_token(&job, SystemClock.epoch_ms(), state.signer.as_ref()).await.unwrap();

    let mut requested = job.clone();
    requested.request_cancel();
    state.store.update_job(&requested).await.unwrap();

    let response = tokio::time::timeout(
        Duration::from_secs(2),
        call(&addr, &token, &Request::SubscribeCancellation { job_id: job.id }),
    )
    .await
    .unwrap();

    match response {
        Response::Cancellation(event) => {
            assert_eq!(event.job_id, job.id);
            assert!(event.cancelled);
        }
        other => panic!("unexpected response: {other:?}"),
    }
}

#[tokio::test]
async fn daemon_shutdown_releases_a_connection_blocked_in_claim_job() {
    let (state, addr, shutdown) = spawn_daemon().await;
    // No queued job exists, so ClaimJob blocks inside the scheduler.
    let runner = Runner::shared("shared-1");
    state.store.insert_runner(runner.clone());

    let mut stream = TcpStream::connect(&addr).await.unwrap();
    write_message(&mut stream, b"caller-token").await.unwrap();
    write_message(&mut stream, &encode(&Request::ClaimJob { runner_path: "shared-1".to_string() }).unwrap())
        .await
        .unwrap();

    // Let the connection task reach the blocking scheduler call before
    // shutting the daemon down.
    tokio::time::sleep(Duration::from_millis(50)).await;
    shutdown.cancel();

    let result = tokio::time::timeout(Duration::from_secs(2), read_message(&mut stream)).await.unwrap();
    assert!(result.is_err(), "blocked connection should close once the daemon shuts down");
}
