// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TCP front door (§6): one connection per call. A connection reads a
//! credential "Hello" frame, then exactly one [`Request`] frame, then
//! writes one (or, for the two subscribe-shaped calls, a sequence of)
//! [`Response`] frame before closing.
//!
//! Agent-facing calls (`ClaimJob`, `CreateRunnerSession`,
//! `SendRunnerSessionHeartbeat`, `CreateRunnerSessionError`) authenticate
//! their Hello frame as a caller token via [`Authorizer::authorize_caller`].
//! Worker-facing calls (`SaveLogs`, `GetLogs`, `SubscribeCancellation`,
//! `SubscribeLogs`) authenticate it as a job token via
//! [`verify_job_token`]; there is no real caller identity for a worker
//! process, so a synthetic `Caller` scoped to the job is constructed for
//! the permission check.

use std::sync::Arc;

use tharsis_core::{Clock, Error, EventAction, Result, SystemClock};
use tharsis_scheduler::{Authorizer, Caller};
use tharsis_storage::{JobRepository, LogStore, RunnerSessionRepository};
use tharsis_token::verify_job_token;
use tharsis_wire::{decode, encode, read_message, write_message, Request, Response};
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;

use crate::error::DaemonError;
use crate::lifecycle::DaemonState;

/// Binds `state.bind_addr`. Split from [`serve`] so a caller (tests, in
/// particular) can learn the actual bound address before the accept loop
/// starts — useful for an ephemeral `:0` port.
pub async fn bind(state: &DaemonState) -> Result<TcpListener, DaemonError> {
    TcpListener::bind(&state.bind_addr)
        .await
        .map_err(|e| DaemonError::Bind { addr: state.bind_addr.clone(), source: e })
}

/// Accepts connections on `state.bind_addr` until `shutdown` is
/// cancelled, spawning one task per connection.
pub async fn run(state: Arc<DaemonState>, shutdown: CancellationToken) -> Result<(), DaemonError> {
    let listener = bind(&state).await?;
    tracing::info!(addr = %state.bind_addr, "listening");
    serve(listener, state, shutdown).await
}

/// Runs the accept loop against an already-bound listener.
pub async fn serve(
    listener: TcpListener,
    state: Arc<DaemonState>,
    shutdown: CancellationToken,
) -> Result<(), DaemonError> {
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => return Ok(()),
            accepted = listener.accept() => {
                let (stream, peer) = accepted.map_err(|e| DaemonError::Bind { addr: state.bind_addr.clone(), source: e })?;
                let state = state.clone();
                let conn_shutdown = shutdown.clone();
                tokio::spawn(async move {
                    // Races the whole connection against shutdown so that a
                    // call blocked inside the scheduler (ClaimJob,
                    // SubscribeCancellation) doesn't outlive the daemon.
                    tokio::select! {
                        _ = conn_shutdown.cancelled() => {}
                        result = handle_connection(state, stream, conn_shutdown.clone()) => {
                            if let Err(error) = result {
                                tracing::warn!(%peer, %error, "connection handling failed");
                            }
                        }
                    }
                });
            }
        }
    }
}

async fn handle_connection(state: Arc<DaemonState>, mut stream: TcpStream, shutdown: CancellationToken) -> Result<()> {
    let hello = read_message(&mut stream).await.map_err(|e| Error::internal(format!("hello frame: {e}")))?;
    let request_bytes =
        read_message(&mut stream).await.map_err(|e| Error::internal(format!("request frame: {e}")))?;
    let request: Request =
        decode(&request_bytes).map_err(|e| Error::invalid(format!("malformed request: {e}")))?;

    match request {
        Request::ClaimJob { runner_path } => {
            let caller_token = credential_str(&hello)?;
            let outcome = state.scheduler.claim_job(caller_token, &runner_path, &shutdown).await;
            respond_once(&mut stream, outcome.map(|(job, token)| Response::ClaimJob { job_id: job.id, token })).await
        }
        Request::CreateRunnerSession { runner_path, internal } => {
            let caller_token = credential_str(&hello)?;
            let outcome = create_runner_session(&state, caller_token, &runner_path, internal).await;
            respond_once(&mut stream, outcome).await
        }
        Request::SendRunnerSessionHeartbeat { session_id } => {
            let caller_token = credential_str(&hello)?;
            state.authorizer.authorize_caller(caller_token).await?;
            let outcome = heartbeat(&state, session_id).await;
            respond_once(&mut stream, outcome.map(|()| Response::Ok)).await
        }
        Request::CreateRunnerSessionError { session_id, error } => {
            let caller_token = credential_str(&hello)?;
            state.authorizer.authorize_caller(caller_token).await?;
            let outcome = report_session_error(&state, session_id, error).await;
            respond_once(&mut stream, outcome.map(|()| Response::Ok)).await
        }
        Request::SaveLogs { job_id, start_offset, bytes } => {
            let outcome = save_logs(&state, &hello, job_id, start_offset, bytes).await;
            match outcome {
                Ok(()) => respond_once(&mut stream, Ok(Response::Ok)).await,
                Err(error) if matches!(error, Error::Invalid(_)) => {
                    respond_once(&mut stream, Ok(Response::InvalidOffset)).await
                }
                Err(error) => respond_once(&mut stream, Err(error)).await,
            }
        }
        Request::GetLogs { job_id, start_offset, limit } => {
            let outcome = get_logs(&state, &hello, job_id, start_offset, limit).await;
            respond_once(&mut stream, outcome.map(|bytes| Response::Logs { bytes })).await
        }
        Request::SubscribeCancellation { job_id } => {
            authorize_job_token(&state, &hello, job_id).await?;
            let cancelled = state.scheduler.subscribe_to_cancellation(job_id, &shutdown).await?;
            let event = tharsis_wire::CancellationEvent { job_id, cancelled };
            write_response(&mut stream, &Response::Cancellation(event)).await
        }
        Request::SubscribeLogs { job_id, last_seen_size } => {
            authorize_job_token(&state, &hello, job_id).await?;
            let mut events = state.log_streams.subscribe(job_id, last_seen_size).await?;
            while let Some(event) = events.next().await? {
                let wire_event = tharsis_wire::LogEvent { job_id: event.job_id, action: EventAction::Update, size: event.size };
                if write_response(&mut stream, &Response::Log(wire_event)).await.is_err() {
                    break;
                }
            }
            Ok(())
        }
    }
}

fn credential_str(hello: &[u8]) -> Result<&str> {
    std::str::from_utf8(hello).map_err(|_| Error::unauthorized("malformed caller token"))
}

async fn create_runner_session(
    state: &DaemonState,
    caller_token: &str,
    runner_path: &str,
    _internal: bool,
) -> Result<Response> {
    state.authorizer.authorize_caller(caller_token).await?;
    let runner = state.scheduler.resolve_runner_by_path(runner_path).await?;
    let session = tharsis_core::RunnerSession::new(runner.id, SystemClock.epoch_ms());
    let created = state.store.create_session(session).await?;
    Ok(Response::CreateRunnerSession { session_id: created.id })
}

async fn heartbeat(state: &DaemonState, session_id: tharsis_core::RunnerSessionId) -> Result<()> {
    let mut session = state.store.get_session(session_id).await?.ok_or_else(|| Error::not_found("runner session"))?;
    session.heartbeat(SystemClock.epoch_ms());
    state.store.update_session(session).await?;
    Ok(())
}

async fn report_session_error(
    state: &DaemonState,
    session_id: tharsis_core::RunnerSessionId,
    error: String,
) -> Result<()> {
    let mut session = state.store.get_session(session_id).await?.ok_or_else(|| Error::not_found("runner session"))?;
    session.record_error(error);
    state.store.update_session(session).await?;
    Ok(())
}

/// Verifies the Hello frame as a job token naming `job_id` and checks
/// `UpdateJob` permission for the synthetic job-scoped caller.
async fn authorize_job_token(state: &DaemonState, hello: &[u8], job_id: tharsis_core::JobId) -> Result<()> {
    let claims = verify_job_token(hello, SystemClock.epoch_ms(), state.signer.as_ref()).await?;
    let caller = Caller::new(format!("job:{}", claims.job_id));
    state.log_streams.authorize_append(state.authorizer.as_ref(), &caller, claims.job_id, job_id).await
}

async fn save_logs(
    state: &DaemonState,
    hello: &[u8],
    job_id: tharsis_core::JobId,
    start_offset: u64,
    bytes: Vec<u8>,
) -> Result<()> {
    authorize_job_token(state, hello, job_id).await?;
    let job = state.store.get_job(job_id).await?.ok_or_else(|| Error::not_found("job"))?;
    state.store.save_logs(job.workspace_id, job.run_id, job_id, start_offset, bytes).await?;
    Ok(())
}

async fn get_logs(
    state: &DaemonState,
    hello: &[u8],
    job_id: tharsis_core::JobId,
    start_offset: u64,
    limit: u64,
) -> Result<Vec<u8>> {
    authorize_job_token(state, hello, job_id).await?;
    let job = state.store.get_job(job_id).await?.ok_or_else(|| Error::not_found("job"))?;
    state.store.get_logs(job.workspace_id, job.run_id, job_id, start_offset, limit).await
}

async fn respond_once(stream: &mut TcpStream, outcome: Result<Response>) -> Result<()> {
    let response = outcome.unwrap_or_else(|error| Response::Error { message: error.to_string() });
    write_response(stream, &response).await
}

async fn write_response(stream: &mut TcpStream, response: &Response) -> Result<()> {
    let payload = encode(response).map_err(|e| Error::internal(format!("encode response: {e}")))?;
    write_message(stream, &payload).await.map_err(|e| Error::internal(format!("write response: {e}")))
}

#[cfg(test)]
#[path = "listener_tests.rs"]
mod tests;
