// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! [`AgentTransport`] implemented over `tharsis-wire`'s framing against a
//! remote `tharsis-daemon`. Opens a fresh connection per call — `ClaimJob`
//! is a long blocking call by design, so pipelining calls on one socket
//! buys nothing here.
//!
//! `ClaimJob` is allowed to block indefinitely (§4.5 — it's released by
//! the daemon on cancellation or by a job becoming available, not by a
//! client-side deadline). Every other call is a short request/response
//! round trip and is bounded by `call_timeout` (`async_task_timeout_seconds`,
//! §6) so a wedged daemon connection can't hang the heartbeat loop or the
//! session-error report forever.

use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;

use tharsis_core::{Error, JobId, Result, RunnerSessionId};
use tharsis_wire::{decode, encode, read_message, write_message, Request, Response};

use crate::transport::AgentTransport;

pub struct WireTransport {
    addr: String,
    caller_token: String,
    call_timeout: Duration,
}

impl WireTransport {
    pub fn new(addr: impl Into<String>, caller_token: impl Into<String>) -> Self {
        Self::with_timeout(addr, caller_token, Duration::from_secs(180))
    }

    pub fn with_timeout(addr: impl Into<String>, caller_token: impl Into<String>, call_timeout: Duration) -> Self {
        Self { addr: addr.into(), caller_token: caller_token.into(), call_timeout }
    }

    /// Wraps [`Self::call_inner`] in `call_timeout`. Not used by `claim_job`,
    /// which blocks by design.
    async fn bounded_call(&self, request: Request) -> Result<Response> {
        tokio::time::timeout(self.call_timeout, self.call_inner(request))
            .await
            .map_err(|_| Error::internal(format!("call timed out after {:?}", self.call_timeout)))?
    }

    async fn call_inner(&self, request: Request) -> Result<Response> {
        let mut stream = TcpStream::connect(&self.addr)
            .await
            .map_err(|e| Error::internal(format!("connect to {}: {e}", self.addr)))?;

        write_message(&mut stream, self.caller_token.as_bytes())
            .await
            .map_err(|e| Error::internal(format!("auth handshake: {e}")))?;

        let payload = encode(&request).map_err(|e| Error::internal(format!("encode request: {e}")))?;
        write_message(&mut stream, &payload).await.map_err(|e| Error::internal(format!("write request: {e}")))?;

        let bytes = read_message(&mut stream).await.map_err(|e| Error::internal(format!("read response: {e}")))?;
        decode(&bytes).map_err(|e| Error::internal(format!("decode response: {e}")))
    }
}

#[async_trait]
impl AgentTransport for WireTransport {
    async fn create_session(&self, runner_path: &str, internal: bool) -> Result<RunnerSessionId> {
        match self.bounded_call(Request::CreateRunnerSession { runner_path: runner_path.to_string(), internal }).await? {
            Response::CreateRunnerSession { session_id } => Ok(session_id),
            Response::Error { message } => Err(Error::internal(message)),
            other => Err(unexpected_response(&other)),
        }
    }

    async fn heartbeat(&self, session_id: RunnerSessionId) -> Result<()> {
        match self.bounded_call(Request::SendRunnerSessionHeartbeat { session_id }).await? {
            Response::Ok => Ok(()),
            Response::Error { message } => Err(Error::internal(message)),
            other => Err(unexpected_response(&other)),
        }
    }

    async fn report_session_error(&self, session_id: RunnerSessionId, error: String) -> Result<()> {
        match self.bounded_call(Request::CreateRunnerSessionError { session_id, error }).await? {
            Response::Ok => Ok(()),
            Response::Error { message } => Err(Error::internal(message)),
            other => Err(unexpected_response(&other)),
        }
    }

    async fn claim_job(&self, runner_path: &str) -> Result<(JobId, Vec<u8>)> {
        match self.call_inner(Request::ClaimJob { runner_path: runner_path.to_string() }).await? {
            Response::ClaimJob { job_id, token } => Ok((job_id, token)),
            Response::Error { message } => Err(Error::internal(message)),
            other => Err(unexpected_response(&other)),
        }
    }
}

fn unexpected_response(response: &Response) -> Error {
    Error::internal(format!("unexpected response: {response:?}"))
}
