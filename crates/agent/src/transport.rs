// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The server-facing half of the agent: everything the claim-dispatch
//! loop needs from the scheduler daemon, independent of how the call
//! actually reaches it.
//!
//! [`crate::wire_transport::WireTransport`] implements this over the wire
//! protocol for the standalone agent binary; `tharsis-daemon` implements
//! it in-process for runners it starts itself (`internal_runners`).

use async_trait::async_trait;
use tharsis_core::{JobId, Result, RunnerSessionId};

#[async_trait]
pub trait AgentTransport: Send + Sync {
    async fn create_session(&self, runner_path: &str, internal: bool) -> Result<RunnerSessionId>;

    async fn heartbeat(&self, session_id: RunnerSessionId) -> Result<()>;

    async fn report_session_error(&self, session_id: RunnerSessionId, error: String) -> Result<()>;

    /// Blocks until a job is available for this runner path, or the call
    /// is cancelled (`Error::ContextCancelled`).
    async fn claim_job(&self, runner_path: &str) -> Result<(JobId, Vec<u8>)>;
}
