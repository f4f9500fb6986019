// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runner Session CRUD (part of C2) — the liveness record the agent's
//! heartbeat loop drives.

use async_trait::async_trait;
use tharsis_core::{Result, RunnerSession, RunnerSessionId};

#[async_trait]
pub trait RunnerSessionRepository: Send + Sync {
    async fn create_session(&self, session: RunnerSession) -> Result<RunnerSession>;

    async fn get_session(&self, id: RunnerSessionId) -> Result<Option<RunnerSession>>;

    /// Replaces the stored session wholesale — callers read-modify-write
    /// via [`tharsis_core::RunnerSession::heartbeat`] /
    /// `record_error`, there being no concurrent writer per session.
    async fn update_session(&self, session: RunnerSession) -> Result<RunnerSession>;
}
