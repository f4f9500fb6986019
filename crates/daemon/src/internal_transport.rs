// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! [`AgentTransport`] implemented directly against this process's own
//! [`Scheduler`] and [`RunnerSessionRepository`], for `internal_runners`
//! (§6) — a runner the daemon dispatches for itself rather than waiting
//! for an external agent process to connect over the wire.

use std::sync::Arc;

use async_trait::async_trait;
use tharsis_agent::AgentTransport;
use tharsis_core::{Clock, Error, JobId, Result, RunnerSession, RunnerSessionId};
use tharsis_scheduler::Scheduler;
use tharsis_storage::RunnerSessionRepository;
use tokio_util::sync::CancellationToken;

const INTERNAL_CALLER_TOKEN: &str = "internal-runner";

pub struct InternalTransport<C: Clock + 'static> {
    scheduler: Arc<Scheduler<C>>,
    sessions: Arc<dyn RunnerSessionRepository>,
    clock: C,
    shutdown: CancellationToken,
}

impl<C: Clock + 'static> InternalTransport<C> {
    pub fn new(
        scheduler: Arc<Scheduler<C>>,
        sessions: Arc<dyn RunnerSessionRepository>,
        clock: C,
        shutdown: CancellationToken,
    ) -> Self {
        Self { scheduler, sessions, clock, shutdown }
    }
}

#[async_trait]
impl<C: Clock + 'static> AgentTransport for InternalTransport<C> {
    async fn create_session(&self, runner_path: &str, _internal: bool) -> Result<RunnerSessionId> {
        let runner = self.scheduler.resolve_runner_by_path(runner_path).await?;
        let session = RunnerSession::new(runner.id, self.clock.epoch_ms());
        let created = self.sessions.create_session(session).await?;
        Ok(created.id)
    }

    async fn heartbeat(&self, session_id: RunnerSessionId) -> Result<()> {
        let mut session =
            self.sessions.get_session(session_id).await?.ok_or_else(|| Error::not_found("runner session"))?;
        session.heartbeat(self.clock.epoch_ms());
        self.sessions.update_session(session).await?;
        Ok(())
    }

    async fn report_session_error(&self, session_id: RunnerSessionId, error: String) -> Result<()> {
        let mut session =
            self.sessions.get_session(session_id).await?.ok_or_else(|| Error::not_found("runner session"))?;
        session.record_error(error);
        self.sessions.update_session(session).await?;
        Ok(())
    }

    async fn claim_job(&self, runner_path: &str) -> Result<(JobId, Vec<u8>)> {
        let (job, token) =
            self.scheduler.claim_job(INTERNAL_CALLER_TOKEN, runner_path, &self.shutdown).await?;
        Ok((job.id, token))
    }
}
