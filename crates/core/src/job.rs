// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job identifier and state machine.
//!
//! Lifecycle: created `queued` → claimed `pending` → observed `running` by
//! the worker → terminal `finished` or `cancelled`. Once terminal, a job is
//! immutable — nothing in this crate family mutates a terminal job's status,
//! runner assignment, or timestamps again.

use crate::runner::RunnerId;
use crate::workspace::WorkspaceId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

crate::define_id! {
    /// Unique identifier for a job.
    pub struct JobId("job-");
}

crate::define_id! {
    /// Identifier of the run a job belongs to. Runs own one or more jobs
    /// and their own state machine lives outside this crate family.
    pub struct RunId("run-");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    Plan,
    Apply,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Pending,
    Running,
    Finished,
    Cancelled,
}

crate::simple_display! {
    JobStatus {
        Queued => "queued",
        Pending => "pending",
        Running => "running",
        Finished => "finished",
        Cancelled => "cancelled",
    }
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Finished | JobStatus::Cancelled)
    }
}

/// Epoch-millisecond timestamps for each lifecycle transition a job can
/// reach. Earlier fields are always `Some` once a later one is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobTimestamps {
    pub queued_at: Option<u64>,
    pub pending_at: Option<u64>,
    pub started_at: Option<u64>,
    pub finished_at: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub workspace_id: WorkspaceId,
    pub run_id: RunId,
    pub job_type: JobType,
    pub status: JobStatus,
    pub tags: BTreeSet<String>,
    pub runner_id: Option<RunnerId>,
    pub runner_path: Option<String>,
    pub timestamps: JobTimestamps,
    pub cancel_requested: bool,
    pub max_duration_minutes: u32,
    /// Monotonic optimistic-lock counter. Every successful `UpdateJob` bumps
    /// this by exactly one; a caller whose `version` no longer matches the
    /// stored row gets back [`crate::Error::Conflict`] and must re-read.
    pub version: u64,
}

impl Job {
    pub fn new(
        workspace_id: WorkspaceId,
        run_id: RunId,
        job_type: JobType,
        max_duration_minutes: u32,
        now_ms: u64,
    ) -> Self {
        Self {
            id: JobId::new(),
            workspace_id,
            run_id,
            job_type,
            status: JobStatus::Queued,
            tags: BTreeSet::new(),
            runner_id: None,
            runner_path: None,
            timestamps: JobTimestamps { queued_at: Some(now_ms), ..Default::default() },
            cancel_requested: false,
            max_duration_minutes,
            version: 0,
        }
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Transition `queued` → `pending`, recording the claiming runner. Only
    /// valid from `queued`; callers are expected to have checked that via
    /// `findNextAvailable` before calling this.
    pub fn mark_pending(&mut self, runner_id: RunnerId, runner_path: String, now_ms: u64) {
        debug_assert_eq!(self.status, JobStatus::Queued);
        self.status = JobStatus::Pending;
        self.runner_id = Some(runner_id);
        self.runner_path = Some(runner_path);
        self.timestamps.pending_at = Some(now_ms);
    }

    pub fn mark_running(&mut self, now_ms: u64) {
        self.status = JobStatus::Running;
        self.timestamps.started_at = Some(now_ms);
    }

    pub fn mark_finished(&mut self, now_ms: u64) {
        self.status = JobStatus::Finished;
        self.timestamps.finished_at = Some(now_ms);
    }

    pub fn mark_cancelled(&mut self, now_ms: u64) {
        self.status = JobStatus::Cancelled;
        self.timestamps.finished_at = Some(now_ms);
    }

    pub fn request_cancel(&mut self) {
        self.cancel_requested = true;
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Token expiry per §3/§4.4: job duration plus a fixed grace period.
    pub fn token_expiry_ms(&self, now_ms: u64, grace_ms: u64) -> u64 {
        now_ms + u64::from(self.max_duration_minutes) * 60_000 + grace_ms
    }
}

crate::builder! {
    pub struct JobBuilder => Job {
        computed {
            id: JobId = JobId::new(),
            timestamps: JobTimestamps = JobTimestamps { queued_at: Some(0), ..Default::default() },
            version: u64 = 0,
        }
        set {
            workspace_id: WorkspaceId = WorkspaceId::new(),
            run_id: RunId = RunId::new(),
            job_type: JobType = JobType::Plan,
            status: JobStatus = JobStatus::Queued,
            tags: BTreeSet<String> = BTreeSet::new(),
            cancel_requested: bool = false,
            max_duration_minutes: u32 = 60,
        }
        option {
            runner_id: RunnerId = None,
            runner_path: String = None,
        }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
