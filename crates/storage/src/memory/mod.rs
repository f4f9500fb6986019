// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory implementation of every repository trait plus the change
//! feed, all backed by a single guarded materialized state.
//!
//! Not a production persistence layer — there is no WAL, no snapshotting,
//! and state does not survive a restart. Durability beyond what §4.3
//! describes is explicitly out of scope.

mod blob;
mod state;

pub use blob::InMemoryBlobStore;

use async_trait::async_trait;
use std::sync::Arc;
use tharsis_core::{
    Error, Event, EventAction, Job, JobId, JobLogDescriptor, Result, Runner, RunnerId,
    RunnerSession, RunnerSessionId, Workspace, WorkspaceId,
};

use crate::change_feed::{ChangeFeedSource, ChangeRecord};
use crate::job::{JobFilter, JobRepository, JobSort};
use crate::job_log::JobLogDescriptorRepository;
use crate::log_store::{log_object_key, BlobStore, LogStore};
use crate::runner::{RunnerFilter, RunnerRepository};
use crate::session::RunnerSessionRepository;
use crate::workspace::WorkspaceRepository;
use state::State;

#[derive(Clone)]
pub struct MemoryStore {
    state: Arc<parking_lot::Mutex<State>>,
    blobs: Arc<InMemoryBlobStore>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self { state: Arc::new(parking_lot::Mutex::new(State::default())), blobs: Arc::new(InMemoryBlobStore::new()) }
    }

    /// Admin-managed insert; runners are never created by the scheduling
    /// core itself. Publishes a `RunnerEvent(create)`.
    pub fn insert_runner(&self, runner: Runner) {
        let mut state = self.state.lock();
        let id = runner.id;
        state.runners.insert(id, runner);
        state.publish(Event::runner(id, EventAction::Create));
    }

    /// Admin-managed insert. Publishes a `WorkspaceEvent(create)`.
    pub fn insert_workspace(&self, workspace: Workspace) {
        let mut state = self.state.lock();
        let id = workspace.id;
        state.workspaces.insert(id, workspace);
        state.publish(Event::workspace(id, EventAction::Create));
    }

    /// Owned by the run service in production; exposed here so tests and
    /// the daemon's run-service shim can flip it and wake blocked claims.
    pub fn set_workspace_locked(&self, id: WorkspaceId, locked: bool) -> Result<()> {
        let mut state = self.state.lock();
        let workspace =
            state.workspaces.get_mut(&id).ok_or_else(|| Error::not_found("workspace"))?;
        workspace.locked = locked;
        state.publish(Event::workspace(id, EventAction::Update));
        Ok(())
    }
}

#[async_trait]
impl JobRepository for MemoryStore {
    async fn create_job(&self, job: Job) -> Result<Job> {
        let mut state = self.state.lock();
        let id = job.id;
        state.jobs.insert(id, job.clone());
        state.publish(Event::job(id, EventAction::Create));
        Ok(job)
    }

    async fn get_job(&self, id: JobId) -> Result<Option<Job>> {
        Ok(self.state.lock().jobs.get(&id).cloned())
    }

    async fn get_jobs(&self, filter: JobFilter, _sort: JobSort) -> Result<Vec<Job>> {
        let state = self.state.lock();
        let mut jobs: Vec<Job> = state.jobs.values().filter(|j| filter.matches(j)).cloned().collect();
        jobs.sort_by_key(|j| j.timestamps.queued_at.unwrap_or(0));
        Ok(jobs)
    }

    async fn update_job(&self, job: &Job) -> Result<Job> {
        let mut state = self.state.lock();
        let current =
            state.jobs.get(&job.id).ok_or_else(|| Error::not_found("job"))?.clone();
        if current.version != job.version {
            return Err(Error::conflict("job version mismatch"));
        }
        let mut updated = job.clone();
        updated.version += 1;
        state.jobs.insert(updated.id, updated.clone());
        state.publish(Event::job(updated.id, EventAction::Update));
        Ok(updated)
    }

    async fn get_job_count_for_runner(&self, runner_id: RunnerId) -> Result<usize> {
        use tharsis_core::JobStatus;
        let state = self.state.lock();
        Ok(state
            .jobs
            .values()
            .filter(|j| {
                j.runner_id == Some(runner_id)
                    && matches!(j.status, JobStatus::Pending | JobStatus::Running)
            })
            .count())
    }
}

#[async_trait]
impl RunnerRepository for MemoryStore {
    async fn get_runner(&self, id: RunnerId) -> Result<Option<Runner>> {
        Ok(self.state.lock().runners.get(&id).cloned())
    }

    async fn get_runners(&self, filter: RunnerFilter) -> Result<Vec<Runner>> {
        let state = self.state.lock();
        Ok(state.runners.values().filter(|r| filter.matches(r)).cloned().collect())
    }
}

#[async_trait]
impl WorkspaceRepository for MemoryStore {
    async fn get_workspace_by_id(&self, id: WorkspaceId) -> Result<Option<Workspace>> {
        Ok(self.state.lock().workspaces.get(&id).cloned())
    }
}

#[async_trait]
impl JobLogDescriptorRepository for MemoryStore {
    async fn get_by_job_id(&self, job_id: JobId) -> Result<Option<JobLogDescriptor>> {
        Ok(self.state.lock().log_descriptors.get(&job_id).copied())
    }

    async fn create(&self, descriptor: JobLogDescriptor) -> Result<JobLogDescriptor> {
        let mut state = self.state.lock();
        state.log_descriptors.insert(descriptor.job_id, descriptor);
        state.publish(Event::job_log(&descriptor, EventAction::Create));
        Ok(descriptor)
    }

    async fn update(&self, descriptor: JobLogDescriptor) -> Result<JobLogDescriptor> {
        let mut state = self.state.lock();
        state.log_descriptors.insert(descriptor.job_id, descriptor);
        state.publish(Event::job_log(&descriptor, EventAction::Update));
        Ok(descriptor)
    }
}

#[async_trait]
impl LogStore for MemoryStore {
    async fn save_logs(
        &self,
        workspace_id: WorkspaceId,
        run_id: tharsis_core::RunId,
        job_id: JobId,
        start_offset: u64,
        buffer: Vec<u8>,
    ) -> Result<JobLogDescriptor> {
        let existing = self.get_by_job_id(job_id).await?;
        let current_size = existing.map(|d| d.size).unwrap_or(0);
        if start_offset > current_size {
            return Err(Error::invalid("start_offset beyond current object size"));
        }

        let key = log_object_key(workspace_id, run_id, job_id);
        let mut object = self.blobs.download_object(&key, None).await.unwrap_or_default();
        object.truncate(start_offset as usize);
        object.extend_from_slice(&buffer);
        let new_size = object.len() as u64;
        self.blobs.upload_object(&key, object).await?;

        let descriptor = JobLogDescriptor { job_id, size: new_size };
        match existing {
            Some(_) => self.update(descriptor).await,
            None => self.create(descriptor).await,
        }
    }

    async fn get_logs(
        &self,
        workspace_id: WorkspaceId,
        run_id: tharsis_core::RunId,
        job_id: JobId,
        start_offset: u64,
        limit: u64,
    ) -> Result<Vec<u8>> {
        let key = log_object_key(workspace_id, run_id, job_id);
        let object = self.blobs.download_object(&key, None).await.unwrap_or_default();
        let start = (start_offset as usize).min(object.len());
        let end = start.saturating_add(limit as usize).min(object.len());
        Ok(object[start..end].to_vec())
    }
}

#[async_trait]
impl RunnerSessionRepository for MemoryStore {
    async fn create_session(&self, session: RunnerSession) -> Result<RunnerSession> {
        let mut state = self.state.lock();
        state.sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn get_session(&self, id: RunnerSessionId) -> Result<Option<RunnerSession>> {
        Ok(self.state.lock().sessions.get(&id).cloned())
    }

    async fn update_session(&self, session: RunnerSession) -> Result<RunnerSession> {
        let mut state = self.state.lock();
        if !state.sessions.contains_key(&session.id) {
            return Err(Error::not_found("runner session"));
        }
        state.sessions.insert(session.id, session.clone());
        Ok(session)
    }
}

#[async_trait]
impl ChangeFeedSource for MemoryStore {
    async fn poll_since(&self, since: u64) -> Result<(Vec<ChangeRecord>, u64)> {
        let state = self.state.lock();
        let records: Vec<ChangeRecord> =
            state.change_log.iter().filter(|r| r.seq > since).cloned().collect();
        let next = records.last().map(|r| r.seq).unwrap_or(since);
        Ok((records, next))
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
