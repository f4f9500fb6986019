// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler (C5) — the job-claim selection loop.
//!
//! `ClaimJob` is the one operation a runner agent calls in a tight poll
//! loop, so the whole point of this module is to make the "nothing to
//! claim" case cheap: rather than busy-poll the store, a caller blocks on
//! the event bus between selection attempts and only re-scans when
//! something that could have changed availability actually happened.

use std::sync::Arc;

use tharsis_core::{
    Clock, Error, EventAction, EventKind, Job, JobId, JobStatus, Result, Runner, RunnerPath,
    RunnerType, Workspace,
};
use tharsis_storage::{JobFilter, JobRepository, JobSort, RunnerFilter, RunnerRepository, WorkspaceRepository};
use tharsis_token::{issue_job_token, SigningKeyManager};
use tokio_util::sync::CancellationToken;

use crate::authorizer::{Authorizer, Permission};
use crate::event_bus::{EventBus, EventFilter};

/// Cap on jobs simultaneously assigned (`pending` or `running`) to a
/// single runner, per §4.5.
pub const MAX_JOBS_PER_RUNNER: usize = 100;

pub struct Scheduler<C: Clock> {
    jobs: Arc<dyn JobRepository>,
    runners: Arc<dyn RunnerRepository>,
    workspaces: Arc<dyn WorkspaceRepository>,
    signer: Arc<dyn SigningKeyManager>,
    authorizer: Arc<dyn Authorizer>,
    bus: Arc<EventBus>,
    clock: C,
}

impl<C: Clock> Scheduler<C> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        jobs: Arc<dyn JobRepository>,
        runners: Arc<dyn RunnerRepository>,
        workspaces: Arc<dyn WorkspaceRepository>,
        signer: Arc<dyn SigningKeyManager>,
        authorizer: Arc<dyn Authorizer>,
        bus: Arc<EventBus>,
        clock: C,
    ) -> Self {
        Self { jobs, runners, workspaces, signer, authorizer, bus, clock }
    }

    /// `ClaimJob(caller, runner_path)` (§4.5). Blocks until a job is
    /// claimed, the event bus itself gives up (its feed task died), or
    /// `cancel` fires — in which case this returns
    /// `Error::ContextCancelled` without side effects.
    pub async fn claim_job(&self, caller_token: &str, runner_path: &str, cancel: &CancellationToken) -> Result<(Job, Vec<u8>)> {
        let path = RunnerPath::parse(runner_path);
        let runner = self.resolve_runner(&path).await?;

        let caller = self.authorizer.authorize_caller(caller_token).await?;
        self.authorizer.require_permission(&caller, Permission::ClaimJob, &runner.path()).await?;

        // Subscribe before the first scan: a job or workspace change that
        // lands between "scan found nothing" and "start waiting" must
        // still be observed, not missed.
        let mut sub = self.bus.subscribe(
            EventFilter::new()
                .any_action(EventKind::Job)
                .any_action(EventKind::Runner)
                .any_action(EventKind::Workspace),
        );

        loop {
            if cancel.is_cancelled() {
                return Err(Error::ContextCancelled);
            }
            if let Some(job) = self.find_next_available(&runner).await? {
                match self.try_claim(&runner, job).await? {
                    Some((saved, token)) => {
                        tracing::info!(
                            runner_path = %runner.path(),
                            job_id = %saved.id,
                            "claimed job"
                        );
                        return Ok((saved, token));
                    }
                    // Lost the CAS race to another claimant; rescan
                    // immediately rather than surfacing the conflict.
                    None => continue,
                }
            }
            tokio::select! {
                _ = cancel.cancelled() => return Err(Error::ContextCancelled),
                received = sub.recv() => {
                    if received.is_none() {
                        return Err(Error::internal("event bus feed stopped"));
                    }
                }
            }
        }
    }

    /// `SubscribeToCancellationEvent(job)` (§4.5). Resolves the job's
    /// current `cancel_requested` state, then follows update events until
    /// cancellation is observed, the job leaves the non-terminal window
    /// another way, or `cancel` fires (in which case this returns
    /// `Error::ContextCancelled` without side effects).
    pub async fn subscribe_to_cancellation(&self, job_id: JobId, cancel: &CancellationToken) -> Result<bool> {
        let job = self.jobs.get_job(job_id).await?.ok_or_else(|| Error::not_found("job"))?;
        if job.cancel_requested {
            return Ok(true);
        }
        if job.is_terminal() {
            return Ok(false);
        }

        let mut sub =
            self.bus.subscribe(EventFilter::new().with_action(EventKind::Job, EventAction::Update));
        loop {
            tokio::select! {
                _ = cancel.cancelled() => return Err(Error::ContextCancelled),
                received = sub.recv() => {
                    if received.is_none() {
                        return Ok(false);
                    }
                }
            }
            let Some(job) = self.jobs.get_job(job_id).await? else { return Ok(false) };
            if job.cancel_requested {
                return Ok(true);
            }
            if job.is_terminal() {
                return Ok(false);
            }
        }
    }

    /// Resolves a `runner_path` to its declared [`Runner`] row. Exposed for
    /// the listener's `CreateRunnerSession` handling, which needs the
    /// runner's id before a session can be opened for it.
    pub async fn resolve_runner_by_path(&self, runner_path: &str) -> Result<Runner> {
        self.resolve_runner(&RunnerPath::parse(runner_path)).await
    }

    async fn resolve_runner(&self, path: &RunnerPath) -> Result<Runner> {
        let filter = RunnerFilter { name: Some(path.name.clone()), namespace_paths: vec![] };
        let candidates = self.runners.get_runners(filter).await?;
        let runner = match &path.group_path {
            Some(group_path) => {
                candidates.into_iter().find(|r| r.group_path.as_ref() == Some(group_path))
            }
            None => candidates.into_iter().find(|r| r.runner_type == RunnerType::Shared),
        };
        runner.ok_or_else(|| Error::not_found(format!("runner '{}'", path.name)))
    }

    /// `findNextAvailable(runner)` (§4.5): tag-admissible queued jobs, in
    /// creation order, filtered by workspace lock state and group-hierarchy
    /// precedence, capped by the runner's current assignment count.
    async fn find_next_available(&self, runner: &Runner) -> Result<Option<Job>> {
        if self.jobs.get_job_count_for_runner(runner.id).await? >= MAX_JOBS_PER_RUNNER {
            return Ok(None);
        }

        let filter = JobFilter {
            status: Some(JobStatus::Queued),
            tag_superset: Some(runner.tags.clone()),
            exclude_untagged: !runner.run_untagged_jobs,
            ..Default::default()
        };
        let candidates = self.jobs.get_jobs(filter, JobSort::CreatedAtAscending).await?;

        for job in candidates {
            let Some(workspace) = self.workspaces.get_workspace_by_id(job.workspace_id).await?
            else {
                continue;
            };
            if workspace.locked {
                continue;
            }
            if self.has_precedence(runner, &job, &workspace).await? {
                return Ok(Some(job));
            }
        }
        Ok(None)
    }

    /// A shared runner only has precedence when no tag-admissible group
    /// runner sits at or above the workspace's group. A group runner has
    /// precedence at its own path, or at any strict ancestor as long as no
    /// tag-admissible group runner sits strictly between it and the
    /// workspace (the closer runner always wins).
    async fn has_precedence(&self, runner: &Runner, job: &Job, workspace: &Workspace) -> Result<bool> {
        let ws_group = workspace.group_path();
        let all_runners = self.runners.get_runners(RunnerFilter::default()).await?;
        let ancestor_group_runners: Vec<&Runner> = all_runners
            .iter()
            .filter(|r| r.runner_type == RunnerType::Group && r.admits_tags(&job.tags))
            .filter(|r| r.group_path.as_ref().is_some_and(|g| g.is_prefix_of(&ws_group)))
            .collect();

        match runner.runner_type {
            RunnerType::Shared => Ok(ancestor_group_runners.is_empty()),
            RunnerType::Group => {
                let Some(group_path) = &runner.group_path else {
                    return Ok(false);
                };
                if *group_path == ws_group {
                    return Ok(true);
                }
                if !group_path.is_strict_prefix_of(&ws_group) {
                    return Ok(false);
                }
                let blocked = ancestor_group_runners.iter().any(|candidate| {
                    candidate.id != runner.id
                        && candidate
                            .group_path
                            .as_ref()
                            .is_some_and(|c| group_path.is_strictly_between(c, &ws_group))
                });
                Ok(!blocked)
            }
        }
    }

    /// Attempts the `queued` → `pending` transition via CAS. `Ok(None)`
    /// means another claimant won the race; the caller rescans.
    async fn try_claim(&self, runner: &Runner, job: Job) -> Result<Option<(Job, Vec<u8>)>> {
        let now = self.clock.epoch_ms();
        let mut updated = job;
        updated.mark_pending(runner.id, runner.path(), now);

        match self.jobs.update_job(&updated).await {
            Ok(saved) => {
                let token = issue_job_token(&saved, now, self.signer.as_ref()).await?;
                Ok(Some((saved, token)))
            }
            Err(error) if error.is_conflict() => Ok(None),
            Err(error) => Err(error),
        }
    }
}

#[cfg(test)]
#[path = "claim_tests.rs"]
mod tests;
