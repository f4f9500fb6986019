// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job Repository (C2).

use async_trait::async_trait;
use std::collections::BTreeSet;
use tharsis_core::{Job, JobId, JobStatus, Result, RunnerId, WorkspaceId};

/// `GetJobs` selection predicate. A `None` field means "don't filter on
/// this dimension".
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub status: Option<JobStatus>,
    pub runner_id: Option<RunnerId>,
    pub workspace_id: Option<WorkspaceId>,
    /// Only jobs whose tags are a subset of this set match, plus — unless
    /// `exclude_untagged` is set — jobs with no tags at all.
    pub tag_superset: Option<BTreeSet<String>>,
    pub exclude_untagged: bool,
}

impl JobFilter {
    pub fn matches(&self, job: &Job) -> bool {
        if let Some(status) = self.status {
            if job.status != status {
                return false;
            }
        }
        if let Some(runner_id) = self.runner_id {
            if job.runner_id != Some(runner_id) {
                return false;
            }
        }
        if let Some(workspace_id) = self.workspace_id {
            if job.workspace_id != workspace_id {
                return false;
            }
        }
        if let Some(superset) = &self.tag_superset {
            let admissible = job.tags.is_subset(superset)
                || (!self.exclude_untagged && job.tags.is_empty());
            if !admissible {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobSort {
    #[default]
    CreatedAtAscending,
}

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn create_job(&self, job: Job) -> Result<Job>;

    async fn get_job(&self, id: JobId) -> Result<Option<Job>>;

    /// Required sort is `created_at ascending` for scheduling fairness;
    /// [`JobSort`] exists for forward compatibility with other orderings.
    async fn get_jobs(&self, filter: JobFilter, sort: JobSort) -> Result<Vec<Job>>;

    /// Compare-and-swap on `job.version`. Returns [`tharsis_core::Error::Conflict`]
    /// if the stored row's version no longer matches `job.version`.
    async fn update_job(&self, job: &Job) -> Result<Job>;

    /// Count of jobs assigned to `runner_id` in `pending` or `running`.
    async fn get_job_count_for_runner(&self, runner_id: RunnerId) -> Result<usize>;
}
