// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declared worker endpoints.
//!
//! A runner is created by admin/config and never destroyed implicitly — the
//! scheduler only ever reads runner rows to decide eligibility and
//! precedence. See [`crate::group_path`] for the hierarchy a group runner's
//! `group_path` lives in.

use crate::group_path::GroupPath;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

crate::define_id! {
    /// Unique identifier for a runner.
    pub struct RunnerId("rnr-");
}

/// Shared runners serve the whole tenant; group runners are scoped to a
/// position in the group hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunnerType {
    Shared,
    Group,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Runner {
    pub id: RunnerId,
    pub name: String,
    pub runner_type: RunnerType,
    /// Populated only for `RunnerType::Group`.
    pub group_path: Option<GroupPath>,
    pub tags: BTreeSet<String>,
    pub run_untagged_jobs: bool,
}

impl Runner {
    pub fn shared(name: impl Into<String>) -> Self {
        Self {
            id: RunnerId::new(),
            name: name.into(),
            runner_type: RunnerType::Shared,
            group_path: None,
            tags: BTreeSet::new(),
            run_untagged_jobs: false,
        }
    }

    pub fn group(name: impl Into<String>, group_path: impl Into<GroupPath>) -> Self {
        Self {
            id: RunnerId::new(),
            name: name.into(),
            runner_type: RunnerType::Group,
            group_path: Some(group_path.into()),
            tags: BTreeSet::new(),
            run_untagged_jobs: false,
        }
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_untagged(mut self, run_untagged_jobs: bool) -> Self {
        self.run_untagged_jobs = run_untagged_jobs;
        self
    }

    /// `{group_path}/{name}` for a group runner, bare `{name}` for a shared one.
    pub fn path(&self) -> String {
        match &self.group_path {
            Some(g) if !g.is_root() => format!("{}/{}", g.as_str(), self.name),
            _ => self.name.clone(),
        }
    }

    /// A job's tag-set is admissible on this runner when it is a subset of
    /// the runner's tags, or when the job is untagged and the runner opted
    /// into running untagged jobs.
    pub fn admits_tags(&self, job_tags: &BTreeSet<String>) -> bool {
        if job_tags.is_empty() {
            self.run_untagged_jobs
        } else {
            job_tags.is_subset(&self.tags)
        }
    }
}

crate::builder! {
    pub struct RunnerBuilder => Runner {
        computed {
            id: RunnerId = RunnerId::new(),
        }
        into {
            name: String = "test-runner",
        }
        set {
            runner_type: RunnerType = RunnerType::Shared,
            tags: BTreeSet<String> = BTreeSet::new(),
            run_untagged_jobs: bool = true,
        }
        option {
            group_path: GroupPath = None,
        }
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
