// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runner read side of C2 (runners themselves are admin/config-managed,
//! never mutated by the scheduling core).

use async_trait::async_trait;
use tharsis_core::{GroupPath, Result, Runner, RunnerId};

#[derive(Debug, Clone, Default)]
pub struct RunnerFilter {
    pub name: Option<String>,
    /// Restrict to group runners whose `group_path` falls under one of
    /// these hierarchy paths (ancestor-or-exact match).
    pub namespace_paths: Vec<GroupPath>,
}

impl RunnerFilter {
    pub fn matches(&self, runner: &Runner) -> bool {
        if let Some(name) = &self.name {
            if &runner.name != name {
                return false;
            }
        }
        if !self.namespace_paths.is_empty() {
            let Some(group_path) = &runner.group_path else { return false };
            if !self.namespace_paths.iter().any(|p| p.is_prefix_of(group_path)) {
                return false;
            }
        }
        true
    }
}

#[async_trait]
pub trait RunnerRepository: Send + Sync {
    async fn get_runner(&self, id: RunnerId) -> Result<Option<Runner>>;

    async fn get_runners(&self, filter: RunnerFilter) -> Result<Vec<Runner>>;
}
