// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace identifier and the locking primitive the scheduler reads.
//!
//! A workspace is the deployment target a job runs against. Its `locked`
//! flag is the workspace-level mutual-exclusion primitive: while locked, no
//! job for this workspace may leave the `queued` state. Locking itself is
//! owned by the run service (an external collaborator) — the scheduler only
//! ever reads this flag, never sets it.

use crate::group_path::GroupPath;
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for a workspace.
    pub struct WorkspaceId("wks-");
}

/// A deployment target. `full_path` places the workspace in the group
/// hierarchy (e.g. `"a/b/my-workspace"`); its *group* path is `full_path`
/// with the last segment stripped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: WorkspaceId,
    pub full_path: String,
    pub locked: bool,
}

impl Workspace {
    pub fn new(id: WorkspaceId, full_path: impl Into<String>) -> Self {
        Self { id, full_path: full_path.into(), locked: false }
    }

    /// The group path this workspace lives under (its `full_path` minus the
    /// trailing workspace name segment). A top-level workspace's group path
    /// is the root.
    pub fn group_path(&self) -> GroupPath {
        match self.full_path.rsplit_once('/') {
            Some((group, _name)) => GroupPath::new(group),
            None => GroupPath::root(),
        }
    }

    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }
}

crate::builder! {
    pub struct WorkspaceBuilder => Workspace {
        computed {
            id: WorkspaceId = WorkspaceId::new(),
        }
        into {
            full_path: String = "top-level/ws",
        }
        set {
            locked: bool = false,
        }
    }
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;
