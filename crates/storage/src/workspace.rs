// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace read side of C2. Locking is owned by the run service; this
//! repository never mutates `locked`, only reads it.

use async_trait::async_trait;
use tharsis_core::{Result, Workspace, WorkspaceId};

#[async_trait]
pub trait WorkspaceRepository: Send + Sync {
    /// Returns `None` rather than an error when the workspace has been
    /// deleted concurrently — job references may legitimately race with
    /// workspace deletion.
    async fn get_workspace_by_id(&self, id: WorkspaceId) -> Result<Option<Workspace>>;
}
