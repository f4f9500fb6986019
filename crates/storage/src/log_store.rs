// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Log Store (C3) — append-at-offset blob storage plus the descriptor
//! CRUD that tracks each job's current log size.

use async_trait::async_trait;
use tharsis_core::{JobId, JobLogDescriptor, Result, RunId, WorkspaceId};

/// A byte range requested from the blob backend, mirroring an HTTP
/// `Range` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentRange {
    pub start: u64,
    pub len: u64,
}

/// The underlying object store. Keys follow
/// `workspaces/{ws}/runs/{run}/logs/{job}.txt`.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn download_object(&self, key: &str, range: Option<ContentRange>) -> Result<Vec<u8>>;

    async fn upload_object(&self, key: &str, bytes: Vec<u8>) -> Result<()>;
}

pub fn log_object_key(workspace_id: WorkspaceId, run_id: RunId, job_id: JobId) -> String {
    format!("workspaces/{workspace_id}/runs/{run_id}/logs/{job_id}.txt")
}

#[async_trait]
pub trait LogStore: Send + Sync {
    /// Read-modify-write: fetch the current object (if any), write `buffer`
    /// at `start_offset`, truncate to `start_offset + buffer.len()`,
    /// re-upload, then update (or create) the job's descriptor. Returns
    /// [`tharsis_core::Error::Invalid`] if `start_offset` doesn't land on
    /// the object boundary (0 for a new object, `<= current_size` for an
    /// existing one).
    async fn save_logs(
        &self,
        workspace_id: WorkspaceId,
        run_id: RunId,
        job_id: JobId,
        start_offset: u64,
        buffer: Vec<u8>,
    ) -> Result<JobLogDescriptor>;

    /// Returns bytes in `[start_offset, start_offset + limit)`. An absent
    /// object yields an empty buffer, not an error.
    async fn get_logs(
        &self,
        workspace_id: WorkspaceId,
        run_id: RunId,
        job_id: JobId,
        start_offset: u64,
        limit: u64,
    ) -> Result<Vec<u8>>;
}
