// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Claim sets for the two bearer tokens the system mints. Neither is
//! persisted — a token is a signed, short-lived capability, not a row.

use crate::job::{JobId, RunId};
use crate::runner::RunnerId;
use crate::workspace::WorkspaceId;
use serde::{Deserialize, Serialize};

/// Claims signed into a Job Token, handed to a worker process so it can
/// call back into the server with a scoped capability for exactly one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobTokenClaims {
    pub job_id: JobId,
    pub run_id: RunId,
    pub workspace_id: WorkspaceId,
    #[serde(rename = "type")]
    pub token_type: String,
    /// Epoch-millisecond expiry: `job.max_duration_minutes + grace`.
    pub expiry_ms: u64,
}

impl JobTokenClaims {
    pub const TOKEN_TYPE: &'static str = "job";

    pub fn new(job_id: JobId, run_id: RunId, workspace_id: WorkspaceId, expiry_ms: u64) -> Self {
        Self { job_id, run_id, workspace_id, token_type: Self::TOKEN_TYPE.to_string(), expiry_ms }
    }
}

/// Claims signed into an Internal Runner Token, cached agent-side and
/// presented on every call the runner agent makes to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalRunnerClaims {
    #[serde(rename = "sub")]
    pub runner_name: String,
    #[serde(rename = "aud")]
    pub audience: String,
    pub runner_id: RunnerId,
    pub expiry_ms: u64,
}

impl InternalRunnerClaims {
    pub const AUDIENCE: &'static str = "internal-runner";

    pub fn new(runner_name: impl Into<String>, runner_id: RunnerId, expiry_ms: u64) -> Self {
        Self {
            runner_name: runner_name.into(),
            audience: Self::AUDIENCE.to_string(),
            runner_id,
            expiry_ms,
        }
    }

    /// Within the 60s safety margin the token issuer re-mints ahead of
    /// actual expiry — see the internal token provider in `tharsis-token`.
    pub fn is_fresh(&self, now_ms: u64, safety_margin_ms: u64) -> bool {
        now_ms + safety_margin_ms < self.expiry_ms
    }
}

#[cfg(test)]
#[path = "token_tests.rs"]
mod tests;
