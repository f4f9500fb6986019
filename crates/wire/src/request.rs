// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Requests the agent and worker send to the scheduler daemon.

use serde::{Deserialize, Serialize};
use tharsis_core::{JobId, RunnerSessionId};

/// Request payloads for the two external interfaces in §6: agent-facing
/// (claim/session) and worker-facing (logs/subscriptions).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Request {
    /// Blocks server-side until a job is available for this runner or the
    /// connection is dropped.
    ClaimJob { runner_path: String },

    CreateRunnerSession {
        runner_path: String,
        #[serde(default)]
        internal: bool,
    },

    SendRunnerSessionHeartbeat { session_id: RunnerSessionId },

    CreateRunnerSessionError { session_id: RunnerSessionId, error: String },

    SaveLogs { job_id: JobId, start_offset: u64, bytes: Vec<u8> },

    GetLogs { job_id: JobId, start_offset: u64, limit: u64 },

    SubscribeCancellation { job_id: JobId },

    SubscribeLogs {
        job_id: JobId,
        #[serde(default)]
        last_seen_size: Option<u64>,
    },
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
