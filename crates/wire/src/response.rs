// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Serialize};
use tharsis_core::{JobId, RunnerSessionId};

use super::{CancellationEvent, LogEvent};

/// Response payloads. A single `Response` frame answers a single
/// `Request` frame; stream-shaped calls (`SubscribeCancellation`,
/// `SubscribeLogs`) instead answer with a sequence of `CancellationEvent`
/// / `LogEvent` frames terminated by a connection close.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Response {
    Ok,

    ClaimJob { job_id: JobId, token: Vec<u8> },

    CreateRunnerSession { session_id: RunnerSessionId },

    Logs { bytes: Vec<u8> },

    InvalidOffset,

    Cancellation(CancellationEvent),

    Log(LogEvent),

    Error { message: String },
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
