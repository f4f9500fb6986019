// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runner session — a liveness record for an active agent process.

use crate::runner::RunnerId;
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for a runner session.
    pub struct RunnerSessionId("rns-");
}

/// A session is created on agent startup, updated on heartbeats, and
/// considered dead once the heartbeat gap exceeds
/// [`crate::session::HEARTBEAT_DEATH_MULTIPLE`] times the configured
/// heartbeat interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerSession {
    pub id: RunnerSessionId,
    pub runner_id: RunnerId,
    pub last_heartbeat_at_ms: u64,
    pub error: Option<String>,
}

/// A session is dead once the gap since its last heartbeat exceeds this
/// multiple of the configured heartbeat interval (unspecified beyond
/// "heartbeat exists" in the source; pinned here per the design notes).
pub const HEARTBEAT_DEATH_MULTIPLE: u32 = 3;

impl RunnerSession {
    pub fn new(runner_id: RunnerId, now_ms: u64) -> Self {
        Self { id: RunnerSessionId::new(), runner_id, last_heartbeat_at_ms: now_ms, error: None }
    }

    pub fn heartbeat(&mut self, now_ms: u64) {
        self.last_heartbeat_at_ms = now_ms;
        self.error = None;
    }

    pub fn record_error(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
    }

    /// True once `now_ms` is far enough past the last heartbeat that the
    /// session should be considered dead.
    pub fn is_dead(&self, now_ms: u64, heartbeat_interval_ms: u64) -> bool {
        let gap = now_ms.saturating_sub(self.last_heartbeat_at_ms);
        gap > heartbeat_interval_ms.saturating_mul(u64::from(HEARTBEAT_DEATH_MULTIPLE))
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
