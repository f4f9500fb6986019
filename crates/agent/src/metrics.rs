// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Counters named in §4.6: `claim_count`, `claim_fails`, `launch_fails`,
//! `dispatch_count`, `dispatch_time`. No metrics backend is wired up here
//! — these are plain atomics a caller can snapshot, and `dispatch_time`
//! is additionally logged per-observation so it shows up in structured
//! logs the way a histogram would in a dashboard.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Default)]
pub struct AgentMetrics {
    claim_count: AtomicU64,
    claim_fails: AtomicU64,
    launch_fails: AtomicU64,
    dispatch_count: AtomicU64,
}

impl AgentMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_claim(&self) {
        self.claim_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_claim_fail(&self) {
        self.claim_fails.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_launch_fail(&self) {
        self.launch_fails.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dispatch(&self, duration: Duration) {
        self.dispatch_count.fetch_add(1, Ordering::Relaxed);
        tracing::info!(dispatch_time_ms = duration.as_millis() as u64, "dispatch_time");
    }

    pub fn snapshot(&self) -> AgentMetricsSnapshot {
        AgentMetricsSnapshot {
            claim_count: self.claim_count.load(Ordering::Relaxed),
            claim_fails: self.claim_fails.load(Ordering::Relaxed),
            launch_fails: self.launch_fails.load(Ordering::Relaxed),
            dispatch_count: self.dispatch_count.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AgentMetricsSnapshot {
    pub claim_count: u64,
    pub claim_fails: u64,
    pub launch_fails: u64,
    pub dispatch_count: u64,
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod tests;
