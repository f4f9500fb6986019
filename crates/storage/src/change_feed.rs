// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The store's change feed — a monotonic, pollable log of domain events.
//!
//! The event bus (C1) is the only consumer: it polls `poll_since` with
//! exponential backoff (base 1s, cap 30s) on transient errors and
//! republishes records as [`tharsis_core::Event`] to its subscribers.

use async_trait::async_trait;
use tharsis_core::{Event, Result};

/// A single entry in the change feed. `seq` is strictly increasing and has
/// no gaps within one store instance; it is never reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub seq: u64,
    pub event: Event,
}

#[async_trait]
pub trait ChangeFeedSource: Send + Sync {
    /// Return all records with `seq > since`, plus the seq to resume from
    /// on the next call (the highest seq observed, or `since` if nothing
    /// new arrived).
    async fn poll_since(&self, since: u64) -> Result<(Vec<ChangeRecord>, u64)>;
}
