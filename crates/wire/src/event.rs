// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stream item payloads for the two subscription interfaces exposed to
//! workers.

use serde::{Deserialize, Serialize};
use tharsis_core::{EventAction, JobId};

/// Emitted by `SubscribeCancellation` once `cancel_requested` is observed
/// true; the stream closes immediately afterward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancellationEvent {
    pub job_id: JobId,
    pub cancelled: bool,
}

/// Emitted by `SubscribeLogs` on every observed size change for the
/// subject job's log descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEvent {
    pub job_id: JobId,
    pub action: EventAction,
    pub size: u64,
}
