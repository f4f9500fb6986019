// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed domain events fed from the store's change feed into the in-process
//! event bus.
//!
//! Four kinds: job, job-log, runner, workspace. Subscribers filter by
//! [`EventKind`] and [`EventAction`] before a cheap id comparison — the bus
//! itself does no per-subscriber filtering beyond kind/action.

use crate::job::JobId;
use crate::log_descriptor::JobLogDescriptor;
use crate::runner::RunnerId;
use crate::workspace::WorkspaceId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    Create,
    Update,
    Delete,
}

/// Discriminant used by subscribers to filter the bus without matching the
/// full [`Event`] payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Job,
    JobLog,
    Runner,
    Workspace,
}

/// Serializes with `{"kind": "...", "action": "...", ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Event {
    Job { id: JobId, action: EventAction },
    JobLog { id: JobId, action: EventAction },
    Runner { id: RunnerId, action: EventAction },
    Workspace { id: WorkspaceId, action: EventAction },
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Job { .. } => EventKind::Job,
            Event::JobLog { .. } => EventKind::JobLog,
            Event::Runner { .. } => EventKind::Runner,
            Event::Workspace { .. } => EventKind::Workspace,
        }
    }

    pub fn action(&self) -> EventAction {
        match self {
            Event::Job { action, .. }
            | Event::JobLog { action, .. }
            | Event::Runner { action, .. }
            | Event::Workspace { action, .. } => *action,
        }
    }

    pub fn job(id: JobId, action: EventAction) -> Self {
        Event::Job { id, action }
    }

    pub fn job_log(descriptor: &JobLogDescriptor, action: EventAction) -> Self {
        Event::JobLog { id: descriptor.job_id, action }
    }

    pub fn runner(id: RunnerId, action: EventAction) -> Self {
        Event::Runner { id, action }
    }

    pub fn workspace(id: WorkspaceId, action: EventAction) -> Self {
        Event::Workspace { id, action }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
