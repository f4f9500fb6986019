// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::event::{Event, EventAction};
use crate::job::JobId;
use crate::runner::RunnerId;
use crate::workspace::WorkspaceId;

pub mod strategies {
    use crate::job::JobStatus;
    use proptest::prelude::*;

    pub fn arb_job_status() -> impl Strategy<Value = JobStatus> {
        prop_oneof![
            Just(JobStatus::Queued),
            Just(JobStatus::Pending),
            Just(JobStatus::Running),
            Just(JobStatus::Finished),
            Just(JobStatus::Cancelled),
        ]
    }

    pub fn arb_tags() -> impl Strategy<Value = std::collections::BTreeSet<String>> {
        prop::collection::btree_set("[a-z]{1,8}", 0..4)
    }
}

pub fn job_queued_event(id: JobId) -> Event {
    Event::job(id, EventAction::Create)
}

pub fn job_updated_event(id: JobId) -> Event {
    Event::job(id, EventAction::Update)
}

pub fn runner_updated_event(id: RunnerId) -> Event {
    Event::runner(id, EventAction::Update)
}

pub fn workspace_unlocked_event(id: WorkspaceId) -> Event {
    Event::workspace(id, EventAction::Update)
}
