// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::{HashMap, VecDeque};
use tharsis_core::{
    Event, Job, JobId, JobLogDescriptor, Runner, RunnerId, RunnerSession, RunnerSessionId,
    Workspace, WorkspaceId,
};

use crate::change_feed::ChangeRecord;

/// Caps the in-memory change log so a long-idle process doesn't grow it
/// without bound; the event bus is expected to poll far more often than
/// this would ever fill.
const MAX_CHANGE_LOG_LEN: usize = 10_000;

#[derive(Default)]
pub(super) struct State {
    pub(super) jobs: HashMap<JobId, Job>,
    pub(super) runners: HashMap<RunnerId, Runner>,
    pub(super) workspaces: HashMap<WorkspaceId, Workspace>,
    pub(super) log_descriptors: HashMap<JobId, JobLogDescriptor>,
    pub(super) sessions: HashMap<RunnerSessionId, RunnerSession>,
    pub(super) change_log: VecDeque<ChangeRecord>,
    next_seq: u64,
}

impl State {
    pub(super) fn publish(&mut self, event: Event) {
        self.next_seq += 1;
        self.change_log.push_back(ChangeRecord { seq: self.next_seq, event });
        while self.change_log.len() > MAX_CHANGE_LOG_LEN {
            self.change_log.pop_front();
        }
    }
}
