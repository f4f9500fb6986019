// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Log Stream Manager (C8).
//!
//! `SubscribeToJobLogEvents(job, last_seen_size?)` wakes a caller whenever
//! a job's log object grows, so a log viewer never has to poll. A caller
//! reconnecting after a gap (its own restart, a dropped connection) passes
//! back the size it last rendered; if that no longer matches the current
//! descriptor, the first thing it receives is a synthetic event carrying
//! the current size, so it can fetch the delta before following live
//! updates.

use std::sync::Arc;

use tharsis_core::{Error, Event, EventAction, EventKind, JobId, Result};
use tharsis_storage::JobLogDescriptorRepository;

use crate::authorizer::{Authorizer, Caller, Permission};
use crate::event_bus::{EventBus, EventFilter, Subscription};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogEvent {
    pub job_id: JobId,
    pub size: u64,
}

pub struct LogStreamManager {
    descriptors: Arc<dyn JobLogDescriptorRepository>,
    bus: Arc<EventBus>,
}

impl LogStreamManager {
    pub fn new(descriptors: Arc<dyn JobLogDescriptorRepository>, bus: Arc<EventBus>) -> Self {
        Self { descriptors, bus }
    }

    /// `SubscribeToJobLogEvents(job, last_seen_size)` (§4.8).
    pub async fn subscribe(&self, job_id: JobId, last_seen_size: Option<u64>) -> Result<LogEventStream> {
        let current_size = self.current_size(job_id).await?;
        let synthetic = match last_seen_size {
            Some(seen) if seen != current_size => Some(LogEvent { job_id, size: current_size }),
            None if current_size > 0 => Some(LogEvent { job_id, size: current_size }),
            _ => None,
        };

        let sub = self.bus.subscribe(EventFilter::new().any_action(EventKind::JobLog));
        Ok(LogEventStream { job_id, synthetic, sub, descriptors: self.descriptors.clone() })
    }

    /// Authorization for an append-log call (§4.7/§6): the claimant's job
    /// token must name this exact job, and the caller needs update
    /// permission on it.
    pub async fn authorize_append(
        &self,
        authorizer: &dyn Authorizer,
        caller: &Caller,
        token_job_id: JobId,
        job_id: JobId,
    ) -> Result<()> {
        if token_job_id != job_id {
            return Err(Error::forbidden("job token does not name this job"));
        }
        authorizer.require_permission(caller, Permission::UpdateJob, &job_id.to_string()).await
    }

    async fn current_size(&self, job_id: JobId) -> Result<u64> {
        Ok(self.descriptors.get_by_job_id(job_id).await?.map(|d| d.size).unwrap_or(0))
    }
}

/// A live log subscription. Yields a synthetic catch-up event first (if
/// one applies), then forwards the job's own log-growth events.
pub struct LogEventStream {
    job_id: JobId,
    synthetic: Option<LogEvent>,
    sub: Subscription,
    descriptors: Arc<dyn JobLogDescriptorRepository>,
}

impl LogEventStream {
    pub async fn next(&mut self) -> Result<Option<LogEvent>> {
        if let Some(event) = self.synthetic.take() {
            return Ok(Some(event));
        }

        loop {
            let Some(event) = self.sub.recv().await else { return Ok(None) };
            let Event::JobLog { id, action: EventAction::Create | EventAction::Update } = event
            else {
                continue;
            };
            if id != self.job_id {
                continue;
            }
            let size = self.descriptors.get_by_job_id(self.job_id).await?.map(|d| d.size).unwrap_or(0);
            return Ok(Some(LogEvent { job_id: self.job_id, size }));
        }
    }
}

#[cfg(test)]
#[path = "log_stream_tests.rs"]
mod tests;
