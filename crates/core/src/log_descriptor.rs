// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The tiny metadata row summarizing a job's log object.
//!
//! Exactly one descriptor exists per job, created on first append. Size is
//! monotonically non-decreasing for the job's lifetime except for a single
//! legitimate truncation performed atomically with a write — see the log
//! store's `SaveLogs` contract.

use crate::job::JobId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobLogDescriptor {
    pub job_id: JobId,
    pub size: u64,
}

impl JobLogDescriptor {
    pub fn new(job_id: JobId) -> Self {
        Self { job_id, size: 0 }
    }
}
