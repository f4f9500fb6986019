// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test-only executor that records calls instead of starting a process.

use async_trait::async_trait;
use parking_lot::Mutex;
use tharsis_core::Result;

use crate::executor::{DispatchContext, ExecutorPlugin};

#[derive(Debug, Clone)]
pub struct DispatchCall {
    pub job_id: tharsis_core::JobId,
    pub api_url: String,
}

#[derive(Default)]
pub struct FakeExecutor {
    calls: Mutex<Vec<DispatchCall>>,
    next_id: Mutex<u64>,
    fail_next: Mutex<bool>,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next_dispatch(&self) {
        *self.fail_next.lock() = true;
    }

    pub fn calls(&self) -> Vec<DispatchCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ExecutorPlugin for FakeExecutor {
    async fn dispatch_job(&self, ctx: &DispatchContext) -> Result<String> {
        if std::mem::take(&mut *self.fail_next.lock()) {
            return Err(tharsis_core::Error::internal("fake dispatch failure"));
        }
        self.calls.lock().push(DispatchCall { job_id: ctx.job_id, api_url: ctx.api_url.clone() });
        let mut next_id = self.next_id.lock();
        *next_id += 1;
        Ok(format!("fake-executor-{next_id}"))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
