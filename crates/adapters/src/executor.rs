// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `ExecutorPlugin` trait every backend implements.

use async_trait::async_trait;
use tharsis_core::{JobId, Result};

/// Everything a backend needs to start a worker process. The worker reads
/// these back out as environment variables (`JOB_ID`, `JOB_TOKEN`,
/// `API_URL`, `DISCOVERY_PROTOCOL_HOST`).
#[derive(Debug, Clone)]
pub struct DispatchContext {
    pub job_id: JobId,
    pub token: Vec<u8>,
    pub api_url: String,
    pub discovery_protocol_host: String,
}

impl DispatchContext {
    pub fn new(
        job_id: JobId,
        token: Vec<u8>,
        api_url: impl Into<String>,
        discovery_protocol_host: impl Into<String>,
    ) -> Self {
        Self { job_id, token, api_url: api_url.into(), discovery_protocol_host: discovery_protocol_host.into() }
    }

    /// The env set handed to the worker, in the order the spec names them.
    ///
    /// Tokens are minted as JSON (see `tharsis-token`), so the bytes are
    /// already a well-formed UTF-8 string safe to carry as an env value.
    pub fn env_pairs(&self) -> Vec<(String, String)> {
        vec![
            ("JOB_ID".to_string(), self.job_id.to_string()),
            ("JOB_TOKEN".to_string(), String::from_utf8_lossy(&self.token).into_owned()),
            ("API_URL".to_string(), self.api_url.clone()),
            ("DISCOVERY_PROTOCOL_HOST".to_string(), self.discovery_protocol_host.clone()),
        ]
    }
}

/// Uniform `DispatchJob(ctx, job_id, token) -> executor_id` across backends.
#[async_trait]
pub trait ExecutorPlugin: Send + Sync + 'static {
    /// Start a worker process carrying `ctx`. Returns an opaque id
    /// (task ARN, pod name, PID) used only in logs.
    async fn dispatch_job(&self, ctx: &DispatchContext) -> Result<String>;
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
