// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local process backend — forks a subprocess with the dispatch env set.

use async_trait::async_trait;
use tharsis_core::{Error, Result};

use crate::executor::{DispatchContext, ExecutorPlugin};

/// Forks `command` as a detached subprocess, carrying the dispatch
/// context as environment variables. The executor id is the OS PID.
pub struct ProcessExecutor {
    command: String,
    args: Vec<String>,
}

impl ProcessExecutor {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self { command: command.into(), args }
    }
}

#[async_trait]
impl ExecutorPlugin for ProcessExecutor {
    async fn dispatch_job(&self, ctx: &DispatchContext) -> Result<String> {
        let mut cmd = tokio::process::Command::new(&self.command);
        cmd.args(&self.args);
        for (key, value) in ctx.env_pairs() {
            cmd.env(key, value);
        }
        cmd.stdin(std::process::Stdio::null());
        cmd.stdout(std::process::Stdio::null());
        cmd.stderr(std::process::Stdio::null());

        let child = cmd.spawn().map_err(|e| {
            Error::internal(format!("failed to spawn worker process: {e}"))
        })?;

        let pid = child.id().ok_or_else(|| Error::internal("spawned process has no pid"))?;
        tracing::info!(%pid, job_id = %ctx.job_id, "dispatched local process worker");

        // The worker outlives this call — the agent does not wait on it.
        // Reap it in the background so the kernel doesn't accumulate zombies.
        tokio::spawn(async move {
            let mut child = child;
            let _ = child.wait().await;
        });

        Ok(pid.to_string())
    }
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
