// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local container daemon backend — starts a container using the host
//! Docker daemon. Shells out to the `docker` CLI rather than linking a
//! client library, matching how container lifecycle is driven elsewhere
//! in this codebase.

use async_trait::async_trait;
use tharsis_core::{Error, Result};

use crate::executor::{DispatchContext, ExecutorPlugin};

/// Runs `docker run -d <image>` with the dispatch context passed as `-e`
/// flags. The executor id is the container name.
pub struct DockerExecutor {
    image: String,
}

impl DockerExecutor {
    pub fn new(image: impl Into<String>) -> Self {
        Self { image: image.into() }
    }
}

#[async_trait]
impl ExecutorPlugin for DockerExecutor {
    async fn dispatch_job(&self, ctx: &DispatchContext) -> Result<String> {
        let container_name = format!("tharsis-job-{}", ctx.job_id);

        let mut args: Vec<String> = vec![
            "run".to_string(),
            "-d".to_string(),
            "--rm".to_string(),
            "--name".to_string(),
            container_name.clone(),
        ];
        for (key, value) in ctx.env_pairs() {
            args.push("-e".to_string());
            args.push(format!("{key}={value}"));
        }
        args.push(self.image.clone());

        run_docker(&args).await.map_err(|reason| {
            Error::internal(format!("docker run failed for job {}: {reason}", ctx.job_id))
        })?;

        tracing::info!(%container_name, job_id = %ctx.job_id, "dispatched docker worker");
        Ok(container_name)
    }
}

async fn run_docker(args: &[String]) -> std::result::Result<String, String> {
    let output = tokio::process::Command::new("docker")
        .args(args)
        .output()
        .await
        .map_err(|e| format!("failed to exec docker: {e}"))?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        Err(String::from_utf8_lossy(&output.stderr).trim().to_string())
    }
}

#[cfg(test)]
#[path = "docker_tests.rs"]
mod tests;
