// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Builds an [`ExecutorPlugin`] from the `dispatcher_type`/`dispatcher_data`
//! pair a runner is registered with (`internal_runners`, §6).

use std::sync::Arc;

use serde::Deserialize;
use tharsis_core::{Error, Result};

use crate::cluster::ClusterExecutor;
use crate::docker::DockerExecutor;
use crate::executor::ExecutorPlugin;
use crate::process::ProcessExecutor;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
struct ProcessData {
    command: String,
    #[serde(default)]
    args: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
struct DockerData {
    image: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
struct ClusterData {
    namespace: String,
    image: String,
}

/// `dispatcher_type` is one of `"process"`, `"docker"`, `"cluster"`;
/// `dispatcher_data` is the backend-specific config, deserialized from the
/// same JSON value the daemon loaded from its `internal_runners` config.
pub async fn executor_from_config(
    dispatcher_type: &str,
    dispatcher_data: &serde_json::Value,
) -> Result<Arc<dyn ExecutorPlugin>> {
    match dispatcher_type {
        "process" => {
            let data: ProcessData = serde_json::from_value(dispatcher_data.clone())
                .map_err(|e| Error::invalid(format!("invalid process dispatcher_data: {e}")))?;
            Ok(Arc::new(ProcessExecutor::new(data.command, data.args)))
        }
        "docker" => {
            let data: DockerData = serde_json::from_value(dispatcher_data.clone())
                .map_err(|e| Error::invalid(format!("invalid docker dispatcher_data: {e}")))?;
            Ok(Arc::new(DockerExecutor::new(data.image)))
        }
        "cluster" => {
            let data: ClusterData = serde_json::from_value(dispatcher_data.clone())
                .map_err(|e| Error::invalid(format!("invalid cluster dispatcher_data: {e}")))?;
            Ok(Arc::new(ClusterExecutor::new(data.namespace, data.image).await?))
        }
        other => Err(Error::invalid(format!("unknown dispatcher_type: {other}"))),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
