// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Standalone Runner Agent (C6) binary: connects to a `tharsis-daemon`
//! over the wire protocol and runs the claim-dispatch loop against a
//! single Executor Plugin.

use std::sync::Arc;
use std::time::Duration;

use tharsis_adapters::executor_from_config;
use tharsis_agent::{run, AgentConfig, AgentMetrics, WireTransport};
use tharsis_core::SystemClock;
use tokio_util::sync::CancellationToken;

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn env_duration_secs(name: &str, default: Duration) -> Duration {
    env_var(name).and_then(|v| v.parse::<u64>().ok()).map(Duration::from_secs).unwrap_or(default)
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let Some(daemon_addr) = env_var("THARSIS_DAEMON_ADDR") else {
        tracing::error!("THARSIS_DAEMON_ADDR is required");
        return std::process::ExitCode::FAILURE;
    };
    let Some(runner_path) = env_var("THARSIS_RUNNER_PATH") else {
        tracing::error!("THARSIS_RUNNER_PATH is required");
        return std::process::ExitCode::FAILURE;
    };
    let Some(caller_token) = env_var("THARSIS_CALLER_TOKEN") else {
        tracing::error!("THARSIS_CALLER_TOKEN is required");
        return std::process::ExitCode::FAILURE;
    };
    let Some(dispatcher_type) = env_var("THARSIS_DISPATCHER_TYPE") else {
        tracing::error!("THARSIS_DISPATCHER_TYPE is required");
        return std::process::ExitCode::FAILURE;
    };
    let dispatcher_data: serde_json::Value = match env_var("THARSIS_DISPATCHER_DATA") {
        Some(raw) => match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(error) => {
                tracing::error!(%error, "malformed THARSIS_DISPATCHER_DATA");
                return std::process::ExitCode::FAILURE;
            }
        },
        None => serde_json::json!({}),
    };

    let executor = match executor_from_config(&dispatcher_type, &dispatcher_data).await {
        Ok(executor) => executor,
        Err(error) => {
            tracing::error!(%error, "failed to build executor plugin");
            return std::process::ExitCode::FAILURE;
        }
    };

    let api_url = env_var("THARSIS_API_URL").unwrap_or_else(|| daemon_addr.clone());
    let discovery_protocol_host = env_var("THARSIS_DISCOVERY_PROTOCOL_HOST").unwrap_or_default();

    let mut config = AgentConfig::new(runner_path, api_url, discovery_protocol_host);
    config.internal = env_var("THARSIS_INTERNAL_RUNNER").as_deref() == Some("true");
    config.heartbeat_interval = env_duration_secs("THARSIS_HEARTBEAT_INTERVAL_SECONDS", config.heartbeat_interval);
    config.error_backoff = env_duration_secs("THARSIS_ERROR_BACKOFF_SECONDS", config.error_backoff);

    let call_timeout = env_duration_secs("THARSIS_ASYNC_TASK_TIMEOUT_SECONDS", Duration::from_secs(180));
    let transport = Arc::new(WireTransport::with_timeout(daemon_addr, caller_token, call_timeout));
    let metrics = Arc::new(AgentMetrics::new());
    let shutdown = CancellationToken::new();

    let shutdown_on_signal = shutdown.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        shutdown_on_signal.cancel();
    });

    match run(transport, executor, config, SystemClock, metrics, shutdown).await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "agent exited with error");
            std::process::ExitCode::FAILURE
        }
    }
}
