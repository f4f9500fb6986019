// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tharsisd`: the scheduler daemon binary.

use std::sync::Arc;

use tharsis_daemon::{config, lifecycle, listener, DaemonState};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let state = Arc::new(DaemonState::bootstrap());
    let shutdown = CancellationToken::new();

    let internal_runner_tasks = match lifecycle::spawn_internal_runners(&state, &shutdown).await {
        Ok(tasks) => tasks,
        Err(error) => {
            tracing::error!(%error, "failed to start internal runners");
            return std::process::ExitCode::FAILURE;
        }
    };

    let listener_shutdown = shutdown.clone();
    let listener_state = state.clone();
    let listener_task = tokio::spawn(async move { listener::run(listener_state, listener_shutdown).await });

    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("shutdown signal received");
        signal_shutdown.cancel();
    });

    let listener_result = listener_task.await;
    for task in internal_runner_tasks {
        let _ = tokio::time::timeout(config::drain_timeout(), task).await;
    }

    match listener_result {
        Ok(Ok(())) => std::process::ExitCode::SUCCESS,
        Ok(Err(error)) => {
            tracing::error!(%error, "listener exited with error");
            std::process::ExitCode::FAILURE
        }
        Err(error) => {
            tracing::error!(%error, "listener task panicked");
            std::process::ExitCode::FAILURE
        }
    }
}

