// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runner Agent (C6) lifecycle: session establishment, a heartbeat task
//! tolerant of a few consecutive failures, and the claim-dispatch loop
//! itself (§4.6).

use std::sync::Arc;
use std::time::Duration;

use tharsis_adapters::{DispatchContext, ExecutorPlugin};
use tharsis_core::{Clock, Error, Result};
use tokio_util::sync::CancellationToken;

use crate::metrics::AgentMetrics;
use crate::transport::AgentTransport;

/// Tolerate this many consecutive heartbeat failures before exiting the
/// session (§4.6's N=3, the same multiple `core::session` keys liveness
/// off of).
const HEARTBEAT_FAILURE_TOLERANCE: u32 = tharsis_core::session::HEARTBEAT_DEATH_MULTIPLE;

#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub runner_path: String,
    pub internal: bool,
    pub api_url: String,
    pub discovery_protocol_host: String,
    pub heartbeat_interval: Duration,
    pub error_backoff: Duration,
    pub poll_interval: Duration,
}

impl AgentConfig {
    pub fn new(runner_path: impl Into<String>, api_url: impl Into<String>, discovery_protocol_host: impl Into<String>) -> Self {
        Self {
            runner_path: runner_path.into(),
            internal: false,
            api_url: api_url.into(),
            discovery_protocol_host: discovery_protocol_host.into(),
            heartbeat_interval: Duration::from_secs(30),
            error_backoff: Duration::from_secs(30),
            poll_interval: Duration::from_secs(1),
        }
    }
}

/// Runs the agent lifecycle to completion: creates a session, spawns its
/// heartbeat task, then claims and dispatches jobs until `shutdown` is
/// cancelled or the session is declared dead.
pub async fn run<C: Clock>(
    transport: Arc<dyn AgentTransport>,
    executor: Arc<dyn ExecutorPlugin>,
    config: AgentConfig,
    clock: C,
    metrics: Arc<AgentMetrics>,
    shutdown: CancellationToken,
) -> Result<()> {
    let session_id = transport.create_session(&config.runner_path, config.internal).await?;
    tracing::info!(runner_path = %config.runner_path, %session_id, "runner session established");

    let heartbeat_task = tokio::spawn(heartbeat_loop(
        transport.clone(),
        session_id,
        config.heartbeat_interval,
        shutdown.clone(),
    ));

    let result = claim_dispatch_loop(&transport, &executor, &config, &clock, &metrics, session_id, &shutdown).await;

    shutdown.cancel();
    let _ = heartbeat_task.await;
    result
}

async fn heartbeat_loop(
    transport: Arc<dyn AgentTransport>,
    session_id: tharsis_core::RunnerSessionId,
    interval: Duration,
    shutdown: CancellationToken,
) {
    let mut consecutive_failures = 0u32;
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => return,
            _ = tokio::time::sleep(interval) => {}
        }

        match transport.heartbeat(session_id).await {
            Ok(()) => consecutive_failures = 0,
            Err(error) => {
                consecutive_failures += 1;
                tracing::warn!(%error, consecutive_failures, "heartbeat failed");
                if consecutive_failures >= HEARTBEAT_FAILURE_TOLERANCE {
                    tracing::error!(%session_id, "exiting session after repeated heartbeat failures");
                    shutdown.cancel();
                    return;
                }
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn claim_dispatch_loop<C: Clock>(
    transport: &Arc<dyn AgentTransport>,
    executor: &Arc<dyn ExecutorPlugin>,
    config: &AgentConfig,
    clock: &C,
    metrics: &Arc<AgentMetrics>,
    session_id: tharsis_core::RunnerSessionId,
    shutdown: &CancellationToken,
) -> Result<()> {
    loop {
        if shutdown.is_cancelled() {
            return Ok(());
        }

        let claimed = tokio::select! {
            _ = shutdown.cancelled() => return Ok(()),
            claimed = transport.claim_job(&config.runner_path) => claimed,
        };

        match claimed {
            Ok((job_id, token)) => {
                metrics.record_claim();
                let start = clock.now();
                let ctx = DispatchContext::new(
                    job_id,
                    token,
                    config.api_url.clone(),
                    config.discovery_protocol_host.clone(),
                );
                match executor.dispatch_job(&ctx).await {
                    Ok(executor_id) => {
                        tracing::info!(%job_id, %executor_id, "dispatched job");
                        metrics.record_dispatch(clock.now().saturating_duration_since(start));
                    }
                    Err(error) => {
                        metrics.record_launch_fail();
                        tracing::warn!(%job_id, %error, "dispatch failed");
                        let _ = transport.report_session_error(session_id, error.to_string()).await;
                    }
                }
                tokio::select! {
                    _ = shutdown.cancelled() => return Ok(()),
                    _ = tokio::time::sleep(config.poll_interval) => {}
                }
            }
            Err(error) if error.is_cancelled() => return Ok(()),
            Err(error) => {
                metrics.record_claim_fail();
                tracing::warn!(%error, "claim failed");
                let _ = transport.report_session_error(session_id, error.to_string()).await;
                tokio::select! {
                    _ = shutdown.cancelled() => return Ok(()),
                    _ = tokio::time::sleep(config.error_backoff) => {}
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "loop_tests.rs"]
mod tests;
