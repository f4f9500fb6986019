// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Startup wiring: builds the in-memory store, event bus, scheduler, and
//! log stream manager, then spawns one `tharsis-agent` loop per
//! `internal_runners` config entry in-process.

use std::sync::Arc;

use tharsis_adapters::executor_from_config;
use tharsis_agent::{AgentConfig, AgentMetrics};
use tharsis_core::SystemClock;
use tharsis_scheduler::{AllowAllAuthorizer, EventBus, LogStreamManager, Scheduler};
use tharsis_storage::MemoryStore;
use tharsis_token::InMemorySigningKeyManager;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config;
use crate::error::DaemonError;
use crate::internal_transport::InternalTransport;

/// Everything the listener and the internal-runner tasks share.
pub struct DaemonState {
    pub store: Arc<MemoryStore>,
    pub scheduler: Arc<Scheduler<SystemClock>>,
    pub log_streams: Arc<LogStreamManager>,
    pub signer: Arc<InMemorySigningKeyManager>,
    pub authorizer: Arc<AllowAllAuthorizer>,
    pub bind_addr: String,
}

impl DaemonState {
    pub fn bootstrap() -> Self {
        let store = Arc::new(MemoryStore::new());
        let bus = Arc::new(EventBus::spawn(store.clone()));
        let signer = Arc::new(InMemorySigningKeyManager::new(config::signing_secret()));
        let authorizer = Arc::new(AllowAllAuthorizer);

        let scheduler = Arc::new(Scheduler::new(
            store.clone(),
            store.clone(),
            store.clone(),
            signer.clone(),
            authorizer.clone(),
            bus.clone(),
            SystemClock,
        ));
        let log_streams = Arc::new(LogStreamManager::new(store.clone(), bus));

        Self { store, scheduler, log_streams, signer, authorizer, bind_addr: config::bind_addr() }
    }
}

/// Spawns one in-process agent loop per configured internal runner.
/// Returns the task handles so the caller can await them at shutdown.
pub async fn spawn_internal_runners(
    state: &DaemonState,
    shutdown: &CancellationToken,
) -> Result<Vec<JoinHandle<()>>, DaemonError> {
    let runners = config::load_internal_runners()?;
    let mut handles = Vec::with_capacity(runners.len());

    for runner_config in runners {
        let executor = executor_from_config(&runner_config.dispatcher_type, &runner_config.dispatcher_data)
            .await
            .map_err(DaemonError::Core)?;
        let shutdown = shutdown.clone();
        let transport = Arc::new(InternalTransport::new(
            state.scheduler.clone(),
            state.store.clone(),
            SystemClock,
            shutdown.clone(),
        ));

        let mut agent_config = AgentConfig::new(runner_config.name.clone(), config::api_url(), config::service_discovery_host());
        agent_config.internal = true;

        let metrics = Arc::new(AgentMetrics::new());
        let runner_name = runner_config.name.clone();
        handles.push(tokio::spawn(async move {
            if let Err(error) = tharsis_agent::run(transport, executor, agent_config, SystemClock, metrics, shutdown).await {
                tracing::error!(runner = %runner_name, %error, "internal runner loop exited with error");
            }
        }));
    }

    Ok(handles)
}
