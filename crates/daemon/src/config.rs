// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment/config access for the daemon crate, mirroring
//! how the rest of this family keeps its env lookups in one place rather
//! than scattered through the binary.

use std::time::Duration;

use serde::Deserialize;

use crate::error::DaemonError;

/// One entry of `internal_runners` (§6): a runner the daemon dispatches
/// for itself, in-process, rather than waiting for an external agent
/// process to connect.
#[derive(Debug, Clone, Deserialize)]
pub struct InternalRunnerConfig {
    pub name: String,
    pub dispatcher_type: String,
    #[serde(default)]
    pub dispatcher_data: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct InternalRunnersFile {
    #[serde(default)]
    internal_runners: Vec<InternalRunnerConfig>,
}

/// Bind address the TCP listener accepts agent/worker connections on.
pub fn bind_addr() -> String {
    std::env::var("THARSIS_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:7777".to_string())
}

/// Shared secret the `InMemorySigningKeyManager` signs job/internal
/// tokens with. Production deployments plug in a KMS-backed manager
/// instead (see `tharsis-token`); this is the single-process default.
pub fn signing_secret() -> Vec<u8> {
    std::env::var("THARSIS_SIGNING_SECRET").unwrap_or_else(|_| "dev-only-secret".to_string()).into_bytes()
}

/// `service_discovery_host` (§6): propagated to workers as
/// `DISCOVERY_PROTOCOL_HOST`.
pub fn service_discovery_host() -> String {
    std::env::var("THARSIS_SERVICE_DISCOVERY_HOST").unwrap_or_default()
}

/// `api_url` (§6): propagated to workers as `API_URL`.
pub fn api_url() -> String {
    std::env::var("THARSIS_API_URL").unwrap_or_else(|_| format!("http://{}", bind_addr()))
}

/// Graceful-shutdown drain timeout, mirroring the teacher's
/// `OJ_DRAIN_TIMEOUT_MS` default of 5s.
pub fn drain_timeout() -> Duration {
    std::env::var("THARSIS_DRAIN_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(5))
}

/// Loads `internal_runners` from the TOML file at
/// `THARSIS_INTERNAL_RUNNERS_PATH`, if set. Its shape is a list of
/// `{name, dispatcher_type, dispatcher_data}` tables.
pub fn load_internal_runners() -> Result<Vec<InternalRunnerConfig>, DaemonError> {
    let Ok(path) = std::env::var("THARSIS_INTERNAL_RUNNERS_PATH") else {
        return Ok(Vec::new());
    };
    let raw = std::fs::read_to_string(&path).map_err(|e| DaemonError::Config(format!("reading {path}: {e}")))?;
    let parsed: InternalRunnersFile =
        toml::from_str(&raw).map_err(|e| DaemonError::Config(format!("parsing {path}: {e}")))?;
    Ok(parsed.internal_runners)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
