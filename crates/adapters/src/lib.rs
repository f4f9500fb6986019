// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Executor Plugins (C7) — uniform "start a worker process" over
//! container/VM/local backends.
//!
//! Every backend is stateless with respect to the scheduling core: it
//! receives a job id, a signed job token, and the two addresses a worker
//! needs to call back in, and returns an opaque `executor_id` used only
//! for logging (a task ARN, a pod name, a PID).

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod cluster;
mod config;
mod docker;
mod executor;
mod process;

pub use cluster::ClusterExecutor;
pub use config::executor_from_config;
pub use docker::DockerExecutor;
pub use executor::{DispatchContext, ExecutorPlugin};
pub use process::ProcessExecutor;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{DispatchCall, FakeExecutor};
