// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runner Agent (C6): session lifecycle, heartbeat, and the
//! claim-dispatch loop, decoupled from how it talks to the daemon via
//! [`AgentTransport`].

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod loop_;
mod metrics;
mod transport;
mod wire_transport;

pub use loop_::{run, AgentConfig};
pub use metrics::{AgentMetrics, AgentMetricsSnapshot};
pub use transport::AgentTransport;
pub use wire_transport::WireTransport;
