// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler (C5), the in-process Event Bus (C1) that feeds it, the
//! authorization interface it consumes from an external evaluator (§6),
//! and the Log Stream Manager (C8) built on the same bus.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod authorizer;
mod claim;
mod event_bus;
mod log_stream;

pub use authorizer::{AllowAllAuthorizer, Authorizer, Caller, Permission};
pub use claim::{Scheduler, MAX_JOBS_PER_RUNNER};
pub use event_bus::{EventBus, EventFilter, Subscription};
pub use log_stream::{LogEvent, LogEventStream, LogStreamManager};
