// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire protocol between the scheduler daemon, runner agents, and workers.
//!
//! Wire format: 4-byte length prefix (big-endian) + JSON payload. Bearer
//! auth (caller token or job token) travels at the transport layer, not in
//! these payloads — see `tharsis-daemon`'s listener.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod event;
mod request;
mod response;
mod wire;

pub use event::{CancellationEvent, LogEvent};
pub use request::Request;
pub use response::Response;
pub use wire::{decode, encode, read_message, write_message, ProtocolError};
