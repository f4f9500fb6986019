// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Startup/config error taxonomy, kept separate from `tharsis_core::Error`
//! because these failures happen before there is a scheduler to report
//! through — they abort the process with a message on stderr, not a wire
//! response.

#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("config error: {0}")]
    Config(String),
    #[error("failed to bind {addr}: {source}")]
    Bind { addr: String, #[source] source: std::io::Error },
    #[error(transparent)]
    Core(#[from] tharsis_core::Error),
}
