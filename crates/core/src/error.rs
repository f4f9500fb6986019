// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared error taxonomy.
//!
//! Every collaborator in this crate family (storage, token, scheduler,
//! daemon, agent) returns one of these kinds rather than inventing its
//! own. The taxonomy is deliberately coarse — it exists so that transports
//! (the wire crate, the HTTP surface outside this repo) can map a single
//! enum onto their own status codes instead of threading per-crate error
//! types through the stack.

use thiserror::Error;

/// A coarse error kind shared across the scheduling core.
///
/// Propagation policy (see the design notes for the full rationale):
/// - `Conflict` from a claim CAS is swallowed and retried by the scheduler,
///   never surfaced to a caller.
/// - `NotFound` on a workspace mid-selection means "skip this job", not
///   an error the claimant sees.
/// - `ContextCancelled` always returns without side effects.
/// - Everything else propagates with its kind intact.
#[derive(Debug, Error)]
pub enum Error {
    /// Client misuse: a malformed request, an offset past EOF, an unparsable
    /// runner path.
    #[error("invalid request: {0}")]
    Invalid(String),

    /// The referenced job, runner, workspace, or session does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The caller is known but lacks the permission for this operation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The caller could not be authenticated (missing or invalid token).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Optimistic-lock mismatch, or an attempt to create a duplicate entity.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A store, blob backend, or signer failure with no more specific kind.
    #[error("internal error: {0}")]
    Internal(String),

    /// The caller's context was cancelled. Carries no message: callers
    /// should treat this as "stop, no side effects occurred" rather than
    /// report it.
    #[error("context cancelled")]
    ContextCancelled,
}

impl Error {
    pub fn not_found(what: impl Into<String>) -> Self {
        Error::NotFound(what.into())
    }

    pub fn invalid(what: impl Into<String>) -> Self {
        Error::Invalid(what.into())
    }

    pub fn conflict(what: impl Into<String>) -> Self {
        Error::Conflict(what.into())
    }

    pub fn internal(what: impl Into<String>) -> Self {
        Error::Internal(what.into())
    }

    pub fn unauthorized(what: impl Into<String>) -> Self {
        Error::Unauthorized(what.into())
    }

    pub fn forbidden(what: impl Into<String>) -> Self {
        Error::Forbidden(what.into())
    }

    /// True for the sentinel the scheduler retries on rather than surfaces.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::ContextCancelled)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
