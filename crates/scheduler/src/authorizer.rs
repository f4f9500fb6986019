// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The authorization/permission evaluator is an external collaborator
//! (§6) — this module only declares the interface the scheduler and log
//! stream manager consume from it.

use async_trait::async_trait;
use tharsis_core::Result;

/// Resolved identity for an authenticated caller token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub id: String,
}

impl Caller {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// The two permissions this crate family ever checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    ClaimJob,
    UpdateJob,
}

/// `RequirePermission(ctx, permission, scope)` and `AuthorizeCaller(ctx)`,
/// per §6. Implemented outside this crate family (the HTTP/GraphQL API
/// surface owns the real evaluator); test code uses [`AllowAllAuthorizer`].
#[async_trait]
pub trait Authorizer: Send + Sync + 'static {
    async fn authorize_caller(&self, caller_token: &str) -> Result<Caller>;
    async fn require_permission(&self, caller: &Caller, permission: Permission, scope: &str) -> Result<()>;
}

/// Permissive authorizer for tests and local development.
pub struct AllowAllAuthorizer;

#[async_trait]
impl Authorizer for AllowAllAuthorizer {
    async fn authorize_caller(&self, caller_token: &str) -> Result<Caller> {
        Ok(Caller::new(caller_token))
    }

    async fn require_permission(&self, _caller: &Caller, _permission: Permission, _scope: &str) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "authorizer_tests.rs"]
mod tests;
