// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `InternalTokenProvider` — the agent-side cache for its own bearer
//! token, scoped to `(runner_name, runner_id)` and tied to the agent's
//! lifecycle.

use std::sync::Arc;
use tharsis_core::{InternalRunnerClaims, Result, RunnerId};
use tokio::sync::Mutex;

use crate::signed::SignedToken;
use crate::signer::SigningKeyManager;

/// Re-mint this far ahead of actual expiry so a request in flight never
/// races a token that expires mid-call.
pub const SAFETY_MARGIN_MS: u64 = 60_000;

/// Internal runner tokens live for one hour before forcing a re-mint.
const TOKEN_LIFETIME_MS: u64 = 3_600_000;

struct Cached {
    claims: InternalRunnerClaims,
    bytes: Vec<u8>,
}

/// Safe for concurrent callers: `get_token` takes a single guard covering
/// both the freshness check and, when needed, the mint — so only one
/// caller ever signs a new token at a time, and the rest observe the
/// result once the guard releases.
pub struct InternalTokenProvider {
    runner_name: String,
    runner_id: RunnerId,
    signer: Arc<dyn SigningKeyManager>,
    cached: Mutex<Option<Cached>>,
}

impl InternalTokenProvider {
    pub fn new(runner_name: impl Into<String>, runner_id: RunnerId, signer: Arc<dyn SigningKeyManager>) -> Self {
        Self { runner_name: runner_name.into(), runner_id, signer, cached: Mutex::new(None) }
    }

    /// Returns the cached token if unexpired (beyond the safety margin);
    /// otherwise mints a fresh one with `expiry = now + 1h`, `aud =
    /// internal-runner`, `sub = runner_name`, and the declared `runner_id`.
    pub async fn get_token(&self, now_ms: u64) -> Result<Vec<u8>> {
        let mut guard = self.cached.lock().await;
        if let Some(cached) = guard.as_ref() {
            if cached.claims.is_fresh(now_ms, SAFETY_MARGIN_MS) {
                return Ok(cached.bytes.clone());
            }
        }

        let claims =
            InternalRunnerClaims::new(self.runner_name.clone(), self.runner_id, now_ms + TOKEN_LIFETIME_MS);
        let bytes = SignedToken::mint(claims.clone(), self.signer.as_ref()).await?;
        *guard = Some(Cached { claims, bytes: bytes.clone() });
        Ok(bytes)
    }
}

#[cfg(test)]
#[path = "internal_token_tests.rs"]
mod tests;
