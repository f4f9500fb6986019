// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Signing-key-manager capability. Production deployments plug in a
//! cloud-KMS-backed implementation; the core only ever depends on this
//! trait.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tharsis_core::Result;

#[async_trait]
pub trait SigningKeyManager: Send + Sync {
    async fn sign(&self, payload: &[u8]) -> Result<Vec<u8>>;
}

/// HMAC-free placeholder signer: `sha256(secret || payload)`. Fine for
/// tests and single-process deployments; production call sites should
/// supply a KMS-backed manager instead.
pub struct InMemorySigningKeyManager {
    secret: Vec<u8>,
}

impl InMemorySigningKeyManager {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self { secret: secret.into() }
    }
}

#[async_trait]
impl SigningKeyManager for InMemorySigningKeyManager {
    async fn sign(&self, payload: &[u8]) -> Result<Vec<u8>> {
        let mut hasher = Sha256::new();
        hasher.update(&self.secret);
        hasher.update(payload);
        Ok(hasher.finalize().to_vec())
    }
}

#[cfg(test)]
#[path = "signer_tests.rs"]
mod tests;
