// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire shape shared by both token kinds: claims plus their signature.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tharsis_core::{Error, Result};

use crate::signer::SigningKeyManager;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedToken<C> {
    pub claims: C,
    pub signature: Vec<u8>,
}

impl<C: Serialize + DeserializeOwned> SignedToken<C> {
    /// Sign `claims` and serialize the result to the bytes callers carry as
    /// a bearer token.
    pub async fn mint(claims: C, signer: &dyn SigningKeyManager) -> Result<Vec<u8>> {
        let payload =
            serde_json::to_vec(&claims).map_err(|e| Error::internal(format!("encode claims: {e}")))?;
        let signature = signer.sign(&payload).await?;
        let token = SignedToken { claims, signature };
        serde_json::to_vec(&token).map_err(|e| Error::internal(format!("encode token: {e}")))
    }

    /// Deserialize a token's bytes without re-verifying the signature —
    /// callers that need verification re-sign the claims and compare.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| Error::invalid(format!("malformed token: {e}")))
    }

    /// Decode `bytes` and check the carried signature against a fresh
    /// signature over the same claims, rejecting a tampered or
    /// foreign-signer token.
    pub async fn verify(bytes: &[u8], signer: &dyn SigningKeyManager) -> Result<C> {
        let token = Self::decode(bytes)?;
        let payload = serde_json::to_vec(&token.claims)
            .map_err(|e| Error::internal(format!("encode claims: {e}")))?;
        let expected = signer.sign(&payload).await?;
        if expected != token.signature {
            return Err(Error::unauthorized("token signature mismatch"));
        }
        Ok(token.claims)
    }
}

#[cfg(test)]
#[path = "signed_tests.rs"]
mod tests;
