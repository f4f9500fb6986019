// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `IssueJobToken` — mints a token scoped to exactly one job, handed to a
//! worker process at dispatch time.

use tharsis_core::{Error, Job, JobTokenClaims, Result};

use crate::signed::SignedToken;
use crate::signer::SigningKeyManager;

/// Default grace period added to `job.max_duration_minutes` per §3/§4.4.
pub const JOB_TOKEN_GRACE_MS: u64 = 3_600_000;

/// Produces signed token bytes with the claims in §3: expiry is
/// `job.max_duration_minutes + grace`.
pub async fn issue_job_token(
    job: &Job,
    now_ms: u64,
    signer: &dyn SigningKeyManager,
) -> Result<Vec<u8>> {
    let expiry_ms = job.token_expiry_ms(now_ms, JOB_TOKEN_GRACE_MS);
    let claims = JobTokenClaims::new(job.id, job.run_id, job.workspace_id, expiry_ms);
    SignedToken::mint(claims, signer).await
}

/// Verifies a job token's signature and rejects one past its `expiry_ms`.
/// Used on the worker-facing side of the listener, where the token is the
/// sole bearer credential (§6).
pub async fn verify_job_token(
    bytes: &[u8],
    now_ms: u64,
    signer: &dyn SigningKeyManager,
) -> Result<JobTokenClaims> {
    let claims = SignedToken::verify(bytes, signer).await?;
    if now_ms > claims.expiry_ms {
        return Err(Error::unauthorized("job token expired"));
    }
    Ok(claims)
}

#[cfg(test)]
#[path = "job_token_tests.rs"]
mod tests;
