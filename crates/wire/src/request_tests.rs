// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::{decode, encode};

#[test]
fn claim_job_roundtrips_through_json() {
    let req = Request::ClaimJob { runner_path: "a/b/r1".to_string() };
    let bytes = encode(&req).unwrap();
    let decoded: Request = decode(&bytes).unwrap();
    assert_eq!(decoded, req);
}

#[test]
fn create_runner_session_defaults_internal_to_false() {
    let json = r#"{"type":"CreateRunnerSession","runner_path":"r1"}"#;
    let decoded: Request = serde_json::from_str(json).unwrap();
    assert_eq!(decoded, Request::CreateRunnerSession { runner_path: "r1".to_string(), internal: false });
}

#[test]
fn subscribe_logs_defaults_last_seen_size_to_none() {
    let req = Request::SubscribeLogs { job_id: JobId::new(), last_seen_size: None };
    let bytes = encode(&req).unwrap();
    let decoded: Request = decode(&bytes).unwrap();
    assert_eq!(decoded, req);
}
