// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::{decode, encode};
use tharsis_core::EventAction;

#[test]
fn claim_job_response_roundtrips() {
    let resp = Response::ClaimJob { job_id: JobId::new(), token: vec![9, 9, 9] };
    let bytes = encode(&resp).unwrap();
    let decoded: Response = decode(&bytes).unwrap();
    assert_eq!(decoded, resp);
}

#[test]
fn log_event_response_carries_size() {
    let resp = Response::Log(LogEvent { job_id: JobId::new(), action: EventAction::Update, size: 42 });
    let bytes = encode(&resp).unwrap();
    let decoded: Response = decode(&bytes).unwrap();
    assert_eq!(decoded, resp);
}

#[test]
fn error_response_carries_message() {
    let resp = Response::Error { message: "not found".to_string() };
    let v = serde_json::to_value(&resp).unwrap();
    assert_eq!(v["type"], "Error");
    assert_eq!(v["message"], "not found");
}
