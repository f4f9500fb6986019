// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use super::*;

#[test]
fn counters_start_at_zero() {
    let metrics = AgentMetrics::new();
    assert_eq!(metrics.snapshot(), AgentMetricsSnapshot::default());
}

#[test]
fn each_recorder_bumps_its_own_counter_only() {
    let metrics = AgentMetrics::new();
    metrics.record_claim();
    metrics.record_claim();
    metrics.record_claim_fail();
    metrics.record_launch_fail();
    metrics.record_dispatch(Duration::from_millis(5));

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.claim_count, 2);
    assert_eq!(snapshot.claim_fails, 1);
    assert_eq!(snapshot.launch_fails, 1);
    assert_eq!(snapshot.dispatch_count, 1);
}
