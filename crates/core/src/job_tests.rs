// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn new_job() -> Job {
    Job::new(WorkspaceId::new(), RunId::new(), JobType::Plan, 30, 1_000)
}

#[test]
fn new_job_is_queued_with_no_runner() {
    let j = new_job();
    assert_eq!(j.status, JobStatus::Queued);
    assert!(j.runner_id.is_none());
    assert!(j.runner_path.is_none());
    assert_eq!(j.timestamps.queued_at, Some(1_000));
    assert_eq!(j.version, 0);
}

#[test]
fn mark_pending_records_runner_and_path() {
    let mut j = new_job();
    let rid = RunnerId::new();
    j.mark_pending(rid, "a/b/r1".to_string(), 2_000);
    assert_eq!(j.status, JobStatus::Pending);
    assert_eq!(j.runner_id, Some(rid));
    assert_eq!(j.runner_path.as_deref(), Some("a/b/r1"));
    assert_eq!(j.timestamps.pending_at, Some(2_000));
}

#[test]
fn full_lifecycle_to_finished() {
    let mut j = new_job();
    j.mark_pending(RunnerId::new(), "r1".to_string(), 2_000);
    j.mark_running(3_000);
    assert_eq!(j.status, JobStatus::Running);
    assert!(!j.is_terminal());
    j.mark_finished(4_000);
    assert_eq!(j.status, JobStatus::Finished);
    assert!(j.is_terminal());
    assert_eq!(j.timestamps.finished_at, Some(4_000));
}

#[test]
fn cancelled_is_terminal() {
    let mut j = new_job();
    j.request_cancel();
    assert!(j.cancel_requested);
    j.mark_cancelled(5_000);
    assert_eq!(j.status, JobStatus::Cancelled);
    assert!(j.is_terminal());
}

#[test]
fn token_expiry_adds_duration_and_grace() {
    let j = new_job();
    assert_eq!(j.token_expiry_ms(1_000, 3_600_000), 1_000 + 30 * 60_000 + 3_600_000);
}

#[test]
fn with_tags_replaces_tag_set() {
    let j = new_job().with_tags(["linux", "docker"]);
    assert_eq!(j.tags.len(), 2);
    assert!(j.tags.contains("linux"));
}

#[test]
fn status_display_matches_wire_strings() {
    assert_eq!(JobStatus::Queued.to_string(), "queued");
    assert_eq!(JobStatus::Finished.to_string(), "finished");
}

#[test]
fn builder_produces_queued_job_by_default() {
    let j = Job::builder().build();
    assert_eq!(j.status, JobStatus::Queued);
    assert_eq!(j.version, 0);
    assert!(j.runner_id.is_none());
}
