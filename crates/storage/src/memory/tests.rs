// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tharsis_core::{GroupPath, JobStatus, JobType, RunId};

fn new_job(workspace_id: WorkspaceId, queued_at: u64) -> Job {
    Job::new(workspace_id, RunId::new(), JobType::Plan, 30, queued_at)
}

#[tokio::test]
async fn create_and_get_job_roundtrips() {
    let store = MemoryStore::new();
    let job = new_job(WorkspaceId::new(), 1_000);
    let created = store.create_job(job.clone()).await.unwrap();
    let fetched = store.get_job(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.id, job.id);
}

#[tokio::test]
async fn update_job_bumps_version_on_success() {
    let store = MemoryStore::new();
    let job = store.create_job(new_job(WorkspaceId::new(), 1_000)).await.unwrap();
    let mut next = job.clone();
    next.mark_pending(RunnerId::new(), "r1".to_string(), 2_000);
    let updated = store.update_job(&next).await.unwrap();
    assert_eq!(updated.version, 1);
    assert_eq!(updated.status, JobStatus::Pending);
}

#[tokio::test]
async fn update_job_conflicts_on_stale_version() {
    let store = MemoryStore::new();
    let job = store.create_job(new_job(WorkspaceId::new(), 1_000)).await.unwrap();

    let mut first = job.clone();
    first.mark_pending(RunnerId::new(), "r1".to_string(), 2_000);
    store.update_job(&first).await.unwrap();

    let mut stale = job;
    stale.mark_pending(RunnerId::new(), "r2".to_string(), 3_000);
    let err = store.update_job(&stale).await.unwrap_err();
    assert!(err.is_conflict());
}

#[tokio::test]
async fn get_jobs_sorts_by_queued_at_ascending() {
    let store = MemoryStore::new();
    let ws = WorkspaceId::new();
    store.create_job(new_job(ws, 3_000)).await.unwrap();
    store.create_job(new_job(ws, 1_000)).await.unwrap();
    store.create_job(new_job(ws, 2_000)).await.unwrap();

    let jobs = store.get_jobs(JobFilter::default(), JobSort::default()).await.unwrap();
    let queued: Vec<u64> = jobs.iter().map(|j| j.timestamps.queued_at.unwrap()).collect();
    assert_eq!(queued, vec![1_000, 2_000, 3_000]);
}

#[tokio::test]
async fn job_count_for_runner_excludes_terminal_states() {
    let store = MemoryStore::new();
    let runner_id = RunnerId::new();
    let ws = WorkspaceId::new();

    let mut running = store.create_job(new_job(ws, 1_000)).await.unwrap();
    running.mark_pending(runner_id, "r".to_string(), 1_100);
    running = store.update_job(&running).await.unwrap();
    running.mark_running(1_200);
    store.update_job(&running).await.unwrap();

    let mut finished = store.create_job(new_job(ws, 2_000)).await.unwrap();
    finished.mark_pending(runner_id, "r".to_string(), 2_100);
    finished = store.update_job(&finished).await.unwrap();
    finished.mark_running(2_200);
    finished = store.update_job(&finished).await.unwrap();
    finished.mark_finished(2_300);
    store.update_job(&finished).await.unwrap();

    assert_eq!(store.get_job_count_for_runner(runner_id).await.unwrap(), 1);
}

#[tokio::test]
async fn save_and_get_logs_roundtrip_and_update_descriptor() {
    let store = MemoryStore::new();
    let (ws, run, job) = (WorkspaceId::new(), RunId::new(), JobId::new());

    let descriptor = store.save_logs(ws, run, job, 0, b"hello ".to_vec()).await.unwrap();
    assert_eq!(descriptor.size, 6);

    let descriptor = store.save_logs(ws, run, job, 6, b"world".to_vec()).await.unwrap();
    assert_eq!(descriptor.size, 11);

    let bytes = store.get_logs(ws, run, job, 0, 11).await.unwrap();
    assert_eq!(bytes, b"hello world");
}

#[tokio::test]
async fn save_logs_rejects_offset_past_current_size() {
    let store = MemoryStore::new();
    let (ws, run, job) = (WorkspaceId::new(), RunId::new(), JobId::new());
    let err = store.save_logs(ws, run, job, 5, b"late".to_vec()).await.unwrap_err();
    assert!(matches!(err, tharsis_core::Error::Invalid(_)));
}

#[tokio::test]
async fn get_logs_on_missing_object_is_empty_not_error() {
    let store = MemoryStore::new();
    let (ws, run, job) = (WorkspaceId::new(), RunId::new(), JobId::new());
    let bytes = store.get_logs(ws, run, job, 0, 10).await.unwrap();
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn runner_filter_matches_on_namespace_prefix() {
    let store = MemoryStore::new();
    let r = Runner::group("r1", GroupPath::new("a/b"));
    store.insert_runner(r.clone());

    let filter = RunnerFilter { name: None, namespace_paths: vec![GroupPath::new("a")] };
    let found = store.get_runners(filter).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, r.id);
}

#[tokio::test]
async fn set_workspace_locked_publishes_update_event() {
    let store = MemoryStore::new();
    let ws = Workspace::new(WorkspaceId::new(), "top-level/ws");
    let id = ws.id;
    store.insert_workspace(ws);

    store.set_workspace_locked(id, true).unwrap();
    let fetched = store.get_workspace_by_id(id).await.unwrap().unwrap();
    assert!(fetched.locked);

    let (records, _) = store.poll_since(0).await.unwrap();
    assert!(records.iter().any(|r| matches!(r.event, Event::Workspace { action, .. } if action == tharsis_core::EventAction::Update)));
}

#[tokio::test]
async fn create_and_get_session_roundtrips() {
    let store = MemoryStore::new();
    let session = tharsis_core::RunnerSession::new(RunnerId::new(), 1_000);
    let created = store.create_session(session.clone()).await.unwrap();
    let fetched = store.get_session(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.last_heartbeat_at_ms, 1_000);
}

#[tokio::test]
async fn update_session_applies_heartbeat() {
    let store = MemoryStore::new();
    let mut session = tharsis_core::RunnerSession::new(RunnerId::new(), 1_000);
    store.create_session(session.clone()).await.unwrap();

    session.heartbeat(2_000);
    store.update_session(session.clone()).await.unwrap();

    let fetched = store.get_session(session.id).await.unwrap().unwrap();
    assert_eq!(fetched.last_heartbeat_at_ms, 2_000);
    assert!(fetched.error.is_none());
}

#[tokio::test]
async fn update_session_on_unknown_id_is_not_found() {
    let store = MemoryStore::new();
    let session = tharsis_core::RunnerSession::new(RunnerId::new(), 1_000);
    let err = store.update_session(session).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn poll_since_only_returns_new_records() {
    let store = MemoryStore::new();
    store.create_job(new_job(WorkspaceId::new(), 1_000)).await.unwrap();
    let (first, seq1) = store.poll_since(0).await.unwrap();
    assert_eq!(first.len(), 1);

    store.create_job(new_job(WorkspaceId::new(), 2_000)).await.unwrap();
    let (second, seq2) = store.poll_since(seq1).await.unwrap();
    assert_eq!(second.len(), 1);
    assert!(seq2 > seq1);
}
