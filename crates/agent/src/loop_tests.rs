// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tharsis_adapters::FakeExecutor;
use tharsis_core::{FakeClock, JobId, RunnerSessionId};

use super::*;

#[derive(Default)]
struct FakeTransport {
    jobs: Mutex<Vec<(JobId, Vec<u8>)>>,
    heartbeats: AtomicU64,
    heartbeat_fails_remaining: AtomicU64,
    session_errors: Mutex<Vec<String>>,
}

impl FakeTransport {
    fn with_jobs(jobs: Vec<(JobId, Vec<u8>)>) -> Self {
        Self { jobs: Mutex::new(jobs), ..Default::default() }
    }
}

#[async_trait::async_trait]
impl AgentTransport for FakeTransport {
    async fn create_session(&self, _runner_path: &str, _internal: bool) -> Result<RunnerSessionId> {
        Ok(RunnerSessionId::new())
    }

    async fn heartbeat(&self, _session_id: RunnerSessionId) -> Result<()> {
        self.heartbeats.fetch_add(1, Ordering::Relaxed);
        if self.heartbeat_fails_remaining.load(Ordering::Relaxed) > 0 {
            self.heartbeat_fails_remaining.fetch_sub(1, Ordering::Relaxed);
            return Err(Error::internal("simulated heartbeat failure"));
        }
        Ok(())
    }

    async fn report_session_error(&self, _session_id: RunnerSessionId, error: String) -> Result<()> {
        self.session_errors.lock().push(error);
        Ok(())
    }

    async fn claim_job(&self, _runner_path: &str) -> Result<(JobId, Vec<u8>)> {
        match self.jobs.lock().pop() {
            Some(job) => Ok(job),
            None => Err(Error::ContextCancelled),
        }
    }
}

fn config() -> AgentConfig {
    AgentConfig::new("shared-1", "https://api.example", "discovery.example")
}

#[tokio::test]
async fn dispatches_every_claimed_job_then_exits_when_claims_run_dry() {
    let job_id = JobId::new();
    let transport: Arc<dyn AgentTransport> = Arc::new(FakeTransport::with_jobs(vec![(job_id, b"tok".to_vec())]));
    let executor = Arc::new(FakeExecutor::new());
    let metrics = Arc::new(AgentMetrics::new());
    let shutdown = CancellationToken::new();

    let mut config = config();
    config.poll_interval = Duration::from_millis(1);

    run(transport, executor.clone(), config, FakeClock::new(), metrics.clone(), shutdown).await.unwrap();

    let calls = executor.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].job_id, job_id);
    assert_eq!(metrics.snapshot().claim_count, 1);
    assert_eq!(metrics.snapshot().dispatch_count, 1);
}

#[tokio::test]
async fn dispatch_failure_is_reported_and_counted_without_stopping_the_loop() {
    let jobs = vec![(JobId::new(), b"a".to_vec()), (JobId::new(), b"b".to_vec())];
    let transport: Arc<dyn AgentTransport> = Arc::new(FakeTransport::with_jobs(jobs));
    let executor = Arc::new(FakeExecutor::new());
    executor.fail_next_dispatch();
    let metrics = Arc::new(AgentMetrics::new());
    let shutdown = CancellationToken::new();

    let mut config = config();
    config.poll_interval = Duration::from_millis(1);

    run(transport, executor.clone(), config, FakeClock::new(), metrics.clone(), shutdown).await.unwrap();

    assert_eq!(executor.calls().len(), 1, "only the second (non-failing) dispatch should record a call");
    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.claim_count, 2);
    assert_eq!(snapshot.launch_fails, 1);
    assert_eq!(snapshot.dispatch_count, 1);
}

#[tokio::test]
async fn shutdown_token_stops_the_loop_promptly() {
    struct NeverClaims;
    #[async_trait::async_trait]
    impl AgentTransport for NeverClaims {
        async fn create_session(&self, _runner_path: &str, _internal: bool) -> Result<RunnerSessionId> {
            Ok(RunnerSessionId::new())
        }
        async fn heartbeat(&self, _session_id: RunnerSessionId) -> Result<()> {
            Ok(())
        }
        async fn report_session_error(&self, _session_id: RunnerSessionId, _error: String) -> Result<()> {
            Ok(())
        }
        async fn claim_job(&self, _runner_path: &str) -> Result<(JobId, Vec<u8>)> {
            std::future::pending().await
        }
    }

    let transport: Arc<dyn AgentTransport> = Arc::new(NeverClaims);
    let executor = Arc::new(FakeExecutor::new());
    let metrics = Arc::new(AgentMetrics::new());
    let shutdown = CancellationToken::new();
    let shutdown_clone = shutdown.clone();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        shutdown_clone.cancel();
    });

    let result = tokio::time::timeout(
        Duration::from_secs(2),
        run(transport, executor, config(), FakeClock::new(), metrics, shutdown),
    )
    .await
    .unwrap();
    assert!(result.is_ok());
}
