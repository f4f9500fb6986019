// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use async_trait::async_trait;
use parking_lot::Mutex;
use tharsis_core::{JobId, RunnerId};
use tharsis_storage::ChangeRecord;

struct FakeSource {
    records: Mutex<Vec<ChangeRecord>>,
}

#[async_trait]
impl ChangeFeedSource for FakeSource {
    async fn poll_since(&self, since: u64) -> tharsis_core::Result<(Vec<ChangeRecord>, u64)> {
        let records = self.records.lock();
        let fresh: Vec<ChangeRecord> = records.iter().filter(|r| r.seq > since).cloned().collect();
        let new_since = fresh.last().map(|r| r.seq).unwrap_or(since);
        Ok((fresh, new_since))
    }
}

#[tokio::test]
async fn subscriber_receives_matching_events() {
    let job_id = JobId::new();
    let source = Arc::new(FakeSource {
        records: Mutex::new(vec![ChangeRecord {
            seq: 1,
            event: tharsis_core::Event::job(job_id, EventAction::Update),
        }]),
    });
    let bus = EventBus::spawn(source);
    let mut sub = bus.subscribe(EventFilter::new().any_action(EventKind::Job));

    let event = tokio::time::timeout(Duration::from_secs(2), sub.recv()).await.unwrap().unwrap();
    assert_eq!(event.kind(), EventKind::Job);
}

#[tokio::test]
async fn subscriber_ignores_events_outside_its_filter() {
    let job_id = JobId::new();
    let runner_id = RunnerId::new();
    let source = Arc::new(FakeSource {
        records: Mutex::new(vec![
            ChangeRecord { seq: 1, event: tharsis_core::Event::job(job_id, EventAction::Update) },
            ChangeRecord {
                seq: 2,
                event: tharsis_core::Event::runner(runner_id, EventAction::Update),
            },
        ]),
    });
    let bus = EventBus::spawn(source);
    let mut sub = bus.subscribe(EventFilter::new().any_action(EventKind::Runner));

    let event = tokio::time::timeout(Duration::from_secs(2), sub.recv()).await.unwrap().unwrap();
    assert_eq!(event.kind(), EventKind::Runner);
}
