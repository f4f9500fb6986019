// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event Bus (C1) — in-process publish/subscribe over typed domain
//! events, fed by a single change-feed reader talking to the store.

use std::sync::Arc;
use std::time::Duration;

use tharsis_core::{Event, EventAction, EventKind};
use tharsis_storage::ChangeFeedSource;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

const CHANNEL_CAPACITY: usize = 4096;
const EMPTY_POLL_INTERVAL: Duration = Duration::from_millis(50);
const BACKOFF_BASE: Duration = Duration::from_secs(1);
const BACKOFF_CAP: Duration = Duration::from_secs(30);

/// A subscription filter: match a fixed set of `(kind, action)` pairs.
/// `Subscribe` matches an event if it matches at least one filter entry.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    entries: Vec<(EventKind, Option<EventAction>)>,
}

impl EventFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match `kind` with any action.
    pub fn any_action(mut self, kind: EventKind) -> Self {
        self.entries.push((kind, None));
        self
    }

    /// Match `kind` only with `action`.
    pub fn with_action(mut self, kind: EventKind, action: EventAction) -> Self {
        self.entries.push((kind, Some(action)));
        self
    }

    fn matches(&self, event: &Event) -> bool {
        self.entries.iter().any(|(kind, action)| {
            *kind == event.kind() && action.map(|a| a == event.action()).unwrap_or(true)
        })
    }
}

/// A live subscription. Dropping it is the unsubscribe — the publisher
/// (a `tokio::sync::broadcast::Sender`) never blocks on a lagging or
/// dropped receiver, so release is always non-blocking.
pub struct Subscription {
    filter: EventFilter,
    rx: broadcast::Receiver<Event>,
}

impl Subscription {
    /// Wait for the next event matching this subscription's filter.
    /// `Ok(None)` means the bus's feed task has stopped (terminal error);
    /// the caller should treat that like any other ctx-cancellation point.
    pub async fn recv(&mut self) -> Option<Event> {
        loop {
            match self.rx.recv().await {
                Ok(event) if self.filter.matches(&event) => return Some(event),
                Ok(_) => continue,
                // A lagging subscriber missed some deliveries — that's
                // itself a valid "something changed" wakeup for callers
                // that just want to know when to re-poll the store.
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

/// Delivers typed change events from the store's change feed to
/// interested in-process subscribers. Feeds a single background reader
/// per bus instance; failure semantics are the exponential backoff in
/// §4.1 (base 1s, cap 30s).
pub struct EventBus {
    tx: broadcast::Sender<Event>,
    feed_task: JoinHandle<()>,
}

impl EventBus {
    /// Spawn the feed task reading `source` and start accepting
    /// subscriptions.
    pub fn spawn(source: Arc<dyn ChangeFeedSource>) -> Self {
        let (tx, _rx) = broadcast::channel(CHANNEL_CAPACITY);
        let feed_tx = tx.clone();
        let feed_task = tokio::spawn(async move { feed_loop(source, feed_tx).await });
        Self { tx, feed_task }
    }

    /// `Subscribe(filters) -> handle` (§4.1). Returns a coalesced delivery
    /// channel — event filtering happens on receive, not on publish.
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        Subscription { filter, rx: self.tx.subscribe() }
    }
}

impl Drop for EventBus {
    fn drop(&mut self) {
        self.feed_task.abort();
    }
}

async fn feed_loop(source: Arc<dyn ChangeFeedSource>, tx: broadcast::Sender<Event>) {
    let mut since: u64 = 0;
    let mut backoff = BACKOFF_BASE;
    loop {
        match source.poll_since(since).await {
            Ok((records, new_since)) => {
                since = new_since;
                backoff = BACKOFF_BASE;
                if records.is_empty() {
                    tokio::time::sleep(EMPTY_POLL_INTERVAL).await;
                    continue;
                }
                for record in records {
                    // No subscribers is not an error — broadcast::send only
                    // fails when every receiver has been dropped.
                    let _ = tx.send(record.event);
                }
            }
            Err(error) => {
                tracing::warn!(%error, backoff_secs = backoff.as_secs(), "change-feed read failed, backing off");
                tokio::time::sleep(backoff).await;
                backoff = (backoff * 2).min(BACKOFF_CAP);
            }
        }
    }
}

#[cfg(test)]
#[path = "event_bus_tests.rs"]
mod tests;
