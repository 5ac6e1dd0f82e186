//! Journal - a bounded recorder for reserved-topic telemetry
//!
//! The journal is an ordinary hub subscriber. [`Journal::attach`] subscribes
//! it to every reserved topic; from then on each terminal outcome of the
//! invoker and the router lands here as a [`JournalEntry`].

use crate::config::JournalConfig;
use cadence_core::telemetry::keys;
use cadence_core::{Event, HandlerError, SubscriptionId, TelemetryKind, Value};
use cadence_hub::{Hub, Subscriber};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::debug;

/// One recorded telemetry event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Hub sequence number of the event
    pub seq: u64,
    pub kind: TelemetryKind,
    pub payload: Value,
    pub timestamp: DateTime<Utc>,
}

impl JournalEntry {
    /// Convert a reserved-topic event into an entry
    pub fn from_event(event: &Event) -> cadence_core::Result<Self> {
        Ok(Self {
            seq: event.seq,
            kind: TelemetryKind::from_topic(&event.topic)?,
            payload: event.payload.clone(),
            timestamp: event.timestamp,
        })
    }

    /// Command name, for command telemetry
    pub fn command(&self) -> Option<&str> {
        self.payload.get(keys::COMMAND).and_then(Value::as_str)
    }

    /// Error message, for failures
    pub fn error(&self) -> Option<&str> {
        self.payload.get(keys::ERROR).and_then(Value::as_str)
    }
}

/// Statistics about the journal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JournalStats {
    /// Entries currently held
    pub total_entries: usize,
    /// Entries dropped by the size bound since the last clear
    pub dropped: u64,
    /// Held entries reporting a failure
    pub failure_count: usize,
    pub first_seq: Option<u64>,
    pub last_seq: Option<u64>,
}

#[derive(Debug, Default)]
struct Inner {
    config: JournalConfig,
    entries: VecDeque<JournalEntry>,
    dropped: u64,
    subscriptions: Vec<SubscriptionId>,
}

/// The telemetry journal
#[derive(Debug, Default)]
pub struct Journal {
    inner: RwLock<Inner>,
}

impl Journal {
    /// Create a journal with the default configuration (not recording)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a journal with the given configuration
    pub fn with_config(config: JournalConfig) -> Self {
        Self {
            inner: RwLock::new(Inner {
                config,
                ..Default::default()
            }),
        }
    }

    /// A copy of the current configuration
    pub fn config(&self) -> JournalConfig {
        self.inner.read().config.clone()
    }

    /// Resume appending entries
    pub fn start_recording(&self) {
        self.inner.write().config.recording_enabled = true;
    }

    /// Pause recording; events arriving meanwhile are not kept
    pub fn stop_recording(&self) {
        self.inner.write().config.recording_enabled = false;
    }

    pub fn is_recording(&self) -> bool {
        self.inner.read().config.recording_enabled
    }

    // ========================================================================
    // Hub wiring
    // ========================================================================

    /// Subscribe this journal to every reserved topic on `hub`
    ///
    /// Returns the number of new subscriptions. Attaching twice without a
    /// detach in between is a no-op.
    pub fn attach(self: &Arc<Self>, hub: &Hub) -> usize {
        let mut inner = self.inner.write();
        if !inner.subscriptions.is_empty() {
            return 0;
        }
        for kind in TelemetryKind::ALL {
            let subscriber: Arc<dyn Subscriber> = self.clone();
            inner.subscriptions.push(hub.subscribe_shared(kind.topic(), subscriber));
        }
        debug!(hub = %hub.config().label(), topics = inner.subscriptions.len(), "Journal::attach");
        inner.subscriptions.len()
    }

    /// Remove every subscription made by [`attach`](Self::attach)
    ///
    /// Returns the number of subscriptions removed.
    pub fn detach(&self, hub: &Hub) -> usize {
        let subscriptions = std::mem::take(&mut self.inner.write().subscriptions);
        let removed = subscriptions
            .into_iter()
            .filter(|id| hub.unsubscribe(*id))
            .count();
        debug!(removed, "Journal::detach");
        removed
    }

    /// Whether the journal currently listens on a hub
    pub fn is_attached(&self) -> bool {
        !self.inner.read().subscriptions.is_empty()
    }

    // ========================================================================
    // Recording
    // ========================================================================

    /// Record a reserved-topic event
    ///
    /// Returns `Ok(false)` when recording is disabled. Events on topics
    /// outside the reserved namespace are rejected.
    pub fn record(&self, event: &Event) -> cadence_core::Result<bool> {
        let entry = JournalEntry::from_event(event)?;
        let mut inner = self.inner.write();
        if !inner.config.recording_enabled {
            return Ok(false);
        }
        inner.entries.push_back(entry);
        let max = inner.config.max_entries;
        while max > 0 && inner.entries.len() > max {
            inner.entries.pop_front();
            inner.dropped += 1;
        }
        Ok(true)
    }

    /// Snapshot of all held entries, oldest first
    pub fn entries(&self) -> Vec<JournalEntry> {
        self.inner.read().entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().entries.is_empty()
    }

    /// Forget all entries; recording state and subscriptions are kept
    pub fn clear(&self) {
        let mut inner = self.inner.write();
        inner.entries.clear();
        inner.dropped = 0;
    }

    /// Held and dropped entry counts with the held sequence range
    pub fn stats(&self) -> JournalStats {
        let inner = self.inner.read();
        JournalStats {
            total_entries: inner.entries.len(),
            dropped: inner.dropped,
            failure_count: inner.entries.iter().filter(|e| e.kind.is_failure()).count(),
            first_seq: inner.entries.front().map(|e| e.seq),
            last_seq: inner.entries.back().map(|e| e.seq),
        }
    }
}

impl Subscriber for Journal {
    fn on_event(&self, event: &Event) -> Result<(), HandlerError> {
        self.record(event)?;
        Ok(())
    }
}
