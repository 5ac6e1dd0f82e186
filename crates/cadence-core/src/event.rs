//! Events delivered by the hub

use crate::{Topic, Value};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An immutable notification delivered to every subscriber of a topic
///
/// All subscribers reached by one publish receive the same event, including
/// the same `seq` and `timestamp`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Per-hub sequence number, strictly increasing in publish order
    pub seq: u64,
    /// The channel this event was published on
    pub topic: Topic,
    pub payload: Value,
    /// Wall-clock time of publication
    pub timestamp: DateTime<Utc>,
}

impl Event {
    /// Create an event stamped with the current time
    pub fn new(seq: u64, topic: impl Into<Topic>, payload: impl Into<Value>) -> Self {
        Self {
            seq,
            topic: topic.into(),
            payload: payload.into(),
            timestamp: Utc::now(),
        }
    }

    /// Override the timestamp
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Whether this event was published on the reserved telemetry namespace
    pub fn is_telemetry(&self) -> bool {
        self.topic.is_reserved()
    }
}
