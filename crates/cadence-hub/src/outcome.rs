//! Aggregate result of a publish

use cadence_core::{Event, Fault, SubscriptionId};
use serde::{Deserialize, Serialize};

/// What happened to one subscription during a publish
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryStatus {
    /// The subscriber ran and returned `Ok`
    Delivered,
    /// The subscriber returned an error or panicked
    Faulted(Fault),
    /// The subscription was removed after the snapshot but before its turn
    Skipped,
}

/// Per-subscription entry of a [`PublishOutcome`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryResult {
    pub subscription: SubscriptionId,
    pub status: DeliveryStatus,
}

/// Result of [`Hub::publish`](crate::Hub::publish)
///
/// Results are in subscription order. Faults never abort the publish; they
/// are collected here for the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishOutcome {
    /// The event every subscriber received
    pub event: Event,
    pub results: Vec<DeliveryResult>,
}

impl PublishOutcome {
    /// Number of subscribers that received the event without fault
    pub fn delivered(&self) -> usize {
        self.count(|s| matches!(s, DeliveryStatus::Delivered))
    }

    /// Number of subscriptions removed mid-dispatch
    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, DeliveryStatus::Skipped))
    }

    /// Captured faults, in subscription order
    pub fn faults(&self) -> impl Iterator<Item = &Fault> {
        self.results.iter().filter_map(|r| match &r.status {
            DeliveryStatus::Faulted(fault) => Some(fault),
            _ => None,
        })
    }

    /// True when no subscriber faulted
    pub fn is_clean(&self) -> bool {
        self.faults().next().is_none()
    }

    /// Subscription ids that were invoked (delivered or faulted)
    pub fn invoked(&self) -> Vec<SubscriptionId> {
        self.results
            .iter()
            .filter(|r| !matches!(r.status, DeliveryStatus::Skipped))
            .map(|r| r.subscription)
            .collect()
    }

    fn count(&self, pred: impl Fn(&DeliveryStatus) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.status)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::Value;

    #[test]
    fn test_counts() {
        let outcome = PublishOutcome {
            event: Event::new(1, "t", Value::Null),
            results: vec![
                DeliveryResult {
                    subscription: SubscriptionId::new(1),
                    status: DeliveryStatus::Delivered,
                },
                DeliveryResult {
                    subscription: SubscriptionId::new(2),
                    status: DeliveryStatus::Faulted(Fault {
                        source: "sub:2".into(),
                        message: "nope".into(),
                        panicked: false,
                    }),
                },
                DeliveryResult {
                    subscription: SubscriptionId::new(3),
                    status: DeliveryStatus::Skipped,
                },
            ],
        };
        assert_eq!(outcome.delivered(), 1);
        assert_eq!(outcome.skipped(), 1);
        assert_eq!(outcome.faults().count(), 1);
        assert!(!outcome.is_clean());
        assert_eq!(
            outcome.invoked(),
            vec![SubscriptionId::new(1), SubscriptionId::new(2)]
        );
    }
}
