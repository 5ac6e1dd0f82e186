//! Hub - per-topic subscriber registry and synchronous broadcast
//!
//! A single coarse `RwLock` guards the registry. Publishing holds the read
//! lock only long enough to clone the topic's subscription list, so the
//! lock is never held while user code runs.

use crate::config::HubConfig;
use crate::outcome::{DeliveryResult, DeliveryStatus, PublishOutcome};
use crate::subscriber::Subscriber;
use cadence_core::{Event, Fault, HandlerError, SubscriptionId, Topic, Value};
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// One registered subscriber
///
/// Cloned into publish snapshots; `active` is shared so an unsubscribe that
/// lands mid-dispatch is visible to the snapshot.
#[derive(Clone)]
struct Subscription {
    id: SubscriptionId,
    subscriber: Arc<dyn Subscriber>,
    active: Arc<AtomicBool>,
}

#[derive(Default)]
struct Registry {
    /// Subscriptions per topic, in subscription order
    topics: IndexMap<Topic, Vec<Subscription>>,
    /// Reverse index for unsubscribe-by-id
    index: HashMap<SubscriptionId, Topic>,
}

/// In-process notification hub
///
/// The hub is shared by reference (`Arc<Hub>`) between the publishers that
/// report to it; it never owns or references them.
///
/// ```
/// use cadence_core::{Event, HandlerError};
/// use cadence_hub::Hub;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let hub = Hub::new();
/// let seen = Arc::new(AtomicUsize::new(0));
/// let counter = seen.clone();
/// let id = hub.subscribe_fn("orders", move |_event: &Event| {
///     counter.fetch_add(1, Ordering::SeqCst);
///     Ok::<(), HandlerError>(())
/// });
///
/// let outcome = hub.publish("orders", 42i64);
/// assert_eq!(outcome.delivered(), 1);
///
/// hub.unsubscribe(id);
/// hub.publish("orders", 43i64);
/// assert_eq!(seen.load(Ordering::SeqCst), 1);
/// ```
pub struct Hub {
    registry: RwLock<Registry>,
    /// Last sequence number handed out
    seq: AtomicU64,
    config: HubConfig,
}

impl Hub {
    /// Create a hub with the default configuration
    pub fn new() -> Self {
        Self::with_config(HubConfig::default())
    }

    /// Create a hub with the given configuration
    pub fn with_config(config: HubConfig) -> Self {
        Self {
            registry: RwLock::new(Registry::default()),
            seq: AtomicU64::new(0),
            config,
        }
    }

    /// Create a hub already wrapped for sharing
    pub fn shared(config: HubConfig) -> Arc<Self> {
        Arc::new(Self::with_config(config))
    }

    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Register a subscriber on a topic
    ///
    /// Never fails. Registering the same subscriber twice yields two
    /// independent subscriptions, each invoked once per publish.
    pub fn subscribe(
        &self,
        topic: impl Into<Topic>,
        subscriber: impl Subscriber + 'static,
    ) -> SubscriptionId {
        self.subscribe_shared(topic, Arc::new(subscriber))
    }

    /// Register a closure on a topic
    pub fn subscribe_fn<F>(&self, topic: impl Into<Topic>, f: F) -> SubscriptionId
    where
        F: Fn(&Event) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.subscribe_shared(topic, Arc::new(f))
    }

    /// Register a subscriber that is already shared
    ///
    /// Use this to subscribe one observer instance to several topics.
    pub fn subscribe_shared(
        &self,
        topic: impl Into<Topic>,
        subscriber: Arc<dyn Subscriber>,
    ) -> SubscriptionId {
        let topic = topic.into();
        let id = SubscriptionId::next();
        let subscription = Subscription {
            id,
            subscriber,
            active: Arc::new(AtomicBool::new(true)),
        };

        let mut registry = self.registry.write();
        registry.index.insert(id, topic.clone());
        registry.topics.entry(topic.clone()).or_default().push(subscription);
        drop(registry);

        debug!(hub = %self.config.label(), %topic, subscription = %id, "Hub::subscribe");
        id
    }

    /// Remove a subscription
    ///
    /// Idempotent: unknown or already removed ids are ignored. Returns whether
    /// a subscription was actually removed. If a publish is in flight, the
    /// removed subscriber receives no further callbacks from it.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut registry = self.registry.write();
        let Some(topic) = registry.index.remove(&id) else {
            debug!(hub = %self.config.label(), subscription = %id, "Hub::unsubscribe: unknown id");
            return false;
        };

        let mut now_empty = false;
        if let Some(list) = registry.topics.get_mut(&topic) {
            if let Some(pos) = list.iter().position(|s| s.id == id) {
                let removed = list.remove(pos);
                removed.active.store(false, Ordering::SeqCst);
            }
            now_empty = list.is_empty();
        }
        if now_empty {
            registry.topics.shift_remove(&topic);
        }
        drop(registry);

        debug!(hub = %self.config.label(), %topic, subscription = %id, "Hub::unsubscribe");
        true
    }

    /// Drop every subscription
    ///
    /// In-flight publishes stop invoking the cleared subscribers.
    pub fn clear(&self) {
        let mut registry = self.registry.write();
        for subscription in registry.topics.values().flatten() {
            subscription.active.store(false, Ordering::SeqCst);
        }
        let count = registry.index.len();
        registry.topics.clear();
        registry.index.clear();
        drop(registry);

        debug!(hub = %self.config.label(), count, "Hub::clear");
    }

    // ========================================================================
    // Broadcast
    // ========================================================================

    /// Publish a payload to every current subscriber of `topic`
    ///
    /// Subscribers run synchronously on the calling thread, in subscription
    /// order. A subscriber that errors or panics is recorded in the outcome
    /// and the remaining subscribers still run.
    pub fn publish(&self, topic: impl Into<Topic>, payload: impl Into<Value>) -> PublishOutcome {
        let topic = topic.into();
        let snapshot: Vec<Subscription> = self
            .registry
            .read()
            .topics
            .get(&topic)
            .cloned()
            .unwrap_or_default();

        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let event = Event::new(seq, topic, payload);

        debug!(
            hub = %self.config.label(),
            topic = %event.topic,
            seq,
            subscribers = snapshot.len(),
            "Hub::publish"
        );

        let results = snapshot
            .iter()
            .map(|subscription| DeliveryResult {
                subscription: subscription.id,
                status: self.deliver(subscription, &event),
            })
            .collect();

        PublishOutcome { event, results }
    }

    fn deliver(&self, subscription: &Subscription, event: &Event) -> DeliveryStatus {
        if !subscription.active.load(Ordering::SeqCst) {
            return DeliveryStatus::Skipped;
        }

        let source = subscription.id.to_string();
        match Fault::capture(source, || subscription.subscriber.on_event(event)) {
            Ok(()) => DeliveryStatus::Delivered,
            Err(fault) => {
                if self.config.log_faults() {
                    warn!(
                        hub = %self.config.label(),
                        topic = %event.topic,
                        seq = event.seq,
                        subscription = %subscription.id,
                        panicked = fault.panicked,
                        "subscriber fault: {}",
                        fault.message
                    );
                }
                DeliveryStatus::Faulted(fault)
            }
        }
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Number of active subscriptions on a topic
    pub fn subscriber_count(&self, topic: impl Into<Topic>) -> usize {
        let topic = topic.into();
        self.registry.read().topics.get(&topic).map_or(0, Vec::len)
    }

    /// Total number of active subscriptions across all topics
    pub fn total_subscriptions(&self) -> usize {
        self.registry.read().index.len()
    }

    /// Topics with at least one subscriber, in first-subscription order
    pub fn topics(&self) -> Vec<Topic> {
        self.registry.read().topics.keys().cloned().collect()
    }

    /// Whether the subscription is still registered
    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.registry.read().index.contains_key(&id)
    }

    /// Sequence number of the most recent publish (0 before the first)
    pub fn last_seq(&self) -> u64 {
        self.seq.load(Ordering::SeqCst)
    }
}

impl Default for Hub {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Hub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.registry.read();
        f.debug_struct("Hub")
            .field("label", &self.config.label())
            .field("topics", &registry.topics.len())
            .field("subscriptions", &registry.index.len())
            .field("last_seq", &self.last_seq())
            .finish()
    }
}
