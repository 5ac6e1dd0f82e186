//! Cadence Hub - in-process publish/subscribe
//!
//! The hub keeps per-topic subscriber lists and broadcasts events to every
//! subscriber active when a publish takes its snapshot.
//!
//! ## Architecture
//!
//! ```text
//! publish(topic, payload)
//!  │
//!  ├── read lock ── snapshot of topic's subscriptions ── unlock
//!  │
//!  └── for each subscription (in subscription order, outside the lock)
//!       ├── skipped if unsubscribed since the snapshot
//!       └── on_event(&event) ── error or panic captured as a Fault
//! ```
//!
//! ## Design Principles
//!
//! 1. **Subscribers are referenced by id** - `SubscriptionId` is the only handle
//! 2. **Handlers run unlocked** - re-entrant publish/subscribe never deadlocks
//! 3. **One failing subscriber never starves the others**
//! 4. **The hub knows no publishers** - invoker and router hold it, not the reverse

mod config;
mod hub;
mod outcome;
mod subscriber;

pub use config::HubConfig;
pub use hub::Hub;
pub use outcome::{DeliveryResult, DeliveryStatus, PublishOutcome};
pub use subscriber::Subscriber;
