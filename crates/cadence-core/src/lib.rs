//! Cadence Core - shared vocabulary of the coordination core
//!
//! This crate holds the types every cadence component speaks:
//! - Broadcast channels (`Topic`) and the reserved telemetry namespace
//! - Dynamic payloads (`Value`, `ValueMap`)
//! - Immutable events delivered by the hub (`Event`)
//! - Stable identities for subscriptions, commands and requests
//! - Captured faults (`Fault`) and the error callables return (`HandlerError`)
//!
//! The hub, invoker and router crates depend on this one; it depends on none
//! of them.

mod error;
mod event;
mod fault;
mod identity;
pub mod telemetry;
mod topic;
mod value;

pub use error::{Error, HandlerError, Result};
pub use event::Event;
pub use fault::{panic_message, Fault};
pub use identity::{CommandId, RequestId, SubscriptionId};
pub use telemetry::TelemetryKind;
pub use topic::{Topic, RESERVED_PREFIX};
pub use value::{Value, ValueMap};
