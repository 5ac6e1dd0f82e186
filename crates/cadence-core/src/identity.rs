//! Identity types for subscriptions, commands and requests
//!
//! Every callable unit the core tracks is referred to by one of these ids,
//! never by a copy of its behavior.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

macro_rules! sequential_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(u64);

        impl $name {
            /// Create an id from a raw value
            pub fn new(id: u64) -> Self {
                Self(id)
            }

            /// Allocate the next id from a process-wide counter
            pub fn next() -> Self {
                static NEXT: AtomicU64 = AtomicU64::new(1);
                Self(NEXT.fetch_add(1, Ordering::Relaxed))
            }

            /// Get the raw id value
            pub fn raw(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, ":{}"), self.0)
            }
        }
    };
}

sequential_id!(
    /// Caller-opaque handle for one hub subscription
    ///
    /// The only valid way to unregister a subscriber.
    SubscriptionId,
    "sub"
);

sequential_id!(
    /// Identity of a command accepted by an invoker
    CommandId,
    "cmd"
);

sequential_id!(
    /// Identity of a request routed through a chain
    RequestId,
    "req"
);
