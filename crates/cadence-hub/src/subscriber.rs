//! The subscriber capability

use cadence_core::{Event, HandlerError};

/// Anything that can observe events
///
/// Closures of the shape `Fn(&Event) -> Result<(), HandlerError>` qualify
/// automatically.
///
/// Subscribers run outside the hub's lock and may call back into the hub.
/// They must not assume exclusive access to it.
pub trait Subscriber: Send + Sync {
    fn on_event(&self, event: &Event) -> Result<(), HandlerError>;
}

impl<F> Subscriber for F
where
    F: Fn(&Event) -> Result<(), HandlerError> + Send + Sync,
{
    fn on_event(&self, event: &Event) -> Result<(), HandlerError> {
        self(event)
    }
}
