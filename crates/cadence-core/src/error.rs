//! Error types for cadence-core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid topic: {0:?}")]
    InvalidTopic(String),

    #[error("Unknown telemetry topic: {0}")]
    UnknownTelemetry(String),

    #[error("Type error: expected {expected}, got {got}")]
    TypeError { expected: String, got: String },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Error returned by a subscriber, command or chain handler
///
/// Carries only a message: the coordination core never inspects the cause,
/// it records it in a [`Fault`](crate::Fault) and moves on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
}

impl HandlerError {
    /// Create an error with the given message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<Error> for HandlerError {
    fn from(err: Error) -> Self {
        Self::new(err.to_string())
    }
}

fn _assert_send_sync<T: Send + Sync>() {}
fn _errors_are_send_sync() {
    _assert_send_sync::<Error>();
    _assert_send_sync::<HandlerError>();
}
