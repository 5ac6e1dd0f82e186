//! Captured faults from subscribers, commands and chain handlers
//!
//! A fault is what remains of a failing callable once the core has isolated
//! it: who failed, with what message, and whether it panicked. Faults are
//! aggregated into outcomes instead of aborting sibling callables.

use crate::HandlerError;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// A failure captured while invoking a callable unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fault {
    /// Label of the failing unit (subscription id, command name, handler name)
    pub source: String,
    /// Error or panic message
    pub message: String,
    /// True when the unit panicked rather than returning an error
    pub panicked: bool,
}

impl Fault {
    /// Fault from a returned error
    pub fn error(source: impl Into<String>, err: &HandlerError) -> Self {
        Self {
            source: source.into(),
            message: err.message().to_string(),
            panicked: false,
        }
    }

    /// Fault from a caught panic payload
    pub fn panic(source: impl Into<String>, payload: Box<dyn Any + Send>) -> Self {
        Self {
            source: source.into(),
            message: panic_message(payload.as_ref()),
            panicked: true,
        }
    }

    /// Run `f`, converting both a returned error and a panic into a `Fault`
    ///
    /// The closure is treated as unwind safe: a callable that panics halfway
    /// is reported, and any state it shares with the caller is the caller's
    /// contract to keep consistent.
    ///
    /// ```
    /// use cadence_core::{Fault, HandlerError};
    ///
    /// let ok: Result<i32, Fault> = Fault::capture("adder", || Ok(1 + 1));
    /// assert_eq!(ok, Ok(2));
    ///
    /// let err = Fault::capture::<()>("writer", || Err(HandlerError::new("disk full")));
    /// assert_eq!(err.unwrap_err().message, "disk full");
    /// ```
    pub fn capture<T>(
        source: impl Into<String>,
        f: impl FnOnce() -> Result<T, HandlerError>,
    ) -> Result<T, Fault> {
        match catch_unwind(AssertUnwindSafe(f)) {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => Err(Fault::error(source, &err)),
            Err(payload) => Err(Fault::panic(source, payload)),
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.panicked {
            write!(f, "{} panicked: {}", self.source, self.message)
        } else {
            write!(f, "{} failed: {}", self.source, self.message)
        }
    }
}

/// Extract a readable message from a panic payload
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_error() {
        let result: Result<(), Fault> = Fault::capture("sub:1", || Err("boom".into()));
        let fault = result.unwrap_err();
        assert_eq!(fault.source, "sub:1");
        assert_eq!(fault.message, "boom");
        assert!(!fault.panicked);
        assert_eq!(fault.to_string(), "sub:1 failed: boom");
    }

    #[test]
    fn test_capture_panic() {
        let result: Result<(), Fault> = Fault::capture("sub:2", || panic!("exploded"));
        let fault = result.unwrap_err();
        assert!(fault.panicked);
        assert_eq!(fault.message, "exploded");
    }

    #[test]
    fn test_capture_formatted_panic() {
        let n = 3;
        let result: Result<(), Fault> = Fault::capture("cmd", || panic!("bad index {}", n));
        assert_eq!(result.unwrap_err().message, "bad index 3");
    }
}
