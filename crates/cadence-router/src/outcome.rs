//! Result of routing one request

use cadence_core::{Fault, RequestId, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a request left the chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Resolution {
    /// A handler claimed the request
    Handled {
        /// Name of the claiming link
        handler: String,
        /// Zero-based position of the claiming link
        position: usize,
        response: Value,
    },
    /// Every handler passed
    Unhandled,
}

/// Full report of one dispatch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteOutcome {
    pub request: RequestId,
    pub resolution: Resolution,
    /// Handlers that failed or panicked along the way, in chain order
    pub diagnostics: Vec<Fault>,
}

impl RouteOutcome {
    pub fn is_handled(&self) -> bool {
        matches!(self.resolution, Resolution::Handled { .. })
    }

    /// Response of the claiming handler, if any
    pub fn response(&self) -> Option<&Value> {
        match &self.resolution {
            Resolution::Handled { response, .. } => Some(response),
            Resolution::Unhandled => None,
        }
    }

    /// Name of the claiming handler, if any
    pub fn handled_by(&self) -> Option<&str> {
        match &self.resolution {
            Resolution::Handled { handler, .. } => Some(handler),
            Resolution::Unhandled => None,
        }
    }
}

impl fmt::Display for RouteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.resolution {
            Resolution::Handled { handler, position, .. } => {
                write!(f, "{} handled by {} at {}", self.request, handler, position)
            }
            Resolution::Unhandled => write!(f, "{} unhandled", self.request),
        }
    }
}
