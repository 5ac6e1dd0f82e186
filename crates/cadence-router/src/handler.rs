//! The chain handler capability

use crate::request::Request;
use cadence_core::{HandlerError, Value};
use serde::{Deserialize, Serialize};

/// A handler's answer to a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Verdict {
    /// The handler claims the request; the walk stops here
    Handled(Value),
    /// Not mine, try the next handler
    Pass,
}

impl Verdict {
    /// Claim the request with `response`
    pub fn handled(response: impl Into<Value>) -> Self {
        Verdict::Handled(response.into())
    }

    pub fn is_handled(&self) -> bool {
        matches!(self, Verdict::Handled(_))
    }
}

/// Anything that can take part in a chain
///
/// Closures of the shape `Fn(&Request) -> Result<Verdict, HandlerError>`
/// qualify automatically. Returning an error (or panicking) counts as a
/// pass; the fault is kept in the outcome's diagnostics.
pub trait Handler: Send + Sync {
    fn try_handle(&self, request: &Request) -> Result<Verdict, HandlerError>;

    /// Name reported when this handler claims a request or faults
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<F> Handler for F
where
    F: Fn(&Request) -> Result<Verdict, HandlerError> + Send + Sync,
{
    fn try_handle(&self, request: &Request) -> Result<Verdict, HandlerError> {
        self(request)
    }
}
