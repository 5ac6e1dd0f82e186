//! Cadence Router - chain-of-responsibility request routing
//!
//! A [`Chain`] is an immutable, ordered list of handlers. The [`Router`]
//! walks it for each request until one handler claims the request. When
//! every handler passes, the router publishes `unhandled` on the hub's
//! reserved namespace and reports the request as unhandled; it never makes
//! up a default response.
//!
//! # Example
//!
//! ```rust
//! use cadence_core::{HandlerError, Value};
//! use cadence_hub::Hub;
//! use cadence_router::{Chain, Request, Router, Verdict};
//! use std::sync::Arc;
//!
//! let chain = Chain::builder()
//!     .then_fn("small", |req: &Request| {
//!         Ok::<_, HandlerError>(if req.kind == "small" {
//!             Verdict::handled("ok")
//!         } else {
//!             Verdict::Pass
//!         })
//!     })
//!     .build();
//!
//! let router = Router::new(Arc::new(Hub::new()));
//! let outcome = router.dispatch(&chain, &Request::new("small"));
//! assert_eq!(outcome.response(), Some(&Value::from("ok")));
//!
//! let outcome = router.dispatch(&chain, &Request::new("huge"));
//! assert!(!outcome.is_handled());
//! ```

mod chain;
mod handler;
mod outcome;
mod request;
mod router;

pub use chain::{Chain, ChainBuilder};
pub use handler::{Handler, Verdict};
pub use outcome::{Resolution, RouteOutcome};
pub use request::Request;
pub use router::Router;
