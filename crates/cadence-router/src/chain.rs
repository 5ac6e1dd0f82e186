//! Immutable handler chains
//!
//! A chain is built once and never changes. Cloning shares the same
//! links, so one chain can be dispatched from many threads at once without
//! locking. To change a chain, build a new one.

use crate::handler::{Handler, Verdict};
use crate::request::Request;
use cadence_core::{Fault, HandlerError};
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// One position in a chain
#[derive(Clone)]
pub(crate) struct Link {
    pub(crate) name: String,
    pub(crate) handler: Arc<dyn Handler>,
}

/// An ordered, immutable sequence of handlers
///
/// Traversal order is exactly construction order.
#[derive(Clone, Default)]
pub struct Chain {
    links: Arc<[Link]>,
}

impl Chain {
    /// Build a chain from handlers in the given order
    ///
    /// Each link is named after its handler's [`Handler::name`]. An empty
    /// list gives a valid chain that leaves every request unhandled.
    pub fn build<I>(handlers: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Handler>>,
    {
        let links: Vec<Link> = handlers
            .into_iter()
            .enumerate()
            .map(|(position, handler)| Link {
                name: link_name(handler.as_ref(), position),
                handler,
            })
            .collect();
        Self {
            links: links.into(),
        }
    }

    /// Start a chain with explicitly named links
    pub fn builder() -> ChainBuilder {
        ChainBuilder::default()
    }

    /// An empty chain
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Link names in traversal order
    pub fn names(&self) -> Vec<&str> {
        self.links.iter().map(|link| link.name.as_str()).collect()
    }

    pub(crate) fn links(&self) -> &[Link] {
        &self.links
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain").field("links", &self.names()).finish()
    }
}

/// Builder for chains with explicitly named links
///
/// ```
/// use cadence_core::HandlerError;
/// use cadence_router::{Chain, Request, Verdict};
///
/// let chain = Chain::builder()
///     .then_fn("first", |_: &Request| Ok::<_, HandlerError>(Verdict::Pass))
///     .then_fn("second", |_: &Request| Ok::<_, HandlerError>(Verdict::handled(1i64)))
///     .build();
/// assert_eq!(chain.names(), vec!["first", "second"]);
/// ```
#[derive(Default)]
pub struct ChainBuilder {
    links: Vec<Link>,
}

impl ChainBuilder {
    /// Append a handler, named after [`Handler::name`]
    pub fn then(self, handler: impl Handler + 'static) -> Self {
        let handler: Arc<dyn Handler> = Arc::new(handler);
        let name = link_name(handler.as_ref(), self.links.len());
        self.push(name, handler)
    }

    /// Append a handler under an explicit name
    pub fn then_named(self, name: impl Into<String>, handler: impl Handler + 'static) -> Self {
        self.push(name.into(), Arc::new(handler))
    }

    /// Append a closure under an explicit name
    pub fn then_fn<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Request) -> Result<Verdict, HandlerError> + Send + Sync + 'static,
    {
        self.push(name.into(), Arc::new(f))
    }

    /// Append a handler that is already shared with other chains
    pub fn then_shared(self, name: impl Into<String>, handler: Arc<dyn Handler>) -> Self {
        self.push(name.into(), handler)
    }

    /// Freeze the links into a chain
    pub fn build(self) -> Chain {
        Chain {
            links: self.links.into(),
        }
    }

    fn push(mut self, name: String, handler: Arc<dyn Handler>) -> Self {
        self.links.push(Link { name, handler });
        self
    }
}

/// Read a handler's name, falling back to its position if that faults
fn link_name(handler: &dyn Handler, position: usize) -> String {
    let fallback = format!("handler-{position}");
    match Fault::capture(fallback.clone(), || Ok(handler.name().to_string())) {
        Ok(name) => name,
        Err(fault) => {
            warn!(position, "handler name unreadable, using {fallback}: {}", fault.message);
            fallback
        }
    }
}
