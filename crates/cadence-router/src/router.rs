//! Router - walks a chain until one handler claims the request
//!
//! The router holds no per-request state and never locks: chains are
//! immutable and shared, so any number of threads may dispatch through the
//! same chain at once. Only an unhandled request touches the hub.

use crate::chain::Chain;
use crate::handler::Verdict;
use crate::outcome::{Resolution, RouteOutcome};
use crate::request::Request;
use cadence_core::telemetry::keys;
use cadence_core::{Fault, TelemetryKind, Value};
use cadence_hub::Hub;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Dispatches requests through handler chains
#[derive(Debug, Clone)]
pub struct Router {
    hub: Arc<Hub>,
}

impl Router {
    /// Create a router announcing on `hub`
    pub fn new(hub: Arc<Hub>) -> Self {
        Self { hub }
    }

    /// The hub unhandled requests are announced on
    pub fn hub(&self) -> &Arc<Hub> {
        &self.hub
    }

    /// Offer `request` to each handler of `chain` in order
    ///
    /// The first handler answering [`Verdict::Handled`] ends the walk. A
    /// handler that errors or panics is treated as a pass and recorded in
    /// the outcome's diagnostics. If no handler claims the request,
    /// `unhandled` is published and the outcome says so; no default
    /// response is ever made up.
    pub fn dispatch(&self, chain: &Chain, request: &Request) -> RouteOutcome {
        let mut diagnostics = Vec::new();

        for (position, link) in chain.links().iter().enumerate() {
            match Fault::capture(link.name.clone(), || link.handler.try_handle(request)) {
                Ok(Verdict::Handled(response)) => {
                    debug!(
                        request = %request.id,
                        kind = %request.kind,
                        handler = %link.name,
                        position,
                        "Router::dispatch handled"
                    );
                    return RouteOutcome {
                        request: request.id,
                        resolution: Resolution::Handled {
                            handler: link.name.clone(),
                            position,
                            response,
                        },
                        diagnostics,
                    };
                }
                Ok(Verdict::Pass) => {}
                Err(fault) => {
                    warn!(
                        request = %request.id,
                        handler = %link.name,
                        panicked = fault.panicked,
                        "handler fault treated as pass: {}",
                        fault.message
                    );
                    diagnostics.push(fault);
                }
            }
        }

        info!(
            request = %request.id,
            kind = %request.kind,
            handlers = chain.len(),
            "request unhandled"
        );
        self.announce_unhandled(request, &diagnostics);
        RouteOutcome {
            request: request.id,
            resolution: Resolution::Unhandled,
            diagnostics,
        }
    }

    fn announce_unhandled(&self, request: &Request, diagnostics: &[Fault]) {
        let faults: Vec<Value> = diagnostics
            .iter()
            .map(|fault| Value::from(fault.to_string()))
            .collect();
        let payload = Value::map([
            (keys::REQUEST_ID, Value::from(request.id.raw())),
            (keys::REQUEST_KIND, Value::from(request.kind.as_str())),
            (keys::REQUEST_BODY, request.body.clone()),
            (keys::REQUEST_PARAMS, Value::Map(request.params.clone())),
            (keys::FAULTS, Value::List(faults)),
        ]);
        self.hub.publish(TelemetryKind::Unhandled.topic(), payload);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::Handler;
    use cadence_core::{Event, HandlerError};
    use parking_lot::Mutex;

    /// Claims requests whose kind is in its list
    struct Desk {
        name: &'static str,
        kinds: &'static [&'static str],
    }

    impl Handler for Desk {
        fn try_handle(&self, request: &Request) -> Result<Verdict, HandlerError> {
            if self.kinds.contains(&request.kind.as_str()) {
                Ok(Verdict::handled(format!("{} took {}", self.name, request.kind)))
            } else {
                Ok(Verdict::Pass)
            }
        }

        fn name(&self) -> &str {
            self.name
        }
    }

    fn support_chain() -> Chain {
        Chain::builder()
            .then(Desk { name: "assistant", kinds: &["faq"] })
            .then(Desk { name: "customer", kinds: &["moderate", "refund"] })
            .then(Desk { name: "senior", kinds: &["moderate", "escalate"] })
            .build()
    }

    fn watch_unhandled(hub: &Hub) -> Arc<Mutex<Vec<Event>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        hub.subscribe_fn(TelemetryKind::Unhandled.topic(), move |event: &Event| {
            sink.lock().push(event.clone());
            Ok(())
        });
        seen
    }

    #[test]
    fn test_first_capable_handler_wins() {
        let router = Router::new(Arc::new(Hub::new()));
        let outcome = router.dispatch(&support_chain(), &Request::new("moderate"));

        assert_eq!(outcome.handled_by(), Some("customer"));
        assert_eq!(outcome.response(), Some(&Value::from("customer took moderate")));
        assert!(matches!(outcome.resolution, Resolution::Handled { position: 1, .. }));
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn test_unhandled_is_announced() {
        let hub = Arc::new(Hub::new());
        let seen = watch_unhandled(&hub);
        let router = Router::new(hub);

        let request = Request::new("unknown")
            .with_body("lost")
            .with_param("amount", 400i64);
        let outcome = router.dispatch(&support_chain(), &request);

        assert!(!outcome.is_handled());
        assert_eq!(outcome.response(), None);
        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].payload.require_str(keys::REQUEST_KIND), Ok("unknown"));
        assert_eq!(seen[0].payload.require_str(keys::REQUEST_BODY), Ok("lost"));
        assert_eq!(
            seen[0].payload.get(keys::REQUEST_ID),
            Some(&Value::from(request.id.raw()))
        );
        let params = seen[0].payload.get(keys::REQUEST_PARAMS);
        assert_eq!(
            params.and_then(|p| p.get("amount")),
            Some(&Value::Int(400))
        );
    }

    #[test]
    fn test_handled_request_publishes_nothing() {
        let hub = Arc::new(Hub::new());
        let seen = watch_unhandled(&hub);
        let router = Router::new(hub);
        router.dispatch(&support_chain(), &Request::new("faq"));
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_dispatch_is_deterministic() {
        let router = Router::new(Arc::new(Hub::new()));
        let chain = support_chain();
        let request = Request::new("moderate");
        let first = router.dispatch(&chain, &request);
        for _ in 0..10 {
            assert_eq!(router.dispatch(&chain, &request), first);
        }
    }

    #[test]
    fn test_faulting_handlers_count_as_pass() {
        let hub = Arc::new(Hub::new());
        let seen = watch_unhandled(&hub);
        let router = Router::new(hub);
        let chain = Chain::builder()
            .then_fn("erroring", |_: &Request| Err(HandlerError::new("db down")))
            .then_fn("panicking", |_: &Request| -> Result<Verdict, HandlerError> {
                panic!("handler exploded")
            })
            .then(Desk { name: "fallback", kinds: &["refund"] })
            .build();

        let outcome = router.dispatch(&chain, &Request::new("refund"));
        assert_eq!(outcome.handled_by(), Some("fallback"));
        assert_eq!(outcome.diagnostics.len(), 2);
        assert_eq!(outcome.diagnostics[0].source, "erroring");
        assert!(!outcome.diagnostics[0].panicked);
        assert!(outcome.diagnostics[1].panicked);

        let outcome = router.dispatch(&chain, &Request::new("other"));
        assert!(!outcome.is_handled());
        let faults = seen.lock()[0].payload.get(keys::FAULTS).cloned();
        assert_eq!(faults.as_ref().and_then(Value::as_list).map(|l| l.len()), Some(2));
    }

    #[test]
    fn test_empty_chain_leaves_request_unhandled() {
        let hub = Arc::new(Hub::new());
        let seen = watch_unhandled(&hub);
        let router = Router::new(hub);

        let outcome = router.dispatch(&Chain::empty(), &Request::new("anything"));
        assert_eq!(outcome.resolution, Resolution::Unhandled);
        assert_eq!(seen.lock().len(), 1);
    }

    #[test]
    fn test_params_visible_to_handlers() {
        let router = Router::new(Arc::new(Hub::new()));
        let chain = Chain::builder()
            .then_fn("limit", |req: &Request| {
                let amount = req.param("amount").and_then(Value::as_int).unwrap_or(0);
                Ok::<_, HandlerError>(if amount <= 100 {
                    Verdict::handled(amount)
                } else {
                    Verdict::Pass
                })
            })
            .build();

        let small = Request::new("refund").with_param("amount", 40i64);
        let large = Request::new("refund").with_param("amount", 400i64);
        assert_eq!(router.dispatch(&chain, &small).response(), Some(&Value::Int(40)));
        assert!(!router.dispatch(&chain, &large).is_handled());
    }

    #[test]
    fn test_concurrent_dispatch_on_shared_chain() {
        let router = Router::new(Arc::new(Hub::new()));
        let chain = support_chain();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let router = router.clone();
                let chain = chain.clone();
                std::thread::spawn(move || {
                    (0..50)
                        .map(|_| router.dispatch(&chain, &Request::new("escalate")))
                        .filter(|outcome| outcome.handled_by() == Some("senior"))
                        .count()
                })
            })
            .collect();

        let total: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(total, 200);
    }
}
