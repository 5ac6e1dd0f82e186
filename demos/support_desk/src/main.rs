//! Support Desk Demo
//!
//! A ticket queue edited through undoable commands, incoming requests routed
//! along an assistant -> customer -> senior chain, and a journal recording
//! everything the core reports on the hub.
//!
//! Run with `cargo run -p support_desk -- demos/support_desk/desk.ron` to load
//! a scope configuration; `RUST_LOG=debug` shows the core's own logging.

use cadence::prelude::*;
use cadence::{telemetry::keys, ExportFormat};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Open tickets, by title
type Queue = Arc<Mutex<Vec<String>>>;

/// Adds a ticket to the back of the queue
struct OpenTicket {
    queue: Queue,
    title: String,
}

impl Command for OpenTicket {
    fn apply(&mut self) -> Result<(), HandlerError> {
        let mut queue = self.queue.lock();
        if queue.contains(&self.title) {
            return Err(HandlerError::new(format!("ticket '{}' is already open", self.title)));
        }
        queue.push(self.title.clone());
        Ok(())
    }

    fn revert(&mut self) -> Result<(), HandlerError> {
        let mut queue = self.queue.lock();
        match queue.iter().rposition(|t| *t == self.title) {
            Some(index) => {
                queue.remove(index);
                Ok(())
            }
            None => Err(HandlerError::new(format!("ticket '{}' vanished", self.title))),
        }
    }

    fn name(&self) -> &str {
        "open_ticket"
    }
}

fn open(queue: &Queue, title: &str) -> OpenTicket {
    OpenTicket {
        queue: queue.clone(),
        title: title.to_string(),
    }
}

fn show(queue: &Queue) -> String {
    queue.lock().join(", ")
}

/// A desk that claims the request kinds it knows
fn desk(
    kinds: &'static [&'static str],
    reply: &'static str,
) -> impl Fn(&Request) -> Result<Verdict, HandlerError> {
    move |req: &Request| {
        if kinds.contains(&req.kind.as_str()) {
            Ok(Verdict::handled(reply))
        } else {
            Ok(Verdict::Pass)
        }
    }
}

fn main() -> cadence::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => CadenceConfig::from_path(path)?,
        None => CadenceConfig::default().with_journal(),
    };
    let scope = Coordinator::from_config(config);
    info!(hub = %scope.hub().config().label(), "support desk ready");

    println!("=== Cadence Support Desk Demo ===\n");

    // A plain observer on the reserved namespace
    scope
        .hub()
        .subscribe_fn(TelemetryKind::Unhandled.topic(), |event: &Event| {
            let kind = event.payload.require_str(keys::REQUEST_KIND)?;
            println!("  [observer] nobody could handle a '{}' request", kind);
            Ok(())
        });

    // Undoable edits
    println!("Ticket queue:");
    let queue: Queue = Arc::default();
    for title in ["printer jam", "vpn access", "printer jam", "new laptop"] {
        let outcome = scope.execute(open(&queue, title));
        println!("  {:<40} queue=[{}]", outcome.to_string(), show(&queue));
    }

    let undone = scope.undo()?;
    println!("  {:<40} queue=[{}]", undone.to_string(), show(&queue));
    let redone = scope.redo();
    println!("  {:<40} queue=[{}]", redone.to_string(), show(&queue));
    println!("  history: {:?}\n", scope.invoker().stats());

    // Routed requests
    println!("Requests:");
    let chain = Chain::builder()
        .then_fn("assistant", desk(&["faq", "password"], "self-service article sent"))
        .then_fn("customer", desk(&["moderate", "refund"], "customer desk on it"))
        .then_fn("senior", desk(&["moderate", "legal"], "escalated to senior staff"))
        .build();
    println!("  chain: {}", chain.names().join(" -> "));

    for kind in ["password", "moderate", "legal", "unknown"] {
        let outcome = scope.dispatch(&chain, &Request::new(kind));
        match outcome.response() {
            Some(response) => println!(
                "  {:<10} -> {} ({})",
                kind,
                outcome.handled_by().unwrap_or("?"),
                response
            ),
            None => println!("  {:<10} -> unhandled", kind),
        }
    }

    // What the journal saw
    if scope.journal().is_some() {
        println!("\n{}", scope.audit()?);
        println!("{}", scope.export(ExportFormat::Text)?);
    }

    Ok(())
}
