//! Cadence - behavioral coordination core
//!
//! Three patterns in one in-process runtime:
//!
//! - **Notification hub** ([`Hub`]): topic-based publish/subscribe with
//!   snapshot delivery and per-subscriber fault isolation
//! - **Command invoker** ([`Invoker`]): undoable commands with a bounded,
//!   linear undo/redo history
//! - **Responsibility router** ([`Router`]): requests walk an immutable
//!   handler [`Chain`] until one handler claims them
//!
//! The invoker and the router report every terminal outcome to the hub on
//! the reserved `cadence.*` topics, where a [`Journal`] (or any other
//! subscriber) can pick them up.
//!
//! # Example
//!
//! ```rust
//! use cadence::prelude::*;
//!
//! let scope = Coordinator::from_config(CadenceConfig::default().with_journal());
//!
//! scope.execute(FnCommand::new("noop", || Ok(()), || Ok(())));
//! let chain = Chain::builder()
//!     .then_fn("echo", |req: &Request| Ok::<_, HandlerError>(Verdict::handled(req.kind.as_str())))
//!     .build();
//! let outcome = scope.dispatch(&chain, &Request::new("ping"));
//! assert_eq!(outcome.response(), Some(&Value::from("ping")));
//!
//! let report = scope.audit().unwrap();
//! assert_eq!(report.kind_counts[&TelemetryKind::Executed], 1);
//! ```

mod config;
mod coordinator;
mod error;

pub use config::CadenceConfig;
pub use coordinator::Coordinator;
pub use error::{Error, Result};

pub use cadence_core::{
    panic_message, telemetry, CommandId, Event, Fault, HandlerError, RequestId, SubscriptionId,
    TelemetryKind, Topic, Value, ValueMap, RESERVED_PREFIX,
};
pub use cadence_history::{Displaced, History, HistoryStats, Side};
pub use cadence_hub::{DeliveryResult, DeliveryStatus, Hub, HubConfig, PublishOutcome, Subscriber};
pub use cadence_invoker::{
    Command, CommandOutcome, CommandRecord, FnCommand, Invoker, InvokerConfig, InvokerError,
};
pub use cadence_journal::{
    AuditQuery, AuditReport, Auditor, ExportFormat, Exporter, Journal, JournalConfig,
    JournalEntry, JournalStats,
};
pub use cadence_router::{
    Chain, ChainBuilder, Handler, Request, Resolution, RouteOutcome, Router, Verdict,
};

/// The types most programs need
pub mod prelude {
    pub use crate::{
        CadenceConfig, Chain, Command, CommandOutcome, Coordinator, Event, FnCommand,
        HandlerError, Hub, Invoker, Journal, Request, RouteOutcome, Router, Subscriber,
        TelemetryKind, Topic, Value, Verdict,
    };
}
