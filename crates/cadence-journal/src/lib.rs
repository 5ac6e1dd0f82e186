//! Cadence Journal - recording, auditing and export of coordination telemetry
//!
//! Every terminal outcome of an invoker or a router is published on the hub's
//! reserved namespace. This crate listens there:
//!
//! - **Journal**: a bounded recorder attached to a hub as a subscriber
//! - **Auditor**: reports and queries over what was recorded
//! - **Exporter**: RON, JSON (feature `serde_json`), CSV and text output
//!
//! # Example
//!
//! ```rust
//! use cadence_core::{TelemetryKind, Value};
//! use cadence_hub::Hub;
//! use cadence_journal::{Auditor, Exporter, Journal, JournalConfig};
//! use std::sync::Arc;
//!
//! let hub = Hub::new();
//! let journal = Arc::new(Journal::with_config(JournalConfig::recording()));
//! journal.attach(&hub);
//!
//! hub.publish(TelemetryKind::Unhandled.topic(), Value::Null);
//!
//! let report = Auditor::new(&journal).generate_report();
//! assert_eq!(report.unhandled_count, 1);
//!
//! let csv = Exporter::new(&journal).to_csv();
//! assert!(csv.contains("unhandled"));
//! ```

mod auditor;
mod config;
mod error;
mod exporter;
mod journal;

pub use auditor::{AuditQuery, AuditReport, Auditor};
pub use config::JournalConfig;
pub use error::{Error, Result};
pub use exporter::{ExportFormat, Exporter};
pub use journal::{Journal, JournalEntry, JournalStats};
