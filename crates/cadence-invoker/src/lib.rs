//! Cadence Invoker - undoable command execution
//!
//! The invoker applies commands, keeps them in a bounded linear history and
//! reports every terminal outcome to a [`Hub`](cadence_hub::Hub) on the
//! reserved telemetry topics.
//!
//! # Example
//!
//! ```rust
//! use cadence_hub::Hub;
//! use cadence_invoker::{CommandOutcome, FnCommand, Invoker};
//! use std::sync::atomic::{AtomicI64, Ordering};
//! use std::sync::Arc;
//!
//! let hub = Arc::new(Hub::new());
//! let invoker = Invoker::new(hub);
//! let counter = Arc::new(AtomicI64::new(0));
//!
//! let (up, down) = (counter.clone(), counter.clone());
//! let outcome = invoker.execute(FnCommand::new(
//!     "increment",
//!     move || { up.fetch_add(1, Ordering::SeqCst); Ok(()) },
//!     move || { down.fetch_sub(1, Ordering::SeqCst); Ok(()) },
//! ));
//! assert!(matches!(outcome, CommandOutcome::Executed(_)));
//! assert_eq!(counter.load(Ordering::SeqCst), 1);
//!
//! invoker.undo().unwrap();
//! assert_eq!(counter.load(Ordering::SeqCst), 0);
//! ```

mod command;
mod config;
mod error;
mod invoker;
mod outcome;

pub use command::{Command, FnCommand};
pub use config::InvokerConfig;
pub use error::{InvokerError, Result};
pub use invoker::Invoker;
pub use outcome::{CommandOutcome, CommandRecord};

pub use cadence_history::{HistoryStats, Side};
