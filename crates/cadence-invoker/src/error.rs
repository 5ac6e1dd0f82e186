//! Error types for cadence-invoker

use crate::outcome::CommandRecord;
use cadence_core::Fault;
use thiserror::Error;

/// Result type for invoker operations
pub type Result<T> = std::result::Result<T, InvokerError>;

/// Errors surfaced by the invoker
///
/// Apply failures are ordinary outcomes
/// ([`CommandOutcome::Failed`](crate::CommandOutcome::Failed)).
/// Only a failed revert is an error: the world may no longer match the
/// history, and the caller has to decide what to do about it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvokerError {
    #[error("revert of {record} failed: {}", .fault.message)]
    RevertFailed {
        record: CommandRecord,
        fault: Fault,
    },
}

impl InvokerError {
    /// The fault raised by the revert
    pub fn fault(&self) -> &Fault {
        match self {
            InvokerError::RevertFailed { fault, .. } => fault,
        }
    }
}

fn _assert_error_send_sync<T: Send + Sync>() {}
fn _error_is_send_sync() {
    _assert_error_send_sync::<InvokerError>();
}
