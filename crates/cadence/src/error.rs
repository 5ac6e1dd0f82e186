//! Error types for the cadence facade

use thiserror::Error;

/// Result type for facade operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the facade
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration text is not valid RON
    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    /// A revert failed during undo
    #[error(transparent)]
    Invoker(#[from] cadence_invoker::InvokerError),

    /// Journal export failed
    #[error(transparent)]
    Journal(#[from] cadence_journal::Error),

    /// No journal is configured for this coordinator
    #[error("journal is not enabled")]
    JournalDisabled,
}

fn _assert_error_send_sync<T: Send + Sync>() {}
fn _error_is_send_sync() {
    _assert_error_send_sync::<Error>();
}
