//! Reserved telemetry topics
//!
//! Every terminal outcome of the invoker and the router is published on one
//! of these topics. External loggers and metrics collectors subscribe to them
//! like any other observer; this is the only telemetry extension point.
//!
//! Payloads are `Value::Map`s using the field names in [`keys`].

use crate::error::{Error, Result};
use crate::Topic;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Field names used in telemetry payloads
pub mod keys {
    pub const COMMAND_ID: &str = "command_id";
    pub const COMMAND: &str = "command";
    pub const ERROR: &str = "error";
    /// `"execute"` or `"redo"` on a failed apply
    pub const PHASE: &str = "phase";
    pub const DISCARDED: &str = "discarded";
    /// `"undoable"` or `"redoable"` on an eviction
    pub const SIDE: &str = "side";
    pub const REQUEST_ID: &str = "request_id";
    pub const REQUEST_KIND: &str = "kind";
    pub const REQUEST_BODY: &str = "body";
    pub const REQUEST_PARAMS: &str = "params";
    pub const FAULTS: &str = "faults";
}

/// Kind of terminal outcome announced on the reserved namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TelemetryKind {
    /// A command applied successfully and entered the history
    Executed,
    /// A command's apply failed, on execute or on redo
    Failed,
    Undone,
    Redone,
    NothingToUndo,
    NothingToRedo,
    /// A revert failed; the history may be inconsistent with the world
    RevertFailed,
    /// The oldest undoable command was dropped by the depth bound
    Evicted,
    /// The history was explicitly cleared
    Cleared,
    /// A request fell through every handler of a chain
    Unhandled,
}

impl TelemetryKind {
    /// All kinds, in declaration order
    pub const ALL: [TelemetryKind; 10] = [
        TelemetryKind::Executed,
        TelemetryKind::Failed,
        TelemetryKind::Undone,
        TelemetryKind::Redone,
        TelemetryKind::NothingToUndo,
        TelemetryKind::NothingToRedo,
        TelemetryKind::RevertFailed,
        TelemetryKind::Evicted,
        TelemetryKind::Cleared,
        TelemetryKind::Unhandled,
    ];

    /// Topic name this kind is published on
    pub fn topic_name(&self) -> &'static str {
        match self {
            TelemetryKind::Executed => "cadence.command.executed",
            TelemetryKind::Failed => "cadence.command.failed",
            TelemetryKind::Undone => "cadence.command.undone",
            TelemetryKind::Redone => "cadence.command.redone",
            TelemetryKind::NothingToUndo => "cadence.command.nothing_to_undo",
            TelemetryKind::NothingToRedo => "cadence.command.nothing_to_redo",
            TelemetryKind::RevertFailed => "cadence.command.revert_failed",
            TelemetryKind::Evicted => "cadence.command.evicted",
            TelemetryKind::Cleared => "cadence.command.cleared",
            TelemetryKind::Unhandled => "cadence.router.unhandled",
        }
    }

    /// Topic this kind is published on
    pub fn topic(&self) -> Topic {
        Topic::new(self.topic_name())
    }

    /// Recover the kind from a reserved topic
    ///
    /// ```
    /// use cadence_core::{TelemetryKind, Topic};
    ///
    /// let topic = TelemetryKind::Undone.topic();
    /// assert_eq!(TelemetryKind::from_topic(&topic), Ok(TelemetryKind::Undone));
    /// assert!(TelemetryKind::from_topic(&Topic::new("orders")).is_err());
    /// ```
    pub fn from_topic(topic: &Topic) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.topic_name() == topic.as_str())
            .ok_or_else(|| Error::UnknownTelemetry(topic.to_string()))
    }

    /// Whether this kind reports something going wrong
    pub fn is_failure(&self) -> bool {
        matches!(self, TelemetryKind::Failed | TelemetryKind::RevertFailed)
    }

    /// Short label, e.g. `nothing-to-undo`
    pub fn label(&self) -> &'static str {
        match self {
            TelemetryKind::Executed => "executed",
            TelemetryKind::Failed => "failed",
            TelemetryKind::Undone => "undone",
            TelemetryKind::Redone => "redone",
            TelemetryKind::NothingToUndo => "nothing-to-undo",
            TelemetryKind::NothingToRedo => "nothing-to-redo",
            TelemetryKind::RevertFailed => "revert-failed",
            TelemetryKind::Evicted => "evicted",
            TelemetryKind::Cleared => "cleared",
            TelemetryKind::Unhandled => "unhandled",
        }
    }
}

impl fmt::Display for TelemetryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
