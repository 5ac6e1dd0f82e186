//! Outcomes of invoker operations

use cadence_core::telemetry::keys;
use cadence_core::{CommandId, Fault, TelemetryKind, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a command as reported in outcomes and telemetry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommandRecord {
    pub id: CommandId,
    pub name: String,
}

impl CommandRecord {
    pub(crate) fn payload(&self) -> Value {
        Value::map([
            (keys::COMMAND_ID, Value::from(self.id.raw())),
            (keys::COMMAND, Value::from(self.name.as_str())),
        ])
    }
}

impl fmt::Display for CommandRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Terminal result of `execute`, `undo` or `redo`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CommandOutcome {
    /// Applied and recorded in the history
    Executed(CommandRecord),
    /// Apply failed; the history was not touched
    Failed { record: CommandRecord, fault: Fault },
    Undone(CommandRecord),
    Redone(CommandRecord),
    NothingToUndo,
    NothingToRedo,
}

impl CommandOutcome {
    /// Telemetry kind this outcome is announced as
    pub fn kind(&self) -> TelemetryKind {
        match self {
            CommandOutcome::Executed(_) => TelemetryKind::Executed,
            CommandOutcome::Failed { .. } => TelemetryKind::Failed,
            CommandOutcome::Undone(_) => TelemetryKind::Undone,
            CommandOutcome::Redone(_) => TelemetryKind::Redone,
            CommandOutcome::NothingToUndo => TelemetryKind::NothingToUndo,
            CommandOutcome::NothingToRedo => TelemetryKind::NothingToRedo,
        }
    }

    /// The command involved, if any
    pub fn record(&self) -> Option<&CommandRecord> {
        match self {
            CommandOutcome::Executed(record)
            | CommandOutcome::Undone(record)
            | CommandOutcome::Redone(record)
            | CommandOutcome::Failed { record, .. } => Some(record),
            CommandOutcome::NothingToUndo | CommandOutcome::NothingToRedo => None,
        }
    }

    /// True when the history moved
    pub fn changed_history(&self) -> bool {
        matches!(
            self,
            CommandOutcome::Executed(_) | CommandOutcome::Undone(_) | CommandOutcome::Redone(_)
        )
    }

    /// The fault behind a `Failed` outcome
    pub fn fault(&self) -> Option<&Fault> {
        match self {
            CommandOutcome::Failed { fault, .. } => Some(fault),
            _ => None,
        }
    }
}

impl fmt::Display for CommandOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandOutcome::Failed { record, fault } => {
                write!(f, "failed: {} ({})", record, fault.message)
            }
            other => match other.record() {
                Some(record) => write!(f, "{}: {}", other.kind(), record),
                None => write!(f, "{}", other.kind()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> CommandRecord {
        CommandRecord {
            id: CommandId::new(4),
            name: "set".to_string(),
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(CommandOutcome::Executed(record()).to_string(), "executed: set (cmd:4)");
        assert_eq!(CommandOutcome::NothingToRedo.to_string(), "nothing-to-redo");
    }

    #[test]
    fn test_payload_fields() {
        let payload = record().payload();
        assert_eq!(payload.get(keys::COMMAND_ID), Some(&Value::Int(4)));
        assert_eq!(payload.require_str(keys::COMMAND), Ok("set"));
    }

    #[test]
    fn test_changed_history() {
        assert!(CommandOutcome::Undone(record()).changed_history());
        assert!(!CommandOutcome::NothingToUndo.changed_history());
        assert!(CommandOutcome::NothingToUndo.record().is_none());
    }
}
