//! Invoker - executes commands and owns their undo/redo history
//!
//! One mutex per invoker serializes `execute`, `undo`, `redo` and `clear`,
//! so concurrent callers queue and the history keeps a total order.
//! Telemetry is published after the lock is released: hub subscribers may
//! call back into the invoker.

use crate::command::Command;
use crate::config::InvokerConfig;
use crate::error::{InvokerError, Result};
use crate::outcome::{CommandOutcome, CommandRecord};
use cadence_core::telemetry::keys;
use cadence_core::{CommandId, Fault, TelemetryKind, Value};
use cadence_history::{Displaced, History, HistoryStats, Side};
use cadence_hub::Hub;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Recorded name of a command whose own `name` faulted
const UNNAMED_COMMAND: &str = "unnamed-command";

/// A command owned by the history
struct Entry {
    record: CommandRecord,
    command: Box<dyn Command>,
}

/// Executes commands and keeps a bounded, linear undo/redo history
pub struct Invoker {
    hub: Arc<Hub>,
    history: Mutex<History<Entry>>,
}

impl Invoker {
    /// Create an invoker with the default configuration
    pub fn new(hub: Arc<Hub>) -> Self {
        Self::with_config(hub, InvokerConfig::default())
    }

    /// Create an invoker reporting to `hub`
    pub fn with_config(hub: Arc<Hub>, config: InvokerConfig) -> Self {
        Self {
            hub,
            history: Mutex::new(History::new(config.max_depth())),
        }
    }

    /// The hub this invoker reports to
    pub fn hub(&self) -> &Arc<Hub> {
        &self.hub
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Apply a command and record it
    ///
    /// On success the command lands at the cursor, the redo branch is
    /// discarded and `executed` is published. On failure the history is left
    /// untouched and `failed` is published.
    pub fn execute(&self, command: impl Command + 'static) -> CommandOutcome {
        self.execute_boxed(Box::new(command))
    }

    /// Apply an already boxed command
    ///
    /// A command whose name cannot be read is never applied; it is reported
    /// as `Failed` under a placeholder name.
    pub fn execute_boxed(&self, mut command: Box<dyn Command>) -> CommandOutcome {
        let id = CommandId::next();
        let record = match Fault::capture(UNNAMED_COMMAND, || Ok(command.name().to_string())) {
            Ok(name) => CommandRecord { id, name },
            Err(fault) => {
                let record = CommandRecord {
                    id,
                    name: UNNAMED_COMMAND.to_string(),
                };
                let outcome = CommandOutcome::Failed { record, fault };
                debug!(outcome = %outcome, "Invoker::execute");
                self.announce(&outcome);
                return outcome;
            }
        };

        let mut history = self.history.lock();
        let applied = Fault::capture(record.name.clone(), || command.apply());
        let (outcome, displaced) = match applied {
            Ok(()) => {
                let displaced = history.push(Entry {
                    record: record.clone(),
                    command,
                });
                (CommandOutcome::Executed(record), displaced)
            }
            Err(fault) => (CommandOutcome::Failed { record, fault }, Displaced::default()),
        };
        drop(history);

        debug!(outcome = %outcome, discarded = displaced.discarded.len(), "Invoker::execute");
        self.announce(&outcome);
        self.announce_evicted(displaced.evicted, Side::Undoable);
        outcome
    }

    /// Revert the command behind the cursor
    ///
    /// With nothing to undo this is a no-op reported as `NothingToUndo`. A
    /// failing revert leaves the cursor where it was, publishes
    /// `revert_failed` and is returned as an error.
    pub fn undo(&self) -> Result<CommandOutcome> {
        let step = self.history.lock().try_undo(|entry| {
            let source = entry.record.name.clone();
            match Fault::capture(source, || entry.command.revert()) {
                Ok(()) => Ok(entry.record.clone()),
                Err(fault) => Err((entry.record.clone(), fault)),
            }
        });

        match step {
            None => {
                let outcome = CommandOutcome::NothingToUndo;
                debug!(outcome = %outcome, "Invoker::undo");
                self.announce(&outcome);
                Ok(outcome)
            }
            Some(Ok(record)) => {
                let outcome = CommandOutcome::Undone(record);
                debug!(outcome = %outcome, "Invoker::undo");
                self.announce(&outcome);
                Ok(outcome)
            }
            Some(Err((record, fault))) => {
                error!(
                    command = %record,
                    panicked = fault.panicked,
                    "revert failed: {}",
                    fault.message
                );
                let mut payload = record.payload();
                if let Value::Map(map) = &mut payload {
                    map.insert(keys::ERROR.to_string(), Value::from(fault.message.as_str()));
                }
                self.hub.publish(TelemetryKind::RevertFailed.topic(), payload);
                Err(InvokerError::RevertFailed { record, fault })
            }
        }
    }

    /// Re-apply the command ahead of the cursor
    ///
    /// With nothing to redo this is a no-op reported as `NothingToRedo`. A
    /// failing re-apply leaves the cursor in place and is reported as
    /// `Failed`.
    pub fn redo(&self) -> CommandOutcome {
        let step = self.history.lock().try_redo(|entry| {
            let source = entry.record.name.clone();
            match Fault::capture(source, || entry.command.apply()) {
                Ok(()) => Ok(entry.record.clone()),
                Err(fault) => Err((entry.record.clone(), fault)),
            }
        });

        let outcome = match step {
            None => CommandOutcome::NothingToRedo,
            Some(Ok(record)) => CommandOutcome::Redone(record),
            Some(Err((record, fault))) => CommandOutcome::Failed { record, fault },
        };
        debug!(outcome = %outcome, "Invoker::redo");
        self.announce_with_phase(&outcome, "redo");
        outcome
    }

    /// Forget the whole history without reverting anything
    ///
    /// Returns the number of commands dropped and publishes `cleared`.
    pub fn clear(&self) -> usize {
        let dropped = self.history.lock().clear().len();
        debug!(dropped, "Invoker::clear");
        self.hub.publish(
            TelemetryKind::Cleared.topic(),
            Value::map([(keys::DISCARDED, Value::from(dropped))]),
        );
        dropped
    }

    /// Change the depth bound at runtime
    ///
    /// Shrinking may drop commands from both ends of the history. Each one
    /// is announced on `evicted`, tagged with the side it was cut from.
    pub fn set_max_depth(&self, max_depth: usize) {
        let displaced = self.history.lock().set_max_depth(max_depth);
        debug!(
            max_depth,
            evicted = displaced.evicted.len(),
            discarded = displaced.discarded.len(),
            "Invoker::set_max_depth"
        );
        self.announce_evicted(displaced.evicted, Side::Undoable);
        self.announce_evicted(displaced.discarded, Side::Redoable);
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Whether a command sits behind the cursor
    pub fn can_undo(&self) -> bool {
        self.history.lock().undo_depth() > 0
    }

    /// Whether a command sits ahead of the cursor
    pub fn can_redo(&self) -> bool {
        self.history.lock().redo_depth() > 0
    }

    /// Number of commands that can be undone
    pub fn undo_depth(&self) -> usize {
        self.history.lock().undo_depth()
    }

    /// Number of commands that can be redone
    pub fn redo_depth(&self) -> usize {
        self.history.lock().redo_depth()
    }

    /// Maximum depth, `None` when unbounded
    pub fn max_depth(&self) -> Option<usize> {
        self.history.lock().capacity()
    }

    /// Recorded commands, oldest first, with their side of the cursor
    pub fn history(&self) -> Vec<(Side, CommandRecord)> {
        self.history
            .lock()
            .iter()
            .map(|(side, entry)| (side, entry.record.clone()))
            .collect()
    }

    /// Snapshot of the history counters
    pub fn stats(&self) -> HistoryStats {
        self.history.lock().stats()
    }

    // ========================================================================
    // Telemetry
    // ========================================================================

    fn announce(&self, outcome: &CommandOutcome) {
        self.announce_with_phase(outcome, "execute");
    }

    fn announce_with_phase(&self, outcome: &CommandOutcome, phase: &str) {
        let mut payload = match outcome.record() {
            Some(record) => record.payload(),
            None => Value::Map(Default::default()),
        };
        if let (CommandOutcome::Failed { fault, .. }, Value::Map(map)) = (outcome, &mut payload) {
            warn!(outcome = %outcome, phase, "command apply failed");
            map.insert(keys::ERROR.to_string(), Value::from(fault.message.as_str()));
            map.insert(keys::PHASE.to_string(), Value::from(phase));
        }
        self.hub.publish(outcome.kind().topic(), payload);
    }

    fn announce_evicted(&self, entries: Vec<Entry>, side: Side) {
        for entry in entries {
            debug!(command = %entry.record, side = side.as_str(), "Invoker: evicted command");
            let mut payload = entry.record.payload();
            if let Value::Map(map) = &mut payload {
                map.insert(keys::SIDE.to_string(), Value::from(side.as_str()));
            }
            self.hub.publish(TelemetryKind::Evicted.topic(), payload);
        }
    }
}

impl std::fmt::Debug for Invoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stats = self.stats();
        f.debug_struct("Invoker")
            .field("undo_depth", &stats.undo_depth)
            .field("redo_depth", &stats.redo_depth)
            .field("capacity", &stats.capacity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::FnCommand;
    use cadence_core::{Event, HandlerError};

    /// Sets a shared integer, remembering the previous value for revert
    struct SetValue {
        target: Arc<Mutex<i64>>,
        value: i64,
        previous: Option<i64>,
    }

    impl SetValue {
        fn new(target: &Arc<Mutex<i64>>, value: i64) -> Self {
            Self {
                target: target.clone(),
                value,
                previous: None,
            }
        }
    }

    impl Command for SetValue {
        fn apply(&mut self) -> std::result::Result<(), HandlerError> {
            let mut current = self.target.lock();
            self.previous = Some(*current);
            *current = self.value;
            Ok(())
        }

        fn revert(&mut self) -> std::result::Result<(), HandlerError> {
            let previous = self
                .previous
                .take()
                .ok_or_else(|| HandlerError::new("revert before apply"))?;
            *self.target.lock() = previous;
            Ok(())
        }

        fn name(&self) -> &str {
            "set_value"
        }
    }

    /// Collects the labels of telemetry events published on the hub
    fn watch(hub: &Hub) -> Arc<Mutex<Vec<TelemetryKind>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        for kind in TelemetryKind::ALL {
            let seen = seen.clone();
            hub.subscribe_fn(kind.topic(), move |event: &Event| {
                let kind = TelemetryKind::from_topic(&event.topic)?;
                seen.lock().push(kind);
                Ok(())
            });
        }
        seen
    }

    fn setup(max_depth: usize) -> (Arc<Hub>, Invoker, Arc<Mutex<i64>>) {
        let hub = Arc::new(Hub::new());
        let invoker = Invoker::with_config(hub.clone(), InvokerConfig::with_max_depth(max_depth));
        (hub, invoker, Arc::new(Mutex::new(0)))
    }

    #[test]
    fn test_set_value_undo_redo() {
        let (_hub, invoker, value) = setup(10);
        invoker.execute(SetValue::new(&value, 5));
        invoker.execute(SetValue::new(&value, 10));

        invoker.undo().unwrap();
        assert_eq!(*value.lock(), 5);

        invoker.redo();
        assert_eq!(*value.lock(), 10);
    }

    #[test]
    fn test_undo_restores_initial_state() {
        let (_hub, invoker, value) = setup(10);
        *value.lock() = 7;
        invoker.execute(SetValue::new(&value, 99));
        invoker.undo().unwrap();
        assert_eq!(*value.lock(), 7);
    }

    #[test]
    fn test_redo_branch_invalidation() {
        let (_hub, invoker, value) = setup(10);
        invoker.execute(SetValue::new(&value, 1));
        invoker.execute(SetValue::new(&value, 2));
        invoker.undo().unwrap();
        invoker.execute(SetValue::new(&value, 3));

        assert_eq!(invoker.redo(), CommandOutcome::NothingToRedo);
        assert_eq!(*value.lock(), 3);

        invoker.undo().unwrap();
        assert_eq!(*value.lock(), 1);
        invoker.redo();
        assert_eq!(*value.lock(), 3);
    }

    #[test]
    fn test_nothing_to_undo_or_redo() {
        let (hub, invoker, _value) = setup(10);
        let seen = watch(&hub);

        assert_eq!(invoker.undo(), Ok(CommandOutcome::NothingToUndo));
        assert_eq!(invoker.redo(), CommandOutcome::NothingToRedo);
        assert_eq!(
            *seen.lock(),
            vec![TelemetryKind::NothingToUndo, TelemetryKind::NothingToRedo]
        );
    }

    #[test]
    fn test_failed_apply_leaves_history_untouched() {
        let (hub, invoker, value) = setup(10);
        let seen = watch(&hub);
        invoker.execute(SetValue::new(&value, 1));

        let outcome = invoker.execute(FnCommand::new(
            "broken",
            || Err(HandlerError::new("validation failed")),
            || Ok(()),
        ));

        assert_eq!(outcome.fault().map(|f| f.message.as_str()), Some("validation failed"));
        assert_eq!(invoker.undo_depth(), 1);
        assert_eq!(*seen.lock(), vec![TelemetryKind::Executed, TelemetryKind::Failed]);
    }

    #[test]
    fn test_failed_payload_carries_error_and_phase() {
        let (hub, invoker, _value) = setup(10);
        let payloads = Arc::new(Mutex::new(Vec::new()));
        let sink = payloads.clone();
        hub.subscribe_fn(TelemetryKind::Failed.topic(), move |event: &Event| {
            sink.lock().push(event.payload.clone());
            Ok(())
        });

        invoker.execute(FnCommand::new("boom", || panic!("apply exploded"), || Ok(())));

        let payloads = payloads.lock();
        assert_eq!(payloads[0].require_str(keys::COMMAND), Ok("boom"));
        assert_eq!(payloads[0].require_str(keys::ERROR), Ok("apply exploded"));
        assert_eq!(payloads[0].require_str(keys::PHASE), Ok("execute"));
    }

    #[test]
    fn test_revert_failure_is_surfaced() {
        let (hub, invoker, _value) = setup(10);
        let seen = watch(&hub);
        invoker.execute(FnCommand::new(
            "sticky",
            || Ok(()),
            || Err(HandlerError::new("cannot revert")),
        ));

        let err = invoker.undo().unwrap_err();
        assert_eq!(err.fault().message, "cannot revert");
        assert_eq!(invoker.undo_depth(), 1);
        assert_eq!(invoker.redo_depth(), 0);
        assert_eq!(
            *seen.lock(),
            vec![TelemetryKind::Executed, TelemetryKind::RevertFailed]
        );
    }

    #[test]
    fn test_failed_redo_keeps_cursor() {
        let (hub, invoker, _value) = setup(10);
        let applied = Arc::new(Mutex::new(0));
        let counter = applied.clone();
        invoker.execute(FnCommand::new(
            "once",
            move || {
                let mut n = counter.lock();
                *n += 1;
                if *n > 1 {
                    return Err(HandlerError::new("already spent"));
                }
                Ok(())
            },
            || Ok(()),
        ));
        invoker.undo().unwrap();
        let seen = watch(&hub);

        let outcome = invoker.redo();
        assert!(matches!(outcome, CommandOutcome::Failed { .. }));
        assert_eq!(invoker.redo_depth(), 1);
        assert_eq!(*seen.lock(), vec![TelemetryKind::Failed]);
    }

    #[test]
    fn test_bounded_history_evicts_oldest() {
        let (hub, invoker, value) = setup(2);
        let seen = watch(&hub);
        for v in 1..=3 {
            invoker.execute(SetValue::new(&value, v));
        }

        assert_eq!(invoker.undo_depth(), 2);
        assert!(seen.lock().contains(&TelemetryKind::Evicted));

        invoker.undo().unwrap();
        invoker.undo().unwrap();
        assert_eq!(*value.lock(), 1);
        assert_eq!(invoker.undo(), Ok(CommandOutcome::NothingToUndo));
    }

    #[test]
    fn test_shrinking_announces_both_sides() {
        let (hub, invoker, value) = setup(10);
        for v in 1..=4 {
            invoker.execute(SetValue::new(&value, v));
        }
        invoker.undo().unwrap();
        invoker.undo().unwrap();

        let sides = Arc::new(Mutex::new(Vec::new()));
        let sink = sides.clone();
        hub.subscribe_fn(TelemetryKind::Evicted.topic(), move |event: &Event| {
            sink.lock().push(event.payload.require_str(keys::SIDE)?.to_string());
            Ok(())
        });

        invoker.set_max_depth(2);
        assert_eq!(*sides.lock(), vec!["undoable", "redoable"]);
        assert_eq!((invoker.undo_depth(), invoker.redo_depth()), (1, 1));

        invoker.redo();
        assert_eq!(*value.lock(), 3);
    }

    #[test]
    fn test_unreadable_name_is_a_failed_execute() {
        struct Nameless;

        impl Command for Nameless {
            fn apply(&mut self) -> std::result::Result<(), HandlerError> {
                panic!("apply must not run")
            }

            fn revert(&mut self) -> std::result::Result<(), HandlerError> {
                Ok(())
            }

            fn name(&self) -> &str {
                panic!("no name")
            }
        }

        let (hub, invoker, value) = setup(10);
        invoker.execute(SetValue::new(&value, 1));
        let seen = watch(&hub);

        let outcome = invoker.execute(Nameless);
        assert_eq!(outcome.fault().map(|f| f.message.as_str()), Some("no name"));
        assert_eq!(outcome.record().map(|r| r.name.as_str()), Some(UNNAMED_COMMAND));
        assert_eq!(invoker.undo_depth(), 1);
        assert_eq!(*seen.lock(), vec![TelemetryKind::Failed]);
    }

    #[test]
    fn test_clear() {
        let (hub, invoker, value) = setup(10);
        invoker.execute(SetValue::new(&value, 1));
        invoker.execute(SetValue::new(&value, 2));
        let seen = watch(&hub);

        assert_eq!(invoker.clear(), 2);
        assert!(!invoker.can_undo());
        assert!(!invoker.can_redo());
        assert_eq!(*value.lock(), 2);
        assert_eq!(*seen.lock(), vec![TelemetryKind::Cleared]);
    }

    #[test]
    fn test_history_listing() {
        let (_hub, invoker, value) = setup(10);
        invoker.execute(SetValue::new(&value, 1));
        invoker.execute(FnCommand::new("second", || Ok(()), || Ok(())));
        invoker.undo().unwrap();

        let listing: Vec<(Side, String)> = invoker
            .history()
            .into_iter()
            .map(|(side, record)| (side, record.name))
            .collect();
        assert_eq!(
            listing,
            vec![
                (Side::Undoable, "set_value".to_string()),
                (Side::Redoable, "second".to_string()),
            ]
        );
    }

    #[test]
    fn test_subscriber_may_reenter_invoker() {
        let hub = Arc::new(Hub::new());
        let invoker = Arc::new(Invoker::new(hub.clone()));
        let observed = Arc::new(Mutex::new(Vec::new()));

        let weak = Arc::downgrade(&invoker);
        let sink = observed.clone();
        hub.subscribe_fn(TelemetryKind::Executed.topic(), move |_: &Event| {
            if let Some(invoker) = weak.upgrade() {
                sink.lock().push(invoker.undo_depth());
            }
            Ok(())
        });

        invoker.execute(FnCommand::new("a", || Ok(()), || Ok(())));
        invoker.execute(FnCommand::new("b", || Ok(()), || Ok(())));
        assert_eq!(*observed.lock(), vec![1, 2]);
    }

    #[test]
    fn test_concurrent_execute_keeps_total_order() {
        let hub = Arc::new(Hub::new());
        let invoker = Arc::new(Invoker::with_config(hub, InvokerConfig::unbounded()));
        let total = Arc::new(Mutex::new(0i64));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let invoker = invoker.clone();
                let total = total.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        let (up, down) = (total.clone(), total.clone());
                        invoker.execute(FnCommand::new(
                            "add",
                            move || {
                                *up.lock() += 1;
                                Ok(())
                            },
                            move || {
                                *down.lock() -= 1;
                                Ok(())
                            },
                        ));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(*total.lock(), 100);
        assert_eq!(invoker.undo_depth(), 100);
        while invoker.can_undo() {
            invoker.undo().unwrap();
        }
        assert_eq!(*total.lock(), 0);
    }
}
