//! Auditing and analytics for recorded telemetry

use crate::journal::{Journal, JournalEntry};
use cadence_core::TelemetryKind;
use std::collections::BTreeMap;

/// Auditor for querying and analyzing journal data
///
/// Works on a snapshot taken at construction; later recordings are not seen.
pub struct Auditor {
    entries: Vec<JournalEntry>,
    dropped: u64,
}

impl Auditor {
    /// Create a new auditor over a snapshot of the journal
    pub fn new(journal: &Journal) -> Self {
        Self {
            entries: journal.entries(),
            dropped: journal.stats().dropped,
        }
    }

    /// Audit an arbitrary list of entries
    pub fn from_entries(entries: Vec<JournalEntry>) -> Self {
        Self { entries, dropped: 0 }
    }

    /// Generate a comprehensive audit report
    pub fn generate_report(&self) -> AuditReport {
        let mut kind_counts: BTreeMap<TelemetryKind, u64> = BTreeMap::new();
        let mut executed_by_command: BTreeMap<String, u64> = BTreeMap::new();

        for entry in &self.entries {
            *kind_counts.entry(entry.kind).or_insert(0) += 1;
            if entry.kind == TelemetryKind::Executed {
                if let Some(name) = entry.command() {
                    *executed_by_command.entry(name.to_string()).or_insert(0) += 1;
                }
            }
        }

        AuditReport {
            total_entries: self.entries.len(),
            dropped: self.dropped,
            failure_count: self.entries.iter().filter(|e| e.kind.is_failure()).count(),
            unhandled_count: self.count(TelemetryKind::Unhandled),
            first_seq: self.entries.first().map(|e| e.seq),
            last_seq: self.entries.last().map(|e| e.seq),
            kind_counts,
            executed_by_command,
        }
    }

    /// Query entries matching specific criteria
    pub fn query(&self, query: &AuditQuery) -> Vec<&JournalEntry> {
        self.entries.iter().filter(|e| query.matches(e)).collect()
    }

    /// Entries of one telemetry kind, oldest first
    pub fn by_kind(&self, kind: TelemetryKind) -> Vec<&JournalEntry> {
        self.query(&AuditQuery::kind(kind))
    }

    /// Every entry mentioning the named command
    pub fn by_command(&self, name: &str) -> Vec<&JournalEntry> {
        self.query(&AuditQuery::command(name))
    }

    /// Failed applies and failed reverts
    pub fn failures(&self) -> Vec<&JournalEntry> {
        self.entries.iter().filter(|e| e.kind.is_failure()).collect()
    }

    pub fn count(&self, kind: TelemetryKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }

    /// Distinct command names, sorted
    pub fn unique_commands(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.iter().filter_map(JournalEntry::command).collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}

/// A comprehensive audit report
#[derive(Debug, Clone, PartialEq)]
pub struct AuditReport {
    pub total_entries: usize,
    /// Entries lost to the journal's size bound
    pub dropped: u64,
    pub failure_count: usize,
    pub unhandled_count: usize,
    pub first_seq: Option<u64>,
    pub last_seq: Option<u64>,
    pub kind_counts: BTreeMap<TelemetryKind, u64>,
    /// Successful executions grouped by command name
    pub executed_by_command: BTreeMap<String, u64>,
}

impl std::fmt::Display for AuditReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Audit Report ===")?;
        writeln!(f, "Total entries: {}", self.total_entries)?;
        if self.dropped > 0 {
            writeln!(f, "Dropped: {}", self.dropped)?;
        }
        writeln!(f, "Failures: {}", self.failure_count)?;
        writeln!(f, "Unhandled requests: {}", self.unhandled_count)?;

        if let (Some(first), Some(last)) = (self.first_seq, self.last_seq) {
            writeln!(f, "Seq range: {} - {}", first, last)?;
        }

        if !self.kind_counts.is_empty() {
            writeln!(f, "\nOutcomes by kind:")?;
            let mut sorted: Vec<_> = self.kind_counts.iter().collect();
            sorted.sort_by_key(|(_, count)| std::cmp::Reverse(**count));
            for (kind, count) in sorted {
                writeln!(f, "  {}: {}", kind, count)?;
            }
        }

        if !self.executed_by_command.is_empty() {
            writeln!(f, "\nExecuted by command:")?;
            for (name, count) in &self.executed_by_command {
                writeln!(f, "  {}: {}", name, count)?;
            }
        }

        Ok(())
    }
}

/// Query criteria for filtering journal entries
#[derive(Debug, Clone, Default)]
pub struct AuditQuery {
    pub kind: Option<TelemetryKind>,
    pub command: Option<String>,
    /// Start seq (inclusive)
    pub since_seq: Option<u64>,
    /// End seq (inclusive)
    pub until_seq: Option<u64>,
    pub failures_only: bool,
}

impl AuditQuery {
    /// Match entries of one kind
    pub fn kind(kind: TelemetryKind) -> Self {
        Self {
            kind: Some(kind),
            ..Default::default()
        }
    }

    /// Match entries about the named command
    pub fn command(name: impl Into<String>) -> Self {
        Self {
            command: Some(name.into()),
            ..Default::default()
        }
    }

    /// Restrict to sequence numbers in `since..=until`
    pub fn between(mut self, since: u64, until: u64) -> Self {
        self.since_seq = Some(since);
        self.until_seq = Some(until);
        self
    }

    fn matches(&self, entry: &JournalEntry) -> bool {
        if self.kind.is_some_and(|kind| kind != entry.kind) {
            return false;
        }
        if let Some(ref name) = self.command {
            if entry.command() != Some(name.as_str()) {
                return false;
            }
        }
        if self.since_seq.is_some_and(|since| entry.seq < since) {
            return false;
        }
        if self.until_seq.is_some_and(|until| entry.seq > until) {
            return false;
        }
        !self.failures_only || entry.kind.is_failure()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::telemetry::keys;
    use cadence_core::{Event, Value};

    fn entry(seq: u64, kind: TelemetryKind, command: Option<&str>) -> JournalEntry {
        let payload = match command {
            Some(name) => Value::map([(keys::COMMAND, Value::from(name))]),
            None => Value::Null,
        };
        JournalEntry::from_event(&Event::new(seq, kind.topic(), payload)).unwrap()
    }

    fn sample() -> Auditor {
        Auditor::from_entries(vec![
            entry(1, TelemetryKind::Executed, Some("rename")),
            entry(2, TelemetryKind::Executed, Some("resize")),
            entry(3, TelemetryKind::Undone, Some("resize")),
            entry(4, TelemetryKind::Failed, Some("delete")),
            entry(5, TelemetryKind::Unhandled, None),
            entry(6, TelemetryKind::Executed, Some("rename")),
        ])
    }

    #[test]
    fn test_report() {
        let report = sample().generate_report();
        assert_eq!(report.total_entries, 6);
        assert_eq!(report.failure_count, 1);
        assert_eq!(report.unhandled_count, 1);
        assert_eq!(report.first_seq, Some(1));
        assert_eq!(report.last_seq, Some(6));
        assert_eq!(report.kind_counts[&TelemetryKind::Executed], 3);
        assert_eq!(report.executed_by_command["rename"], 2);

        let text = report.to_string();
        assert!(text.contains("Audit Report"));
        assert!(text.contains("executed: 3"));
    }

    #[test]
    fn test_queries() {
        let auditor = sample();
        assert_eq!(auditor.by_kind(TelemetryKind::Executed).len(), 3);
        assert_eq!(auditor.by_command("resize").len(), 2);
        assert_eq!(auditor.failures()[0].command(), Some("delete"));
        assert_eq!(auditor.unique_commands(), vec!["delete", "rename", "resize"]);

        let ranged = auditor.query(&AuditQuery::kind(TelemetryKind::Executed).between(2, 5));
        assert_eq!(ranged.len(), 1);
        assert_eq!(ranged[0].seq, 2);
    }

    #[test]
    fn test_empty_report() {
        let report = Auditor::from_entries(Vec::new()).generate_report();
        assert_eq!(report.total_entries, 0);
        assert_eq!(report.first_seq, None);
        assert!(report.kind_counts.is_empty());
    }
}
