//! Export journal data to various formats

use crate::journal::{Journal, JournalEntry, JournalStats};
use crate::{Error, Result};
use cadence_core::telemetry::keys;
use serde::Serialize;
use std::io::Write;

/// Export format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// RON format (Rust Object Notation)
    Ron,
    /// JSON format (requires serde_json feature)
    Json,
    /// CSV format, one row per entry
    Csv,
    /// Human-readable text format
    Text,
}

/// Exporter for journal data
///
/// Works on a snapshot taken at construction.
pub struct Exporter {
    stats: JournalStats,
    entries: Vec<JournalEntry>,
}

impl Exporter {
    /// Create a new exporter over a snapshot of the journal
    pub fn new(journal: &Journal) -> Self {
        Self {
            stats: journal.stats(),
            entries: journal.entries(),
        }
    }

    /// Export to a string in the specified format
    pub fn export(&self, format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Ron => self.to_ron(),
            ExportFormat::Json => self.to_json(),
            ExportFormat::Csv => Ok(self.to_csv()),
            ExportFormat::Text => Ok(self.to_text()),
        }
    }

    /// Export to a writer
    pub fn export_to<W: Write>(&self, writer: &mut W, format: ExportFormat) -> Result<()> {
        let content = self.export(format)?;
        writer.write_all(content.as_bytes())?;
        Ok(())
    }

    /// Export as pretty-printed RON
    pub fn to_ron(&self) -> Result<String> {
        ron::ser::to_string_pretty(&self.data(), ron::ser::PrettyConfig::default())
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    #[cfg(feature = "serde_json")]
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.data()).map_err(|e| Error::Serialization(e.to_string()))
    }

    #[cfg(not(feature = "serde_json"))]
    pub fn to_json(&self) -> Result<String> {
        Err(Error::ExportError(
            "JSON export requires the 'serde_json' feature".to_string(),
        ))
    }

    /// Export as CSV with seq, timestamp, kind, command and error columns
    pub fn to_csv(&self) -> String {
        let mut output = String::from("seq,timestamp,kind,command,error\n");
        for entry in &self.entries {
            output.push_str(&format!(
                "{},{},{},{},{}\n",
                entry.seq,
                entry.timestamp.to_rfc3339(),
                entry.kind,
                csv_field(entry.command().unwrap_or_default()),
                csv_field(entry.error().unwrap_or_default()),
            ));
        }
        output
    }

    /// Human-readable listing, one line per entry
    pub fn to_text(&self) -> String {
        let mut output = String::new();
        output.push_str("=== Journal Export ===\n\n");
        output.push_str(&format!("Total entries: {}\n", self.stats.total_entries));
        output.push_str(&format!("Failures: {}\n", self.stats.failure_count));
        if self.stats.dropped > 0 {
            output.push_str(&format!("Dropped: {}\n", self.stats.dropped));
        }
        if let (Some(first), Some(last)) = (self.stats.first_seq, self.stats.last_seq) {
            output.push_str(&format!("Seq range: {} - {}\n", first, last));
        }

        output.push_str("\n=== Entries ===\n\n");
        for entry in &self.entries {
            output.push_str(&format!(
                "  #{} {} {}",
                entry.seq,
                entry.timestamp.format("%H:%M:%S%.3f"),
                entry.kind
            ));
            if let Some(name) = entry.command() {
                output.push_str(&format!(" command={}", name));
            }
            if let Some(kind) = entry.payload.get(keys::REQUEST_KIND) {
                output.push_str(&format!(" request={}", kind));
            }
            output.push('\n');
            if let Some(error) = entry.error() {
                output.push_str(&format!("      error: {}\n", error));
            }
        }
        output
    }

    fn data(&self) -> ExportData<'_> {
        ExportData {
            version: 1,
            stats: self.stats,
            entries: &self.entries,
        }
    }
}

/// Quote a CSV field when it needs it
fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

#[derive(Debug, Serialize)]
struct ExportData<'a> {
    version: u32,
    stats: JournalStats,
    entries: &'a [JournalEntry],
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JournalConfig;
    use cadence_core::{Event, TelemetryKind, Value};

    fn create_test_journal() -> Journal {
        let journal = Journal::with_config(JournalConfig::recording());
        let executed = Value::map([(keys::COMMAND, Value::from("rename"))]);
        let failed = Value::map([
            (keys::COMMAND, Value::from("delete")),
            (keys::ERROR, Value::from("locked, try later")),
        ]);
        journal
            .record(&Event::new(1, TelemetryKind::Executed.topic(), executed))
            .unwrap();
        journal
            .record(&Event::new(2, TelemetryKind::Failed.topic(), failed))
            .unwrap();
        journal
    }

    #[test]
    fn test_export_ron() {
        let exporter = Exporter::new(&create_test_journal());
        let ron = exporter.to_ron().unwrap();
        assert!(ron.contains("version"));
        assert!(ron.contains("entries"));
        assert!(ron.contains("Failed"));
    }

    #[test]
    fn test_export_csv() {
        let csv = Exporter::new(&create_test_journal()).to_csv();
        assert!(csv.starts_with("seq,timestamp,kind,command,error\n"));
        assert_eq!(csv.lines().count(), 3);
        assert!(csv.contains(",failed,delete,\"locked, try later\""));
    }

    #[test]
    fn test_export_text() {
        let text = Exporter::new(&create_test_journal()).to_text();
        assert!(text.contains("Journal Export"));
        assert!(text.contains("command=rename"));
        assert!(text.contains("error: locked, try later"));
    }

    #[test]
    fn test_export_to_writer() {
        let mut buffer = Vec::new();
        Exporter::new(&create_test_journal())
            .export_to(&mut buffer, ExportFormat::Text)
            .unwrap();
        assert!(String::from_utf8(buffer).unwrap().contains("Seq range: 1 - 2"));
    }

    #[cfg(not(feature = "serde_json"))]
    #[test]
    fn test_json_requires_feature() {
        let result = Exporter::new(&create_test_journal()).export(ExportFormat::Json);
        assert!(matches!(result, Err(Error::ExportError(_))));
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn test_export_json() {
        let json = Exporter::new(&create_test_journal()).to_json().unwrap();
        assert!(json.contains("\"entries\""));
    }
}
