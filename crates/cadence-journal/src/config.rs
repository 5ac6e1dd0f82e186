//! Journal configuration

use serde::{Deserialize, Serialize};

/// Configuration for a [`Journal`](crate::Journal)
///
/// ```
/// use cadence_journal::JournalConfig;
///
/// let config = JournalConfig::recording().with_max_entries(500);
/// assert!(config.recording_enabled);
/// assert_eq!(config.max_entries, 500);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalConfig {
    /// Whether incoming telemetry is recorded
    pub recording_enabled: bool,
    /// Maximum number of entries to keep, oldest dropped first (0 = unlimited)
    pub max_entries: usize,
}

impl JournalConfig {
    /// A configuration that records from the start
    pub fn recording() -> Self {
        Self {
            recording_enabled: true,
            ..Default::default()
        }
    }

    /// Keep at most `max_entries` entries; 0 keeps everything
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_entries == 0
    }
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            recording_enabled: false,
            max_entries: 0,
        }
    }
}
