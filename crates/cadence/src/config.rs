//! Scope configuration loaded from RON

use crate::error::Result;
use cadence_hub::HubConfig;
use cadence_invoker::InvokerConfig;
use cadence_journal::JournalConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for one coordination scope
///
/// Every section is optional in RON; missing sections take their defaults.
/// The journal is only created when its section is present.
///
/// ```
/// use cadence::CadenceConfig;
///
/// let config = CadenceConfig::from_ron_str(
///     r#"(
///         hub: (label: "editor"),
///         invoker: (max_depth: 20),
///         journal: Some((recording_enabled: true)),
///     )"#,
/// )
/// .unwrap();
/// assert_eq!(config.hub.label(), "editor");
/// assert_eq!(config.invoker.max_depth(), 20);
/// assert!(config.journal.is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CadenceConfig {
    pub hub: HubConfig,
    pub invoker: InvokerConfig,
    pub journal: Option<JournalConfig>,
}

impl CadenceConfig {
    /// Parse a configuration from RON text
    pub fn from_ron_str(content: &str) -> Result<Self> {
        Ok(ron::from_str(content)?)
    }

    /// Load a configuration from a RON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_ron_str(&content)
    }

    /// Enable a recording journal with default bounds
    pub fn with_journal(mut self) -> Self {
        self.journal = Some(JournalConfig::recording());
        self
    }
}
