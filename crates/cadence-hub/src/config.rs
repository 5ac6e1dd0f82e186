//! Hub Configuration

use serde::{Deserialize, Serialize};

/// Configuration for a [`Hub`](crate::Hub)
///
/// # Example
///
/// ```
/// use cadence_hub::HubConfig;
///
/// let config = HubConfig::with_label("editor");
/// assert_eq!(config.label(), "editor");
/// assert!(config.log_faults());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// Name of the coordination scope, attached to every log line
    label: String,
    /// Emit a `warn!` for each captured subscriber fault
    log_faults: bool,
}

impl HubConfig {
    /// Create a configuration with the given label
    ///
    /// Blank labels fall back to the default label.
    pub fn with_label(label: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.set_label(label);
        config
    }

    /// Label shown in logs
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Set the scope label; blank labels fall back to the default
    pub fn set_label(&mut self, label: impl Into<String>) {
        let label = label.into();
        self.label = if label.trim().is_empty() {
            Self::DEFAULT_LABEL.to_string()
        } else {
            label
        };
    }

    /// Whether subscriber faults are logged at `warn`
    pub fn log_faults(&self) -> bool {
        self.log_faults
    }

    pub fn set_log_faults(&mut self, enabled: bool) {
        self.log_faults = enabled;
    }

    const DEFAULT_LABEL: &'static str = "default";
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            label: Self::DEFAULT_LABEL.to_string(),
            log_faults: true,
        }
    }
}
