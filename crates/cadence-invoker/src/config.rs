//! Invoker Configuration

use serde::{Deserialize, Serialize};

/// Configuration for an [`Invoker`](crate::Invoker)
///
/// ```
/// use cadence_invoker::InvokerConfig;
///
/// assert_eq!(InvokerConfig::default().max_depth(), 100);
/// assert!(InvokerConfig::unbounded().is_unbounded());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvokerConfig {
    /// Maximum history depth (0 = unbounded)
    max_depth: usize,
}

impl InvokerConfig {
    /// Bound the history to `max_depth` commands
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Never evict; the history grows without bound
    pub fn unbounded() -> Self {
        Self { max_depth: 0 }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth;
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_depth == 0
    }
}

impl Default for InvokerConfig {
    fn default() -> Self {
        Self { max_depth: 100 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ron() {
        let config: InvokerConfig = ron::from_str("(max_depth: 5)").unwrap();
        assert_eq!(config.max_depth(), 5);

        let config: InvokerConfig = ron::from_str("()").unwrap();
        assert_eq!(config, InvokerConfig::default());
    }
}
