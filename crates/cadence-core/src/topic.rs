//! Topic identifiers for broadcast channels

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix of the namespace reserved for the core's own telemetry
///
/// Terminal outcomes of the invoker and router are published on topics under
/// this prefix (see [`crate::telemetry`]).
pub const RESERVED_PREFIX: &str = "cadence.";

/// A named broadcast channel
///
/// Topics are plain strings scoped to a single hub; two hubs never share
/// subscribers even when topic names coincide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Topic(String);

impl Topic {
    /// Create a topic from any string
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Create a topic, rejecting blank names
    ///
    /// ```
    /// use cadence_core::Topic;
    ///
    /// assert!(Topic::parse("orders.created").is_ok());
    /// assert!(Topic::parse("  ").is_err());
    /// ```
    pub fn parse(name: &str) -> Result<Self> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidTopic(name.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the topic name
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this topic lives in the reserved telemetry namespace
    pub fn is_reserved(&self) -> bool {
        self.0.starts_with(RESERVED_PREFIX)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Topic {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Topic {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&Topic> for Topic {
    fn from(t: &Topic) -> Self {
        t.clone()
    }
}

impl AsRef<str> for Topic {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_namespace() {
        assert!(Topic::new("cadence.command.executed").is_reserved());
        assert!(!Topic::new("orders.created").is_reserved());
        assert!(!Topic::new("cadence").is_reserved());
    }

    #[test]
    fn test_parse_trims() {
        let topic = Topic::parse("  prices ").unwrap();
        assert_eq!(topic.as_str(), "prices");
        assert_eq!(Topic::parse(""), Err(Error::InvalidTopic(String::new())));
    }

    #[test]
    fn test_serde_transparent() {
        let topic = Topic::new("alerts");
        let text = ron::to_string(&topic).unwrap();
        assert_eq!(text, "\"alerts\"");
    }
}
