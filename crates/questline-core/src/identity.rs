//! Caller identities.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// An opaque external identity (a chat user id, an operator login, ...).
///
/// The registry never interprets the value; it only compares identities
/// against its caretaker and admin tables. Numeric ids in configuration
/// files are accepted and kept in their decimal form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Identity(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawIdentity {
    Text(String),
    Number(i64),
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawIdentity::deserialize(deserializer)? {
            RawIdentity::Text(raw) => Self::new(raw),
            RawIdentity::Number(raw) => Self(raw.to_string()),
        })
    }
}

impl Identity {
    /// Wraps a raw identity value, trimming surrounding whitespace.
    #[must_use]
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_owned())
    }

    /// Returns the raw identity value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_trimmed() {
        assert_eq!(Identity::new("  1808760043 ").as_str(), "1808760043");
    }

    #[test]
    fn test_identity_serializes_as_plain_string() {
        let json = serde_json::to_string(&Identity::new("42")).unwrap();
        assert_eq!(json, "\"42\"");
    }

    #[test]
    fn test_numeric_identity_is_accepted() {
        let identity: Identity = serde_json::from_str("1413950580").unwrap();
        assert_eq!(identity.as_str(), "1413950580");
    }
}
