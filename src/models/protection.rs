//! Protection number - the applicant's patent/application identifier used as
//! the search key on the portal and as the key column of the record store.

use std::fmt::Display;

/// Opaque protection-number identifier
///
/// Trimmed on construction; blank values cannot be represented, so rows with
/// missing identifiers are dropped at the record-store boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ProtectionNumber(String);

impl ProtectionNumber {
    /// Parse a raw cell value; returns `None` for blank input
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ProtectionNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ProtectionNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
