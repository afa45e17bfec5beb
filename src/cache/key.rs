//! Cache key normalization.

use std::fmt;

/// Normalized query text: surrounding whitespace trimmed, letters lower-cased.
///
/// Queries that differ only in outer whitespace or case share one key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(String);

impl QueryKey {
    pub fn normalize(query: &str) -> Self {
        Self(query.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QueryKey {
    fn from(s: &str) -> Self {
        Self::normalize(s)
    }
}

impl From<String> for QueryKey {
    fn from(s: String) -> Self {
        Self::normalize(&s)
    }
}
