use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// UTC timestamp newtype owning the wire format (RFC 3339) and display labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub DateTime<Utc>);

impl Timestamp {
    /// Short label used next to chat bubbles, e.g. `3 Aug 14:30`.
    #[must_use]
    pub fn time_label(&self) -> String {
        self.0.format("%-d %b %H:%M").to_string()
    }

    /// Full label used in directory listings and diagnostics.
    #[must_use]
    pub fn full_label(&self) -> String {
        self.0.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.full_label())
    }
}
