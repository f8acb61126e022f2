//! Core data models that flow through the mirror pipeline.
//!
//! A full scan produces [`ScanPage`]s of [`KeyValue`]s addressed by a
//! [`Cursor`]; the live feed produces [`ChangeEvent`]s in the order the
//! source applied them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single key and its opaque value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Opaque pagination marker: the last key seen by a scan.
///
/// The empty cursor means "start of the watched range".
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cursor(String);

impl Cursor {
    /// The cursor a scan begins from.
    pub fn start() -> Self {
        Self(String::new())
    }

    /// A cursor positioned on `key`; the next page starts strictly after it.
    pub fn after(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn is_start(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One page of a full scan plus the cursor to continue from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanPage {
    /// Entries in strictly increasing key order.
    pub entries: Vec<KeyValue>,
    /// Continuation cursor; empty when the scan is exhausted.
    pub next: Cursor,
}

impl ScanPage {
    /// Builds a page whose continuation cursor is its last key.
    pub fn from_entries(entries: Vec<KeyValue>) -> Self {
        let next = entries
            .last()
            .map(|kv| Cursor::after(kv.key.clone()))
            .unwrap_or_default();
        Self { entries, next }
    }

    /// True when no further page should be requested after this one.
    pub fn is_terminal(&self) -> bool {
        self.entries.is_empty() || self.next.is_start()
    }
}

/// A mutation observed on the source's live feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChangeEvent {
    Upsert { key: String, value: String },
    Remove { key: String },
}

impl ChangeEvent {
    pub fn upsert(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Upsert {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn remove(key: impl Into<String>) -> Self {
        Self::Remove { key: key.into() }
    }

    /// The key this event mutates.
    pub fn key(&self) -> &str {
        match self {
            Self::Upsert { key, .. } | Self::Remove { key } => key,
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Upsert { .. } => "upsert",
            Self::Remove { .. } => "remove",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_cursor_is_last_key() {
        let page = ScanPage::from_entries(vec![KeyValue::new("a", "1"), KeyValue::new("b", "2")]);
        assert_eq!(page.next.as_str(), "b");
        assert!(!page.is_terminal());
    }

    #[test]
    fn test_empty_page_is_terminal() {
        let page = ScanPage::from_entries(Vec::new());
        assert!(page.next.is_start());
        assert!(page.is_terminal());
    }

    #[test]
    fn test_page_with_empty_cursor_is_terminal() {
        let page = ScanPage {
            entries: vec![KeyValue::new("a", "1")],
            next: Cursor::start(),
        };
        assert!(page.is_terminal());
    }

    #[test]
    fn test_change_event_key_and_kind() {
        let up = ChangeEvent::upsert("/app/x", "1");
        let rm = ChangeEvent::remove("/app/y");
        assert_eq!(up.key(), "/app/x");
        assert_eq!(up.kind(), "upsert");
        assert_eq!(rm.key(), "/app/y");
        assert_eq!(rm.kind(), "remove");
    }
}
