//! Recently selected colors, most recent first.

use serde::Serialize;

use crate::color::normalize_hex;
use crate::error::Result;

/// Number of entries kept unless configured otherwise.
pub const DEFAULT_HISTORY_CAPACITY: usize = 7;

/// Bounded list of selected colors with no case-insensitive duplicates.
///
/// Re-selecting a color moves it to the front instead of adding it again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct History {
    entries: Vec<String>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl History {
    /// An empty history. A capacity of 0 is raised to 1.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Rebuild a history from persisted entries (most recent first).
    ///
    /// Malformed entries and later duplicates are dropped, then the list is
    /// cut to `capacity`.
    #[must_use]
    pub fn from_entries<I, S>(entries: I, capacity: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut history = Self::with_capacity(capacity);
        for entry in entries {
            let Ok(hex) = normalize_hex(entry.as_ref()) else {
                tracing::debug!(entry = entry.as_ref(), "Dropping malformed history entry");
                continue;
            };
            if !history.contains(&hex) {
                history.entries.push(hex);
            }
        }
        history.entries.truncate(history.capacity);
        history
    }

    /// Record a selection at the front.
    ///
    /// # Errors
    /// Returns [`crate::SwatchError::InvalidHex`] for a malformed color;
    /// the history is left untouched.
    pub fn push(&mut self, hex: &str) -> Result<()> {
        let hex = normalize_hex(hex)?;
        self.entries.retain(|e| !e.eq_ignore_ascii_case(&hex));
        self.entries.insert(0, hex);
        self.entries.truncate(self.capacity);
        Ok(())
    }

    #[must_use]
    pub fn contains(&self, hex: &str) -> bool {
        let needle = hex.trim();
        self.entries.iter().any(|e| e.eq_ignore_ascii_case(needle))
    }

    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn latest(&self) -> Option<&str> {
        self.entries.first().map(String::as_str)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_push_puts_newest_first() {
        let mut history = History::default();
        history.push("#111111").unwrap();
        history.push("#222222").unwrap();
        assert_eq!(history.entries(), ["#222222", "#111111"]);
        assert_eq!(history.latest(), Some("#222222"));
    }

    #[test]
    fn test_reselect_moves_to_front() {
        let mut history = History::default();
        for hex in ["#111111", "#222222", "#333333"] {
            history.push(hex).unwrap();
        }
        history.push("#111111").unwrap();
        assert_eq!(history.entries(), ["#111111", "#333333", "#222222"]);
    }

    #[test]
    fn test_dedupe_is_case_insensitive() {
        let mut history = History::default();
        history.push("#ABCDEF").unwrap();
        history.push("#abcdef").unwrap();
        history.push("abc").unwrap();
        assert_eq!(history.entries(), ["#aabbcc", "#abcdef"]);
    }

    #[test]
    fn test_capacity_is_enforced() {
        let mut history = History::with_capacity(3);
        for i in 0..10u8 {
            history.push(&format!("#0000{i:02x}")).unwrap();
        }
        assert_eq!(history.entries(), ["#000009", "#000008", "#000007"]);
        assert_eq!(history.capacity(), 3);
    }

    #[test]
    fn test_zero_capacity_keeps_latest() {
        let mut history = History::with_capacity(0);
        assert_eq!(history.capacity(), 1);
        history.push("#111111").unwrap();
        history.push("#222222").unwrap();
        assert_eq!(history.entries(), ["#222222"]);

        let restored = History::from_entries(["#333333", "#444444"], 0);
        assert_eq!(restored.entries(), ["#333333"]);
    }

    #[test]
    fn test_push_rejects_malformed() {
        let mut history = History::default();
        history.push("#123456").unwrap();
        assert!(history.push("#12345").is_err());
        assert_eq!(history.entries(), ["#123456"]);
    }

    #[test]
    fn test_from_entries_sanitises() {
        let history = History::from_entries(
            ["#FF0000", "oops", "#ff0000", "#00ff00", "#0000ff", "#ffffff"],
            3,
        );
        assert_eq!(history.entries(), ["#ff0000", "#00ff00", "#0000ff"]);
    }
}
