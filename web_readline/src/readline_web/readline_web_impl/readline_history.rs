// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::HistoryStorage;
use std::{collections::VecDeque, sync::Arc};

/// Default capacity of [`History`], used when `historySize` isn't given.
pub const DEFAULT_HISTORY_SIZE: usize = 100;

/// Where to persist [`History`]: a key in a [`HistoryStorage`].
#[derive(Debug, Clone)]
pub struct PersistentHistory {
    pub key: String,
    pub storage: Arc<dyn HistoryStorage>,
}

/// Accepted lines, oldest first, plus the state for browsing them with up & down.
///
/// # Browse cursor
///
/// The browse cursor is in `0..=entries.len()`. The position `entries.len()` is the
/// "live" slot: the line being typed, which isn't in history yet. Browsing starts
/// there, and [`Self::rewind`] always moves it back there.
///
/// # Scratch edits
///
/// There is one scratch slot per browse position (`entries.len() + 1` of them). Before
/// the cursor moves, the text currently on the prompt is saved into the slot of the
/// position being left. So edits made to a recalled line, and the half typed live line,
/// survive moving up and down. [None] in a slot means "nothing saved here", which is
/// different from an empty string that was saved.
#[derive(Debug)]
pub struct History {
    entries: VecDeque<String>,
    max_size: usize,
    browse_cursor: usize,
    scratch_edits: Vec<Option<String>>,
    maybe_persistent: Option<PersistentHistory>,
}

impl History {
    /// Create a new history that holds at most `max_size` entries. If `maybe_persistent`
    /// is given, previously saved entries are loaded from it. Anything that can't be
    /// loaded (storage error, malformed JSON) is logged and treated as "no history".
    #[must_use]
    pub fn new(max_size: usize, maybe_persistent: Option<PersistentHistory>) -> Self {
        let mut entries = maybe_persistent
            .as_ref()
            .map(load_entries)
            .unwrap_or_default();

        // Keep only the newest entries if the capacity shrank since they were saved.
        while entries.len() > max_size {
            entries.pop_front();
        }

        let mut it = Self {
            entries,
            max_size,
            browse_cursor: 0,
            scratch_edits: vec![],
            maybe_persistent,
        };
        it.rewind(None);
        it
    }

    /// Append `maybe_new_entry` if it is given, not blank, and not the same as the most
    /// recent entry. The oldest entries are evicted to stay within capacity, and the
    /// result is persisted. Either way, browsing is reset to the live slot and all
    /// scratch edits are dropped.
    pub fn rewind(&mut self, maybe_new_entry: Option<&str>) {
        if let Some(new_entry) = maybe_new_entry {
            let is_blank = new_entry.trim().is_empty();
            let is_repeat = self.entries.back().map(String::as_str) == Some(new_entry);
            if !is_blank && !is_repeat {
                self.entries.push_back(new_entry.to_string());
                while self.entries.len() > self.max_size {
                    self.entries.pop_front();
                }
                self.persist();
            }
        }

        self.browse_cursor = self.entries.len();
        self.scratch_edits = vec![None; self.entries.len() + 1];
    }

    /// Move one entry back (older). `current` is saved as the scratch edit of the
    /// position being left, even when already at the oldest entry.
    ///
    /// Returns the scratch edit at the new position if there is one, otherwise the
    /// stored entry there.
    pub fn get_previous(&mut self, current: &str) -> Option<String> {
        self.save_scratch_edit(current);
        if self.browse_cursor > 0 {
            self.browse_cursor -= 1;
        }
        self.value_at_browse_cursor()
    }

    /// Move one entry forward (newer). `current` is saved as the scratch edit of the
    /// position being left, even when already at the live slot.
    ///
    /// Returns the scratch edit at the new position if there is one, otherwise the
    /// stored entry there. The live slot has no stored entry, so moving onto it returns
    /// whatever was typed there before browsing started.
    pub fn get_next(&mut self, current: &str) -> Option<String> {
        self.save_scratch_edit(current);
        if self.browse_cursor < self.entries.len() {
            self.browse_cursor += 1;
        }
        self.value_at_browse_cursor()
    }

    /// Change the capacity, evicting the oldest entries if needed. Browsing is reset.
    pub fn set_max_size(&mut self, max_size: usize) {
        self.max_size = max_size;
        if self.entries.len() > max_size {
            while self.entries.len() > max_size {
                self.entries.pop_front();
            }
            self.persist();
        }
        self.rewind(None);
    }

    #[must_use]
    pub fn entries(&self) -> &VecDeque<String> { &self.entries }

    #[must_use]
    pub fn max_size(&self) -> usize { self.max_size }

    #[must_use]
    pub fn browse_cursor(&self) -> usize { self.browse_cursor }

    #[must_use]
    pub fn len(&self) -> usize { self.entries.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    fn save_scratch_edit(&mut self, current: &str) {
        if let Some(slot) = self.scratch_edits.get_mut(self.browse_cursor) {
            *slot = Some(current.to_string());
        }
    }

    fn value_at_browse_cursor(&self) -> Option<String> {
        self.scratch_edits
            .get(self.browse_cursor)
            .cloned()
            .flatten()
            .or_else(|| self.entries.get(self.browse_cursor).cloned())
    }

    /// Storage failures degrade to in-memory history for this write.
    fn persist(&self) {
        let Some(PersistentHistory { key, storage }) = &self.maybe_persistent else {
            return;
        };

        let json = match serde_json::to_string(&self.entries) {
            Ok(json) => json,
            Err(error) => {
                tracing::warn!(message = "Could not serialize history", ?error);
                return;
            }
        };

        if let Err(report) = storage.set_item(key, &json) {
            tracing::warn!(
                message = "Could not persist history",
                key = %key,
                error = ?report
            );
        }
    }
}

/// Anything other than a JSON array of strings counts as "no history".
fn load_entries(persistent: &PersistentHistory) -> VecDeque<String> {
    let PersistentHistory { key, storage } = persistent;

    let maybe_json = match storage.get_item(key) {
        Ok(maybe_json) => maybe_json,
        Err(report) => {
            tracing::warn!(
                message = "Could not read persisted history",
                key = %key,
                error = ?report
            );
            None
        }
    };

    let Some(json) = maybe_json else {
        return VecDeque::new();
    };

    match serde_json::from_str::<VecDeque<String>>(&json) {
        Ok(entries) => {
            tracing::debug!(
                message = "Loaded persisted history",
                key = %key,
                count = entries.len()
            );
            entries
        }
        Err(error) => {
            tracing::warn!(
                message = "Ignoring malformed persisted history",
                key = %key,
                ?error
            );
            VecDeque::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CommonResult, InMemoryHistoryStorage};
    use pretty_assertions::assert_eq;

    fn entries_of(history: &History) -> Vec<&str> {
        history.entries().iter().map(String::as_str).collect()
    }

    fn persistent(storage: &InMemoryHistoryStorage) -> Option<PersistentHistory> {
        Some(PersistentHistory {
            key: "history".into(),
            storage: Arc::new(storage.clone()),
        })
    }

    /// Storage that fails every operation.
    #[derive(Debug)]
    struct BrokenStorage;

    impl HistoryStorage for BrokenStorage {
        fn get_item(&self, _key: &str) -> CommonResult<Option<String>> {
            Err(miette::miette!("storage is unavailable"))
        }

        fn set_item(&self, _key: &str, _value: &str) -> CommonResult<()> {
            Err(miette::miette!("quota exceeded"))
        }
    }

    #[test]
    fn test_rewind_appends_and_dedups_consecutive() {
        let mut history = History::new(DEFAULT_HISTORY_SIZE, None);

        history.rewind(Some("ls"));
        assert_eq!(entries_of(&history), vec!["ls"]);

        history.rewind(Some("ls"));
        assert_eq!(entries_of(&history), vec!["ls"]);

        history.rewind(Some("pwd"));
        history.rewind(Some("ls"));
        assert_eq!(entries_of(&history), vec!["ls", "pwd", "ls"]);
    }

    #[test]
    fn test_rewind_ignores_blank_and_missing() {
        let mut history = History::new(DEFAULT_HISTORY_SIZE, None);
        history.rewind(Some(""));
        history.rewind(Some("   "));
        history.rewind(None);
        assert!(history.is_empty());
        assert_eq!(history.browse_cursor(), 0);
    }

    #[test]
    fn test_capacity_evicts_oldest_first() {
        let mut history = History::new(2, None);
        history.rewind(Some("a"));
        history.rewind(Some("b"));
        history.rewind(Some("c"));
        assert_eq!(entries_of(&history), vec!["b", "c"]);
    }

    #[test]
    fn test_capacity_keeps_most_recent_in_order() {
        let size = 5;
        let mut history = History::new(size, None);
        for index in 0..23 {
            history.rewind(Some(&format!("cmd{index}")));
            assert!(history.len() <= size);
        }
        assert_eq!(
            entries_of(&history),
            vec!["cmd18", "cmd19", "cmd20", "cmd21", "cmd22"]
        );
    }

    #[test]
    fn test_previous_and_next_walk_entries() {
        let mut history = History::new(DEFAULT_HISTORY_SIZE, None);
        history.rewind(Some("one"));
        history.rewind(Some("two"));

        assert_eq!(history.get_previous(""), Some("two".into()));
        assert_eq!(history.get_previous("two"), Some("one".into()));
        // Oldest boundary: the cursor stays put.
        assert_eq!(history.get_previous("one"), Some("one".into()));
        assert_eq!(history.browse_cursor(), 0);

        assert_eq!(history.get_next("one"), Some("two".into()));
        // Back on the live slot, the blank line that was typed there.
        assert_eq!(history.get_next("two"), Some(String::new()));
        // Live boundary: the cursor stays put.
        assert_eq!(history.get_next(""), Some(String::new()));
        assert_eq!(history.browse_cursor(), 2);
    }

    #[test]
    fn test_scratch_edits_survive_browsing() {
        let mut history = History::new(DEFAULT_HISTORY_SIZE, None);
        history.rewind(Some("one"));
        history.rewind(Some("two"));

        // Half typed live line.
        assert_eq!(history.get_previous("draft"), Some("two".into()));
        // Edit the recalled entry, then keep going up.
        assert_eq!(history.get_previous("two edited"), Some("one".into()));
        assert_eq!(history.get_next("one"), Some("two edited".into()));
        assert_eq!(history.get_next("two edited"), Some("draft".into()));

        // Stored entries are untouched.
        assert_eq!(entries_of(&history), vec!["one", "two"]);
    }

    #[test]
    fn test_scratch_saved_at_oldest_boundary() {
        let mut history = History::new(DEFAULT_HISTORY_SIZE, None);
        history.rewind(Some("one"));

        assert_eq!(history.get_previous(""), Some("one".into()));
        // Edit at the oldest entry, then press up again: the edit is kept.
        assert_eq!(history.get_previous("one!"), Some("one!".into()));
    }

    #[test]
    fn test_previous_on_empty_history_returns_current() {
        let mut history = History::new(DEFAULT_HISTORY_SIZE, None);
        assert_eq!(history.get_previous("typed"), Some("typed".into()));
        assert_eq!(history.get_next("typed"), Some("typed".into()));
    }

    #[test]
    fn test_browsing_round_trip_returns_to_blank_line() {
        let mut history = History::new(DEFAULT_HISTORY_SIZE, None);
        for entry in ["a", "b", "c"] {
            history.rewind(Some(entry));
        }

        for k in 0..6 {
            history.rewind(None);
            let mut current = String::new();
            for _ in 0..k {
                current = history.get_previous(&current).unwrap_or_default();
            }
            for _ in 0..k {
                current = history.get_next(&current).unwrap_or_default();
            }
            assert_eq!(current, "", "k = {k}");
        }
    }

    #[test]
    fn test_rewind_clears_scratch_edits() {
        let mut history = History::new(DEFAULT_HISTORY_SIZE, None);
        history.rewind(Some("one"));
        assert_eq!(history.get_previous("draft"), Some("one".into()));
        history.rewind(None);
        assert_eq!(history.browse_cursor(), 1);
        assert_eq!(history.get_previous(""), Some("one".into()));
        assert_eq!(history.get_next("one"), Some(String::new()));
    }

    #[test]
    fn test_set_max_size_truncates_oldest() {
        let mut history = History::new(DEFAULT_HISTORY_SIZE, None);
        for entry in ["a", "b", "c", "d"] {
            history.rewind(Some(entry));
        }
        history.set_max_size(2);
        assert_eq!(entries_of(&history), vec!["c", "d"]);
        assert_eq!(history.browse_cursor(), 2);
        assert_eq!(history.max_size(), 2);
    }

    #[test]
    fn test_persists_on_every_accepted_entry() {
        let storage = InMemoryHistoryStorage::new();
        let mut history = History::new(DEFAULT_HISTORY_SIZE, persistent(&storage));

        history.rewind(Some("ls"));
        assert_eq!(
            storage.get_item("history").unwrap(),
            Some(r#"["ls"]"#.to_string())
        );

        history.rewind(Some("pwd"));
        assert_eq!(
            storage.get_item("history").unwrap(),
            Some(r#"["ls","pwd"]"#.to_string())
        );
    }

    #[test]
    fn test_loads_persisted_entries() {
        let storage = InMemoryHistoryStorage::new();
        storage.set_item("history", r#"["a","b","c"]"#).unwrap();

        let history = History::new(2, persistent(&storage));
        assert_eq!(entries_of(&history), vec!["b", "c"]);
        assert_eq!(history.browse_cursor(), 2);
    }

    #[test]
    fn test_malformed_persisted_history_is_empty() {
        let storage = InMemoryHistoryStorage::new();
        for bad in ["not json", r#"{"a":1}"#, "[1,2,3]"] {
            storage.set_item("history", bad).unwrap();
            let history = History::new(DEFAULT_HISTORY_SIZE, persistent(&storage));
            assert!(history.is_empty(), "{bad}");
        }
    }

    #[test]
    fn test_broken_storage_degrades_to_memory() {
        let mut history = History::new(
            DEFAULT_HISTORY_SIZE,
            Some(PersistentHistory {
                key: "history".into(),
                storage: Arc::new(BrokenStorage),
            }),
        );
        assert!(history.is_empty());

        history.rewind(Some("ls"));
        assert_eq!(entries_of(&history), vec!["ls"]);
        assert_eq!(history.get_previous(""), Some("ls".into()));
    }
}
