// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// The in-progress line and the edit cursor.
///
/// The cursor is a byte offset into `text` and always sits on a grapheme cluster
/// boundary, so `0 <= cursor <= text.len()` holds after every operation. Motion and
/// deletion work on whole grapheme clusters: an emoji or a letter with a combining
/// accent is inserted, skipped, and deleted as one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    text: String,
    cursor: usize,
}

impl LineBuffer {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn text(&self) -> &str { &self.text }

    #[must_use]
    pub fn cursor(&self) -> usize { self.cursor }

    #[must_use]
    pub fn len(&self) -> usize { self.text.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.text.is_empty() }

    /// `(before_cursor, after_cursor)`.
    #[must_use]
    pub fn split_at_cursor(&self) -> (&str, &str) { self.text.split_at(self.cursor) }

    /// Display width in terminal columns of the text before the cursor.
    #[must_use]
    pub fn display_width_before_cursor(&self) -> usize {
        self.text[..self.cursor].width()
    }

    /// Insert `cluster` at the cursor and move the cursor past it.
    pub fn insert(&mut self, cluster: &str) {
        self.text.insert_str(self.cursor, cluster);
        self.cursor += cluster.len();
    }

    /// Append `suffix` at the end, regardless of the cursor, and move the cursor to the
    /// end.
    pub fn append(&mut self, suffix: &str) {
        self.text.push_str(suffix);
        self.cursor = self.text.len();
    }

    /// Delete the grapheme cluster before the cursor. No-op at the start.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let start = self.prev_boundary();
        self.text.replace_range(start..self.cursor, "");
        self.cursor = start;
        true
    }

    /// Delete the grapheme cluster at the cursor. No-op at the end.
    pub fn delete_forward(&mut self) -> bool {
        if self.cursor == self.text.len() {
            return false;
        }
        let end = self.next_boundary();
        self.text.replace_range(self.cursor..end, "");
        true
    }

    pub fn move_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor = self.prev_boundary();
        true
    }

    pub fn move_right(&mut self) -> bool {
        if self.cursor == self.text.len() {
            return false;
        }
        self.cursor = self.next_boundary();
        true
    }

    /// Replace the whole line, eg: with a recalled history entry. The cursor goes to the
    /// end.
    pub fn replace(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.text.len();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Remove and return the text, leaving the buffer empty.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }

    fn prev_boundary(&self) -> usize {
        self.text[..self.cursor]
            .grapheme_indices(true)
            .next_back()
            .map_or(0, |(index, _)| index)
    }

    fn next_boundary(&self) -> usize {
        self.text[self.cursor..]
            .graphemes(true)
            .next()
            .map_or(self.cursor, |cluster| self.cursor + cluster.len())
    }
}
