// SPDX-License-Identifier: MIT
//
// Single-line text field holding the base color.
//
// The cursor counts grapheme clusters, so a pasted emoji or a combining
// sequence moves and deletes as one unit. Text is free-form here; only
// Generate decides whether it is a color.

use n_term::buffer::string_width;
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextField {
    text: String,

    /// Cursor position (grapheme index, 0..=len).
    cursor: usize,
}

impl TextField {
    /// A field holding `text` with the cursor at the end.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.graphemes(true).count();
        Self { text, cursor }
    }

    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Length in graphemes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.graphemes(true).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Display column of the cursor relative to the field start.
    #[must_use]
    pub fn cursor_column(&self) -> u16 {
        string_width(&self.text[..self.byte_offset(self.cursor)])
    }

    pub fn insert_char(&mut self, ch: char) {
        if ch.is_control() {
            return;
        }
        let mut buf = [0; 4];
        self.insert_at_cursor(ch.encode_utf8(&mut buf));
    }

    /// Insert pasted text, dropping control characters (newlines included).
    pub fn insert_str(&mut self, text: &str) {
        let clean: String = text.chars().filter(|c| !c.is_control()).collect();
        if !clean.is_empty() {
            self.insert_at_cursor(&clean);
        }
    }

    /// Delete the grapheme before the cursor.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let start = self.byte_offset(self.cursor - 1);
        let end = self.byte_offset(self.cursor);
        self.text.replace_range(start..end, "");
        self.cursor -= 1;
        true
    }

    /// Delete the grapheme under the cursor.
    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.len() {
            return false;
        }
        let start = self.byte_offset(self.cursor);
        let end = self.byte_offset(self.cursor + 1);
        self.text.replace_range(start..end, "");
        true
    }

    pub const fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.len() {
            self.cursor += 1;
        }
    }

    pub const fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.len();
    }

    fn insert_at_cursor(&mut self, s: &str) {
        let at = self.byte_offset(self.cursor);
        self.text.insert_str(at, s);
        // A combining mark can merge into the previous cluster, so count
        // rather than add.
        self.cursor = self.text[..at + s.len()].graphemes(true).count();
    }

    /// Byte offset of grapheme `index`, or the text length past the end.
    fn byte_offset(&self, index: usize) -> usize {
        self.text
            .grapheme_indices(true)
            .nth(index)
            .map_or(self.text.len(), |(i, _)| i)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
