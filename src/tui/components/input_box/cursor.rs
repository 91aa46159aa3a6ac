//! Cursor position and horizontal scroll for the single-line InputBox.
//!
//! `CursorState` owns the cursor byte offset and the column scroll. All
//! methods take `buffer: &str` explicitly, the text itself is owned by
//! `InputBox`.

use unicode_width::UnicodeWidthStr;

/// Cursor and scroll state, separated from the text buffer.
pub(super) struct CursorState {
    /// Cursor position as byte offset in buffer (0..=buffer.len())
    pub pos: usize,
    /// Display columns hidden to the left of the field
    pub scroll_cols: usize,
}

impl CursorState {
    pub fn new() -> Self {
        Self {
            pos: 0,
            scroll_cols: 0,
        }
    }

    /// Reset cursor to start (used when the buffer is cleared).
    pub fn reset(&mut self) {
        self.pos = 0;
        self.scroll_cols = 0;
    }

    /// Display column of the cursor from the start of the buffer.
    pub fn column(&self, buffer: &str) -> usize {
        buffer[..self.pos].width()
    }

    /// Keep the cursor inside a field `field_width` columns wide.
    pub fn update_scroll(&mut self, buffer: &str, field_width: usize) {
        if field_width == 0 {
            self.scroll_cols = 0;
            return;
        }
        let col = self.column(buffer);
        if col < self.scroll_cols {
            self.scroll_cols = col;
        } else if col >= self.scroll_cols + field_width {
            // Leave one cell for the cursor past the last character
            self.scroll_cols = col + 1 - field_width;
        }
    }

    /// The slice of `buffer` visible after scrolling, at most `field_width` columns.
    pub fn visible<'b>(&self, buffer: &'b str, field_width: usize) -> &'b str {
        let mut start = buffer.len();
        let mut end = buffer.len();
        let mut col = 0;
        for (i, c) in buffer.char_indices() {
            let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
            if col >= self.scroll_cols && start == buffer.len() {
                start = i;
            }
            if col + w > self.scroll_cols + field_width {
                end = i;
                break;
            }
            col += w;
        }
        if start > end {
            start = end;
        }
        &buffer[start..end]
    }
}

/// Find the byte offset of the previous character boundary before `pos` in `text`.
pub(super) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Find the byte offset of the next character boundary after `pos` in `text`.
pub(super) fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}
