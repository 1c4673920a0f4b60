//! Caret and selection handling.

use crate::buffer::TextBuffer;

/// A position in the buffer as (line, column). Both are 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

/// A text selection with an anchor and a caret, as character indices.
/// When anchor == cursor, there is no active selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    /// Where the selection started.
    pub anchor: usize,
    /// Where the caret is.
    pub cursor: usize,
}

impl Selection {
    /// Creates a collapsed selection at the given position.
    pub fn new(pos: usize) -> Self {
        Self {
            anchor: pos,
            cursor: pos,
        }
    }

    /// Returns true if anchor and caret differ.
    pub fn has_selection(&self) -> bool {
        self.anchor != self.cursor
    }

    /// Returns the selection bounds in ascending order.
    pub fn range(&self) -> (usize, usize) {
        (self.anchor.min(self.cursor), self.anchor.max(self.cursor))
    }
}

/// The caret of the editing surface.
#[derive(Debug, Clone, Default)]
pub struct Cursor {
    pub selection: Selection,
    /// Column to return to when moving vertically through short lines.
    preferred_col: Option<usize>,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the caret's character index.
    pub fn position(&self) -> usize {
        self.selection.cursor
    }

    pub fn has_selection(&self) -> bool {
        self.selection.has_selection()
    }

    /// Returns the selected range, if any.
    pub fn selected_range(&self) -> Option<(usize, usize)> {
        self.has_selection().then(|| self.selection.range())
    }

    /// Moves the caret, keeping the anchor when extending the selection.
    pub fn set_position(&mut self, pos: usize, extend_selection: bool) {
        self.selection.cursor = pos;
        if !extend_selection {
            self.selection.anchor = pos;
        }
        self.preferred_col = None;
    }

    /// Selects the whole buffer.
    pub fn select_all(&mut self, buffer: &TextBuffer) {
        self.selection = Selection {
            anchor: 0,
            cursor: buffer.len_chars(),
        };
        self.preferred_col = None;
    }

    /// Pulls both ends of the selection back inside the buffer.
    pub fn clamp_to_buffer(&mut self, buffer: &TextBuffer) {
        let len = buffer.len_chars();
        self.selection.anchor = self.selection.anchor.min(len);
        self.selection.cursor = self.selection.cursor.min(len);
    }

    pub fn move_left(&mut self, buffer: &TextBuffer, extend_selection: bool) {
        let pos = buffer.prev_boundary(self.position());
        self.set_position(pos, extend_selection);
    }

    pub fn move_right(&mut self, buffer: &TextBuffer, extend_selection: bool) {
        let pos = buffer.next_boundary(self.position());
        self.set_position(pos, extend_selection);
    }

    pub fn move_up(&mut self, buffer: &TextBuffer, extend_selection: bool) {
        self.move_lines(buffer, -1, extend_selection);
    }

    pub fn move_down(&mut self, buffer: &TextBuffer, extend_selection: bool) {
        self.move_lines(buffer, 1, extend_selection);
    }

    pub fn move_page_up(&mut self, buffer: &TextBuffer, page: usize, extend_selection: bool) {
        self.move_lines(buffer, -(page.max(1) as isize), extend_selection);
    }

    pub fn move_page_down(&mut self, buffer: &TextBuffer, page: usize, extend_selection: bool) {
        self.move_lines(buffer, page.max(1) as isize, extend_selection);
    }

    pub fn move_to_line_start(&mut self, buffer: &TextBuffer, extend_selection: bool) {
        let (line, _) = buffer.char_to_line_col(self.position());
        self.set_position(buffer.line_start(line), extend_selection);
    }

    pub fn move_to_line_end(&mut self, buffer: &TextBuffer, extend_selection: bool) {
        let (line, _) = buffer.char_to_line_col(self.position());
        self.set_position(buffer.line_end(line), extend_selection);
    }

    pub fn move_to_buffer_start(&mut self, extend_selection: bool) {
        self.set_position(0, extend_selection);
    }

    pub fn move_to_buffer_end(&mut self, buffer: &TextBuffer, extend_selection: bool) {
        self.set_position(buffer.len_chars(), extend_selection);
    }

    fn move_lines(&mut self, buffer: &TextBuffer, delta: isize, extend_selection: bool) {
        let (line, col) = buffer.char_to_line_col(self.position());
        let col = self.preferred_col.unwrap_or(col);
        let last_line = buffer.len_lines().saturating_sub(1);
        let target = line.saturating_add_signed(delta).min(last_line);

        let pos = if delta < 0 && line == 0 {
            0
        } else if delta > 0 && line == last_line {
            buffer.len_chars()
        } else {
            buffer.line_col_to_char(target, col)
        };
        self.set_position(pos, extend_selection);
        self.preferred_col = Some(col);
    }
}
