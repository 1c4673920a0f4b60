//! The editing surface: text, caret, undo history and display attributes.

use crate::buffer::TextBuffer;
use crate::cursor::{Cursor, Position, Selection};
use crate::history::{EditOperation, History};
use crate::presentation::DEFAULT_FONT_SIZE;
use crate::theme::Theme;
use crate::widget::BufferWidget;

/// The editor's text widget.
///
/// User edits go through the `insert_*`/`delete_*` methods and are rejected
/// while the widget is read-only. Programmatic loads go through
/// [`BufferWidget::set_text`], which is always allowed.
#[derive(Debug)]
pub struct Editor {
    buffer: TextBuffer,
    cursor: Cursor,
    history: History,
    /// Set by every change to the content, cleared by the owner.
    modified: bool,
    editable: bool,
    font_size: u32,
    theme: &'static Theme,
    /// Number of visible lines (for page up/down and scrolling).
    visible_lines: usize,
    /// Number of visible columns.
    visible_cols: usize,
    /// First visible line.
    scroll_offset: usize,
    /// First visible column.
    horizontal_scroll: usize,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    /// Creates an empty, editable, unmodified widget.
    pub fn new() -> Self {
        Self {
            buffer: TextBuffer::new(),
            cursor: Cursor::new(),
            history: History::default(),
            modified: false,
            editable: true,
            font_size: DEFAULT_FONT_SIZE,
            theme: Theme::light(),
            visible_lines: 40,
            visible_cols: 80,
            scroll_offset: 0,
            horizontal_scroll: 0,
        }
    }

    /// Returns a reference to the buffer.
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// Returns the caret position as (line, column).
    pub fn cursor_position(&self) -> Position {
        let (line, col) = self.buffer.char_to_line_col(self.cursor.position());
        Position::new(line, col)
    }

    /// Returns the caret character index.
    pub fn cursor_char_index(&self) -> usize {
        self.cursor.position()
    }

    /// Returns the selected range if any, as character indices.
    pub fn selected_range(&self) -> Option<(usize, usize)> {
        self.cursor.selected_range()
    }

    pub fn has_selection(&self) -> bool {
        self.cursor.has_selection()
    }

    /// Returns the selected text, if any.
    pub fn selected_text(&self) -> Option<String> {
        self.selected_range()
            .map(|(start, end)| self.buffer.slice(start, end))
    }

    // ==================== Text Editing ====================

    /// Types a character at the caret, replacing any selection.
    pub fn insert_char(&mut self, ch: char) -> bool {
        let mut utf8 = [0u8; 4];
        self.replace_selection(ch.encode_utf8(&mut utf8))
    }

    pub fn insert_newline(&mut self) -> bool {
        self.insert_char('\n')
    }

    /// Deletes the selection, or the character before the caret.
    pub fn delete_backward(&mut self) -> bool {
        if self.has_selection() {
            return self.replace_selection("");
        }
        let pos = self.cursor.position();
        if pos == 0 {
            return self.ensure_editable();
        }
        self.delete_range(self.buffer.prev_boundary(pos), pos)
    }

    /// Deletes the selection, or the character after the caret.
    pub fn delete_forward(&mut self) -> bool {
        if self.has_selection() {
            return self.replace_selection("");
        }
        let pos = self.cursor.position();
        if pos >= self.buffer.len_chars() {
            return self.ensure_editable();
        }
        self.delete_range(pos, self.buffer.next_boundary(pos))
    }

    /// Removes the selection and returns its text (cut).
    pub fn take_selection(&mut self) -> Option<String> {
        let text = self.selected_text()?;
        self.replace_selection("").then_some(text)
    }

    fn delete_range(&mut self, start: usize, end: usize) -> bool {
        if !self.ensure_editable() {
            return false;
        }
        let before = self.cursor.selection;
        let text = self.buffer.slice(start, end);
        self.buffer.remove(start, end);
        self.cursor.set_position(start, false);
        self.commit(
            vec![EditOperation::Delete {
                position: start,
                text,
            }],
            before,
        );
        true
    }

    /// Replaces the selection (or inserts at the caret) with `text`.
    fn replace_selection(&mut self, text: &str) -> bool {
        if !self.ensure_editable() {
            return false;
        }
        let before = self.cursor.selection;
        let mut ops = Vec::with_capacity(2);

        if let Some((start, end)) = self.cursor.selected_range() {
            let removed = self.buffer.slice(start, end);
            self.buffer.remove(start, end);
            self.cursor.set_position(start, false);
            ops.push(EditOperation::Delete {
                position: start,
                text: removed,
            });
        }

        if !text.is_empty() {
            let pos = self.cursor.position();
            self.buffer.insert(pos, text);
            self.cursor.set_position(pos + text.chars().count(), false);
            ops.push(EditOperation::Insert {
                position: pos,
                text: text.to_string(),
            });
        }

        self.commit(ops, before);
        true
    }

    fn ensure_editable(&self) -> bool {
        if !self.editable {
            log::debug!("Edit rejected: buffer is read-only");
        }
        self.editable
    }

    /// Records applied operations as one undo step and marks the content
    /// modified.
    fn commit(&mut self, mut ops: Vec<EditOperation>, before: Selection) {
        let after = self.cursor.selection;
        match ops.len() {
            0 => return,
            1 => {
                if let Some(op) = ops.pop() {
                    self.history.record(op, before, after);
                }
            }
            _ => self.history.record_group(ops, before, after),
        }
        self.modified = true;
        self.scroll_to_cursor();
    }

    fn apply_operation(&mut self, op: &EditOperation) {
        match op {
            EditOperation::Insert { position, text } => {
                self.buffer.insert(*position, text);
            }
            EditOperation::Delete { position, text } => {
                self.buffer.remove(*position, *position + text.chars().count());
            }
        }
    }

    fn replay(&mut self, step: Option<(Vec<EditOperation>, Selection)>) -> bool {
        let Some((ops, selection)) = step else {
            return false;
        };
        for op in &ops {
            self.apply_operation(op);
        }
        self.cursor.selection = selection;
        self.cursor.clamp_to_buffer(&self.buffer);
        self.modified = true;
        self.scroll_to_cursor();
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ==================== Cursor Movement ====================

    /// Places the caret by line and column.
    pub fn set_cursor_position(&mut self, line: usize, col: usize, extend_selection: bool) {
        let pos = self.buffer.line_col_to_char(line, col);
        self.cursor.set_position(pos, extend_selection);
        self.scroll_to_cursor();
    }

    pub fn select_all(&mut self) {
        self.cursor.select_all(&self.buffer);
    }

    /// Moves left, or collapses a selection to its start.
    pub fn move_left(&mut self, extend_selection: bool) {
        match self.cursor.selected_range() {
            Some((start, _)) if !extend_selection => self.cursor.set_position(start, false),
            _ => self.cursor.move_left(&self.buffer, extend_selection),
        }
        self.scroll_to_cursor();
    }

    /// Moves right, or collapses a selection to its end.
    pub fn move_right(&mut self, extend_selection: bool) {
        match self.cursor.selected_range() {
            Some((_, end)) if !extend_selection => self.cursor.set_position(end, false),
            _ => self.cursor.move_right(&self.buffer, extend_selection),
        }
        self.scroll_to_cursor();
    }

    pub fn move_up(&mut self, extend_selection: bool) {
        self.cursor.move_up(&self.buffer, extend_selection);
        self.scroll_to_cursor();
    }

    pub fn move_down(&mut self, extend_selection: bool) {
        self.cursor.move_down(&self.buffer, extend_selection);
        self.scroll_to_cursor();
    }

    pub fn move_to_line_start(&mut self, extend_selection: bool) {
        self.cursor.move_to_line_start(&self.buffer, extend_selection);
        self.scroll_to_cursor();
    }

    pub fn move_to_line_end(&mut self, extend_selection: bool) {
        self.cursor.move_to_line_end(&self.buffer, extend_selection);
        self.scroll_to_cursor();
    }

    pub fn move_page_up(&mut self, extend_selection: bool) {
        self.cursor
            .move_page_up(&self.buffer, self.visible_lines, extend_selection);
        self.scroll_to_cursor();
    }

    pub fn move_page_down(&mut self, extend_selection: bool) {
        self.cursor
            .move_page_down(&self.buffer, self.visible_lines, extend_selection);
        self.scroll_to_cursor();
    }

    pub fn move_to_buffer_start(&mut self, extend_selection: bool) {
        self.cursor.move_to_buffer_start(extend_selection);
        self.scroll_to_cursor();
    }

    pub fn move_to_buffer_end(&mut self, extend_selection: bool) {
        self.cursor.move_to_buffer_end(&self.buffer, extend_selection);
        self.scroll_to_cursor();
    }

    // ==================== Scrolling ====================

    /// Returns the first visible line.
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Scrolls by a signed number of lines, clamped to the buffer.
    pub fn scroll_by(&mut self, lines: isize) {
        let max_offset = self.buffer.len_lines().saturating_sub(1);
        self.scroll_offset = self.scroll_offset.saturating_add_signed(lines).min(max_offset);
    }

    /// Returns the first visible column.
    pub fn horizontal_scroll(&self) -> usize {
        self.horizontal_scroll
    }

    pub fn visible_lines(&self) -> usize {
        self.visible_lines
    }

    pub fn set_visible_lines(&mut self, lines: usize) {
        self.visible_lines = lines.max(1);
    }

    pub fn visible_cols(&self) -> usize {
        self.visible_cols
    }

    pub fn set_visible_cols(&mut self, cols: usize) {
        self.visible_cols = cols.max(1);
    }

    /// Scrolls so the caret is inside the visible area.
    pub fn scroll_to_cursor(&mut self) {
        let (line, col) = self.buffer.char_to_line_col(self.cursor.position());

        if line < self.scroll_offset {
            self.scroll_offset = line;
        } else if line >= self.scroll_offset + self.visible_lines {
            self.scroll_offset = line + 1 - self.visible_lines;
        }

        // Keep a few columns of context on either side.
        let margin = 4.min(self.visible_cols / 2);
        if col < self.horizontal_scroll + margin {
            self.horizontal_scroll = col.saturating_sub(margin);
        } else if col + margin >= self.horizontal_scroll + self.visible_cols {
            self.horizontal_scroll = col + margin + 1 - self.visible_cols;
        }
    }
}

impl BufferWidget for Editor {
    fn text(&self) -> String {
        self.buffer.to_string()
    }

    fn set_text(&mut self, text: &str) {
        self.buffer = TextBuffer::from_text(text);
        self.cursor = Cursor::new();
        self.history.clear();
        self.scroll_offset = 0;
        self.horizontal_scroll = 0;
    }

    fn insert_text(&mut self, text: &str) -> bool {
        self.replace_selection(text)
    }

    fn is_modified(&self) -> bool {
        self.modified
    }

    fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }

    fn undo(&mut self) -> bool {
        if !self.ensure_editable() {
            return false;
        }
        let step = self.history.undo();
        self.replay(step)
    }

    fn redo(&mut self) -> bool {
        if !self.ensure_editable() {
            return false;
        }
        let step = self.history.redo();
        self.replay(step)
    }

    fn is_editable(&self) -> bool {
        self.editable
    }

    fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
    }

    fn font_size(&self) -> u32 {
        self.font_size
    }

    fn set_font_size(&mut self, points: u32) {
        self.font_size = points;
    }

    fn theme(&self) -> &'static Theme {
        self.theme
    }

    fn set_theme(&mut self, theme: &'static Theme) {
        self.theme = theme;
    }
}
