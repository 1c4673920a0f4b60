//! Text storage backed by ropey.

use ropey::Rope;
use std::fmt;
use std::fs;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

/// The character content of a document.
///
/// Content is stored exactly as loaded: no newline is appended and line
/// endings are never normalised, so a load followed by a save writes the
/// same bytes back.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    rope: Rope,
}

impl TextBuffer {
    /// Creates a new empty text buffer.
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Creates a text buffer from a string.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Loads the whole file as UTF-8.
    ///
    /// Invalid UTF-8 is reported as [`io::ErrorKind::InvalidData`].
    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = fs::File::open(path)?;
        let rope = Rope::from_reader(BufReader::new(file))?;
        Ok(Self { rope })
    }

    /// Writes the whole buffer to `path`, replacing any existing file.
    ///
    /// The writer is flushed before returning so a buffered failure is
    /// reported instead of being dropped.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let file = fs::File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.rope.write_to(&mut writer)?;
        writer.flush()?;
        writer.get_ref().sync_all()
    }

    /// Returns the total number of characters in the buffer.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Returns the total number of lines in the buffer.
    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    /// Returns true if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Inserts a string at the given character index.
    pub fn insert(&mut self, char_idx: usize, text: &str) {
        let idx = char_idx.min(self.len_chars());
        self.rope.insert(idx, text);
    }

    /// Removes text in the given character range.
    pub fn remove(&mut self, start: usize, end: usize) {
        let start = start.min(self.len_chars());
        let end = end.min(self.len_chars());
        if start < end {
            self.rope.remove(start..end);
        }
    }

    /// Returns the text in the given character range.
    pub fn slice(&self, start: usize, end: usize) -> String {
        let start = start.min(self.len_chars());
        let end = end.min(self.len_chars()).max(start);
        self.rope.slice(start..end).to_string()
    }

    /// Returns the character at the given index, if it exists.
    pub fn char_at(&self, char_idx: usize) -> Option<char> {
        (char_idx < self.len_chars()).then(|| self.rope.char(char_idx))
    }

    /// Index one caret step before `char_idx`. A `\r\n` pair is a single step.
    pub fn prev_boundary(&self, char_idx: usize) -> usize {
        let char_idx = char_idx.min(self.len_chars());
        if char_idx >= 2
            && self.char_at(char_idx - 1) == Some('\n')
            && self.char_at(char_idx - 2) == Some('\r')
        {
            return char_idx - 2;
        }
        char_idx.saturating_sub(1)
    }

    /// Index one caret step after `char_idx`. A `\r\n` pair is a single step.
    pub fn next_boundary(&self, char_idx: usize) -> usize {
        if self.char_at(char_idx) == Some('\r') && self.char_at(char_idx + 1) == Some('\n') {
            return char_idx + 2;
        }
        (char_idx + 1).min(self.len_chars())
    }

    /// Converts a character index to a 0-indexed (line, column) pair.
    pub fn char_to_line_col(&self, char_idx: usize) -> (usize, usize) {
        let char_idx = char_idx.min(self.len_chars());
        let line = self.rope.char_to_line(char_idx);
        (line, char_idx - self.rope.line_to_char(line))
    }

    /// Converts a 0-indexed (line, column) pair to a character index,
    /// clamping the column to the line's length.
    pub fn line_col_to_char(&self, line: usize, col: usize) -> usize {
        if line >= self.len_lines() {
            return self.len_chars();
        }
        self.rope.line_to_char(line) + col.min(self.line_len_chars(line))
    }

    /// Returns the length of a line in characters, excluding its line break.
    pub fn line_len_chars(&self, line: usize) -> usize {
        if line >= self.len_lines() {
            return 0;
        }
        let slice = self.rope.line(line);
        let mut len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            len -= 1;
            if len > 0 && slice.char(len - 1) == '\r' {
                len -= 1;
            }
        }
        len
    }

    /// Returns the character index of the start of a line.
    pub fn line_start(&self, line: usize) -> usize {
        if line >= self.len_lines() {
            self.len_chars()
        } else {
            self.rope.line_to_char(line)
        }
    }

    /// Returns the character index of the end of a line (before the break).
    pub fn line_end(&self, line: usize) -> usize {
        self.line_start(line) + self.line_len_chars(line)
    }

    /// Returns the line at the given index without its line break.
    pub fn line(&self, line: usize) -> Option<String> {
        if line >= self.len_lines() {
            return None;
        }
        let start = self.line_start(line);
        Some(self.slice(start, start + self.line_len_chars(line)))
    }
}

impl fmt::Display for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.rope.chunks() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}
