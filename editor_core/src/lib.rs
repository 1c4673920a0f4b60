//! Notepad Core - document and presentation logic.
//!
//! This crate contains the text widget, the document controller that ties
//! it to a file, and the theme/zoom/read-only state, without any
//! dependencies on windowing or rendering systems.

pub mod buffer;
pub mod command;
pub mod cursor;
pub mod document;
pub mod editor;
pub mod error;
pub mod history;
pub mod presentation;
pub mod theme;
pub mod widget;

pub use buffer::TextBuffer;
pub use command::{Command, Menu};
pub use cursor::{Cursor, Position, Selection};
pub use document::{Confirmation, DocumentController, Shell, UNTITLED_TITLE};
pub use editor::Editor;
pub use error::{DocumentError, DocumentResult};
pub use history::{EditOperation, History};
pub use presentation::{PresentationState, DEFAULT_FONT_SIZE, MIN_FONT_SIZE};
pub use theme::{Color, Theme};
pub use widget::BufferWidget;
