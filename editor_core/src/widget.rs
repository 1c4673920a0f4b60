//! The contract between the document controller and the text widget.

use crate::theme::Theme;

/// An editable text surface with its own undo history and modified flag.
///
/// The document controller drives the widget only through this trait, so
/// the dirty flag lives in exactly one place: [`BufferWidget::is_modified`].
pub trait BufferWidget {
    /// Returns the whole content.
    fn text(&self) -> String;

    /// Replaces the whole content programmatically.
    ///
    /// Allowed while read-only. Resets the caret and drops undo history but
    /// leaves the modified flag to the caller.
    fn set_text(&mut self, text: &str);

    /// Inserts text at the caret as a user edit. Returns false if rejected.
    fn insert_text(&mut self, text: &str) -> bool;

    /// Whether the content differs from the last load or save.
    fn is_modified(&self) -> bool;

    fn set_modified(&mut self, modified: bool);

    /// Reverts the latest edit step. Returns false if nothing changed.
    fn undo(&mut self) -> bool;

    /// Re-applies the latest undone step. Returns false if nothing changed.
    fn redo(&mut self) -> bool;

    fn is_editable(&self) -> bool;

    /// Enables or disables user edits.
    fn set_editable(&mut self, editable: bool);

    /// Font size in points.
    fn font_size(&self) -> u32;

    fn set_font_size(&mut self, points: u32);

    fn theme(&self) -> &'static Theme;

    /// Replaces every display color at once.
    fn set_theme(&mut self, theme: &'static Theme);
}
