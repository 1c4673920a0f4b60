//! Theme, zoom and read-only state.
//!
//! Every change is pushed to the widget in the same call, so the widget's
//! display attributes never lag behind this state.

use crate::theme::Theme;
use crate::widget::BufferWidget;

/// Font size in points at start-up and after a zoom reset.
pub const DEFAULT_FONT_SIZE: u32 = 12;

/// Smallest font size zooming out can reach.
pub const MIN_FONT_SIZE: u32 = 7;

/// Display state of the editing surface. Not persisted between runs.
#[derive(Debug, Clone, PartialEq)]
pub struct PresentationState {
    theme: &'static Theme,
    font_size: u32,
    read_only: bool,
}

impl Default for PresentationState {
    fn default() -> Self {
        Self {
            theme: Theme::light(),
            font_size: DEFAULT_FONT_SIZE,
            read_only: false,
        }
    }
}

impl PresentationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn theme(&self) -> &'static Theme {
        self.theme
    }

    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Pushes the whole state to a widget, e.g. right after construction.
    pub fn apply_to<W: BufferWidget>(&self, widget: &mut W) {
        widget.set_theme(self.theme);
        widget.set_font_size(self.font_size);
        widget.set_editable(!self.read_only);
    }

    /// Switches to the named built-in theme.
    ///
    /// Unknown names leave every color unchanged and return false.
    pub fn apply_theme<W: BufferWidget>(&mut self, widget: &mut W, name: &str) -> bool {
        let Some(theme) = Theme::builtin(name) else {
            log::debug!("Ignoring unknown theme {name:?}");
            return false;
        };
        self.theme = theme;
        widget.set_theme(theme);
        log::info!("Applied {} theme", theme.name);
        true
    }

    /// Flips read-only mode and returns the new value.
    pub fn toggle_read_only<W: BufferWidget>(&mut self, widget: &mut W) -> bool {
        self.read_only = !self.read_only;
        widget.set_editable(!self.read_only);
        log::debug!("Read-only mode {}", if self.read_only { "on" } else { "off" });
        self.read_only
    }

    /// Grows the font by one point. There is no upper bound.
    pub fn zoom_in<W: BufferWidget>(&mut self, widget: &mut W) {
        self.set_font_size(widget, self.font_size.saturating_add(1));
    }

    /// Shrinks the font by one point, never below [`MIN_FONT_SIZE`].
    pub fn zoom_out<W: BufferWidget>(&mut self, widget: &mut W) {
        if self.font_size > MIN_FONT_SIZE {
            self.set_font_size(widget, self.font_size - 1);
        }
    }

    pub fn reset_zoom<W: BufferWidget>(&mut self, widget: &mut W) {
        self.set_font_size(widget, DEFAULT_FONT_SIZE);
    }

    fn set_font_size<W: BufferWidget>(&mut self, widget: &mut W, points: u32) {
        self.font_size = points;
        widget.set_font_size(points);
        log::debug!("Font size {points}pt");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::Editor;

    fn setup() -> (PresentationState, Editor) {
        let state = PresentationState::new();
        let mut editor = Editor::new();
        state.apply_to(&mut editor);
        (state, editor)
    }

    #[test]
    fn test_defaults() {
        let (state, editor) = setup();
        assert_eq!(state.font_size(), 12);
        assert_eq!(state.theme(), Theme::light());
        assert!(!state.is_read_only());
        assert!(editor.is_editable());
    }

    #[test]
    fn test_zoom_out_floor() {
        let (mut state, mut editor) = setup();
        for _ in 0..4 {
            state.zoom_out(&mut editor);
        }
        assert_eq!(state.font_size(), 8);

        state.zoom_out(&mut editor);
        assert_eq!(state.font_size(), 7);
        assert_eq!(editor.font_size(), 7);

        state.zoom_out(&mut editor);
        assert_eq!(state.font_size(), 7);
        assert_eq!(editor.font_size(), 7);
    }

    #[test]
    fn test_zoom_in_is_unbounded_and_reset_restores_default() {
        let (mut state, mut editor) = setup();
        for _ in 0..50 {
            state.zoom_in(&mut editor);
        }
        assert_eq!(state.font_size(), 62);
        assert_eq!(editor.font_size(), 62);

        state.zoom_out(&mut editor);
        state.reset_zoom(&mut editor);
        assert_eq!(state.font_size(), DEFAULT_FONT_SIZE);
        assert_eq!(editor.font_size(), DEFAULT_FONT_SIZE);
    }

    #[test]
    fn test_zoom_does_not_touch_modified_flag() {
        let (mut state, mut editor) = setup();
        state.zoom_in(&mut editor);
        state.zoom_out(&mut editor);
        state.reset_zoom(&mut editor);
        assert!(!editor.is_modified());
    }

    #[test]
    fn test_apply_theme() {
        let (mut state, mut editor) = setup();
        assert!(state.apply_theme(&mut editor, "Dark"));
        assert_eq!(state.theme(), Theme::dark());
        assert_eq!(editor.theme(), Theme::dark());
    }

    #[test]
    fn test_unknown_theme_is_ignored() {
        let (mut state, mut editor) = setup();
        state.apply_theme(&mut editor, "Dark");

        assert!(!state.apply_theme(&mut editor, "Purple"));
        assert_eq!(state.theme(), Theme::dark());
        assert_eq!(editor.theme(), Theme::dark());
    }

    #[test]
    fn test_toggle_read_only() {
        let (mut state, mut editor) = setup();
        assert!(state.toggle_read_only(&mut editor));
        assert!(!editor.is_editable());
        assert!(!editor.insert_text("x"));

        assert!(!state.toggle_read_only(&mut editor));
        assert!(editor.is_editable());
        assert!(editor.insert_text("x"));
    }
}
