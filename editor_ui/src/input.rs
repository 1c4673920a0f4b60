//! Input handling and key mapping.

use notepad_core::{BufferWidget, Command, Editor};
use winit::event::{ElementState, MouseScrollDelta};
use winit::keyboard::{Key, ModifiersState, NamedKey};

/// Pixels per scrolled line for touchpad deltas.
const PIXELS_PER_LINE: f64 = 20.0;

/// Caret movements of the editing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
    PageUp,
    PageDown,
    BufferStart,
    BufferEnd,
}

/// Represents an editor command.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorCommand {
    /// A document or view command, routed through the controller.
    App(Command),

    // Text input
    InsertChar(char),
    InsertNewline,

    // Deletion
    DeleteBackward,
    DeleteForward,

    /// Moves the caret, extending the selection when `extend` is set.
    Move { motion: Motion, extend: bool },
    SelectAll,

    // Clipboard
    Copy,
    Cut,
    Paste,

    /// Scrolls the view by lines; negative is up.
    Scroll(isize),
}

/// Input handler that maps keyboard/mouse events to editor commands.
#[derive(Debug)]
pub struct InputHandler {
    modifiers: ModifiersState,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            modifiers: ModifiersState::empty(),
        }
    }

    pub fn update_modifiers_state(&mut self, modifiers: ModifiersState) {
        self.modifiers = modifiers;
    }

    fn is_primary_modifier(&self) -> bool {
        #[cfg(target_os = "macos")]
        {
            self.modifiers.super_key()
        }
        #[cfg(not(target_os = "macos"))]
        {
            self.modifiers.control_key()
        }
    }

    fn is_shift(&self) -> bool {
        self.modifiers.shift_key()
    }

    /// Handle character input (for text entry).
    pub fn handle_char_input(&self, ch: char) -> Option<EditorCommand> {
        // Control characters arrive as named keys instead.
        if ch.is_control() || self.is_primary_modifier() || self.modifiers.alt_key() {
            return None;
        }
        Some(EditorCommand::InsertChar(ch))
    }

    /// Maps a pressed key to a command. Printable text is left to
    /// [`handle_char_input`](Self::handle_char_input).
    pub fn handle_key_event(&self, key: &Key, state: ElementState) -> Option<EditorCommand> {
        if state != ElementState::Pressed {
            return None;
        }

        let primary = self.is_primary_modifier();
        let extend = self.is_shift();
        let motion = |motion| Some(EditorCommand::Move { motion, extend });

        match key {
            Key::Named(NamedKey::F4) if self.modifiers.alt_key() => {
                Some(EditorCommand::App(Command::Exit))
            }
            Key::Named(NamedKey::Enter) => Some(EditorCommand::InsertNewline),
            Key::Named(NamedKey::Backspace) => Some(EditorCommand::DeleteBackward),
            Key::Named(NamedKey::Delete) => Some(EditorCommand::DeleteForward),
            Key::Named(NamedKey::Tab) => Some(EditorCommand::InsertChar('\t')),
            Key::Named(NamedKey::Space) if !primary => Some(EditorCommand::InsertChar(' ')),
            Key::Named(NamedKey::ArrowLeft) => motion(Motion::Left),
            Key::Named(NamedKey::ArrowRight) => motion(Motion::Right),
            Key::Named(NamedKey::ArrowUp) => motion(Motion::Up),
            Key::Named(NamedKey::ArrowDown) => motion(Motion::Down),
            Key::Named(NamedKey::Home) if primary => motion(Motion::BufferStart),
            Key::Named(NamedKey::End) if primary => motion(Motion::BufferEnd),
            Key::Named(NamedKey::Home) => motion(Motion::LineStart),
            Key::Named(NamedKey::End) => motion(Motion::LineEnd),
            Key::Named(NamedKey::PageUp) => motion(Motion::PageUp),
            Key::Named(NamedKey::PageDown) => motion(Motion::PageDown),

            Key::Character(ch) if primary => self.shortcut(&ch.to_lowercase()),

            _ => None,
        }
    }

    /// Ctrl/Cmd shortcuts.
    fn shortcut(&self, key: &str) -> Option<EditorCommand> {
        let shift = self.is_shift();
        let command = match key {
            "o" => EditorCommand::App(Command::Open),
            "s" if shift => EditorCommand::App(Command::SaveAs),
            "s" => EditorCommand::App(Command::Save),
            "q" => EditorCommand::App(Command::Exit),
            "z" => EditorCommand::App(Command::Undo),
            "y" => EditorCommand::App(Command::Redo),
            "=" | "+" => EditorCommand::App(Command::ZoomIn),
            "-" => EditorCommand::App(Command::ZoomOut),
            "0" => EditorCommand::App(Command::ResetZoom),
            "l" if shift => EditorCommand::App(Command::LightMode),
            "d" if shift => EditorCommand::App(Command::DarkMode),
            "r" if shift => EditorCommand::App(Command::ToggleReadOnly),
            "a" => EditorCommand::SelectAll,
            "c" => EditorCommand::Copy,
            "x" => EditorCommand::Cut,
            "v" => EditorCommand::Paste,
            _ => return None,
        };
        Some(command)
    }

    pub fn handle_scroll(&self, delta: MouseScrollDelta) -> Option<EditorCommand> {
        let lines = match delta {
            MouseScrollDelta::LineDelta(_, y) => -(y.round() as isize),
            MouseScrollDelta::PixelDelta(pos) => -((pos.y / PIXELS_PER_LINE).round() as isize),
        };
        (lines != 0).then_some(EditorCommand::Scroll(lines))
    }
}

/// Applies a command that only touches the editing surface.
///
/// Returns false for commands that need the controller or the clipboard;
/// the caller handles those.
pub fn apply_to_editor(editor: &mut Editor, command: &EditorCommand) -> bool {
    match *command {
        EditorCommand::InsertChar(ch) => {
            editor.insert_char(ch);
        }
        EditorCommand::InsertNewline => {
            editor.insert_newline();
        }
        EditorCommand::DeleteBackward => {
            editor.delete_backward();
        }
        EditorCommand::DeleteForward => {
            editor.delete_forward();
        }
        EditorCommand::Move { motion, extend } => match motion {
            Motion::Left => editor.move_left(extend),
            Motion::Right => editor.move_right(extend),
            Motion::Up => editor.move_up(extend),
            Motion::Down => editor.move_down(extend),
            Motion::LineStart => editor.move_to_line_start(extend),
            Motion::LineEnd => editor.move_to_line_end(extend),
            Motion::PageUp => editor.move_page_up(extend),
            Motion::PageDown => editor.move_page_down(extend),
            Motion::BufferStart => editor.move_to_buffer_start(extend),
            Motion::BufferEnd => editor.move_to_buffer_end(extend),
        },
        EditorCommand::SelectAll => editor.select_all(),
        EditorCommand::Scroll(lines) => {
            editor.scroll_by(lines);
            return true;
        }
        EditorCommand::App(_)
        | EditorCommand::Copy
        | EditorCommand::Cut
        | EditorCommand::Paste => return false,
    }
    editor.scroll_to_cursor();
    true
}

/// Inserts clipboard text at the caret, replacing the selection.
pub fn paste(editor: &mut Editor, text: &str) -> bool {
    let inserted = editor.insert_text(text);
    editor.scroll_to_cursor();
    inserted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn primary() -> ModifiersState {
        if cfg!(target_os = "macos") {
            ModifiersState::SUPER
        } else {
            ModifiersState::CONTROL
        }
    }

    fn handler(modifiers: ModifiersState) -> InputHandler {
        let mut handler = InputHandler::new();
        handler.update_modifiers_state(modifiers);
        handler
    }

    fn press(handler: &InputHandler, key: Key) -> Option<EditorCommand> {
        handler.handle_key_event(&key, ElementState::Pressed)
    }

    fn char_key(s: &str) -> Key {
        Key::Character(s.into())
    }

    #[test]
    fn test_file_shortcuts() {
        let ctrl = handler(primary());
        assert_eq!(press(&ctrl, char_key("o")), Some(EditorCommand::App(Command::Open)));
        assert_eq!(press(&ctrl, char_key("s")), Some(EditorCommand::App(Command::Save)));
        assert_eq!(press(&ctrl, char_key("q")), Some(EditorCommand::App(Command::Exit)));

        let ctrl_shift = handler(primary() | ModifiersState::SHIFT);
        assert_eq!(
            press(&ctrl_shift, char_key("S")),
            Some(EditorCommand::App(Command::SaveAs))
        );
    }

    #[test]
    fn test_alt_f4_exits() {
        let alt = handler(ModifiersState::ALT);
        assert_eq!(
            press(&alt, Key::Named(NamedKey::F4)),
            Some(EditorCommand::App(Command::Exit))
        );
        assert_eq!(press(&handler(ModifiersState::empty()), Key::Named(NamedKey::F4)), None);
    }

    #[test]
    fn test_zoom_shortcuts() {
        let ctrl = handler(primary());
        assert_eq!(press(&ctrl, char_key("=")), Some(EditorCommand::App(Command::ZoomIn)));
        assert_eq!(press(&ctrl, char_key("+")), Some(EditorCommand::App(Command::ZoomIn)));
        assert_eq!(press(&ctrl, char_key("-")), Some(EditorCommand::App(Command::ZoomOut)));
        assert_eq!(press(&ctrl, char_key("0")), Some(EditorCommand::App(Command::ResetZoom)));
    }

    #[test]
    fn test_view_shortcuts_need_shift() {
        let ctrl = handler(primary());
        assert_eq!(press(&ctrl, char_key("d")), None);

        let ctrl_shift = handler(primary() | ModifiersState::SHIFT);
        assert_eq!(press(&ctrl_shift, char_key("D")), Some(EditorCommand::App(Command::DarkMode)));
        assert_eq!(press(&ctrl_shift, char_key("L")), Some(EditorCommand::App(Command::LightMode)));
        assert_eq!(
            press(&ctrl_shift, char_key("R")),
            Some(EditorCommand::App(Command::ToggleReadOnly))
        );
    }

    #[test]
    fn test_motion_keys() {
        let plain = handler(ModifiersState::empty());
        assert_eq!(
            press(&plain, Key::Named(NamedKey::Home)),
            Some(EditorCommand::Move { motion: Motion::LineStart, extend: false })
        );

        let shift = handler(ModifiersState::SHIFT);
        assert_eq!(
            press(&shift, Key::Named(NamedKey::ArrowRight)),
            Some(EditorCommand::Move { motion: Motion::Right, extend: true })
        );

        let ctrl = handler(primary());
        assert_eq!(
            press(&ctrl, Key::Named(NamedKey::End)),
            Some(EditorCommand::Move { motion: Motion::BufferEnd, extend: false })
        );
    }

    #[test]
    fn test_release_is_ignored() {
        let ctrl = handler(primary());
        assert_eq!(ctrl.handle_key_event(&char_key("s"), ElementState::Released), None);
    }

    #[test]
    fn test_char_input() {
        let plain = handler(ModifiersState::empty());
        assert_eq!(plain.handle_char_input('a'), Some(EditorCommand::InsertChar('a')));
        assert_eq!(plain.handle_char_input('\u{8}'), None);
        assert_eq!(handler(primary()).handle_char_input('a'), None);
        assert_eq!(
            press(&plain, Key::Named(NamedKey::Space)),
            Some(EditorCommand::InsertChar(' '))
        );
    }

    #[test]
    fn test_scroll() {
        let plain = handler(ModifiersState::empty());
        assert_eq!(
            plain.handle_scroll(MouseScrollDelta::LineDelta(0.0, 3.0)),
            Some(EditorCommand::Scroll(-3))
        );
        assert_eq!(
            plain.handle_scroll(MouseScrollDelta::LineDelta(0.0, -1.0)),
            Some(EditorCommand::Scroll(1))
        );
        assert_eq!(plain.handle_scroll(MouseScrollDelta::LineDelta(0.0, 0.0)), None);
    }

    #[test]
    fn test_apply_to_editor() {
        let mut editor = Editor::new();
        for ch in "hi".chars() {
            assert!(apply_to_editor(&mut editor, &EditorCommand::InsertChar(ch)));
        }
        apply_to_editor(&mut editor, &EditorCommand::SelectAll);
        assert_eq!(editor.selected_text().as_deref(), Some("hi"));

        apply_to_editor(&mut editor, &EditorCommand::Move { motion: Motion::BufferEnd, extend: false });
        apply_to_editor(&mut editor, &EditorCommand::DeleteBackward);
        assert_eq!(editor.text(), "h");

        assert!(!apply_to_editor(&mut editor, &EditorCommand::App(Command::Save)));
        assert!(!apply_to_editor(&mut editor, &EditorCommand::Paste));
    }

    #[test]
    fn test_paste_replaces_selection() {
        let mut editor = Editor::new();
        editor.insert_text("old");
        editor.select_all();
        assert!(paste(&mut editor, "new"));
        assert_eq!(editor.text(), "new");
    }
}
