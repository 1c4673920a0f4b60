//! Commands the shell can dispatch to the document controller.

/// Every user-facing command, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    // File
    Open,
    Save,
    SaveAs,
    Exit,

    // Edit
    Undo,
    Redo,

    // View
    LightMode,
    DarkMode,
    ToggleReadOnly,
    ZoomIn,
    ZoomOut,
    ResetZoom,
}

/// Top-level menu a command belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Menu {
    File,
    Edit,
    View,
}

impl Command {
    pub const ALL: [Command; 12] = [
        Command::Open,
        Command::Save,
        Command::SaveAs,
        Command::Exit,
        Command::Undo,
        Command::Redo,
        Command::LightMode,
        Command::DarkMode,
        Command::ToggleReadOnly,
        Command::ZoomIn,
        Command::ZoomOut,
        Command::ResetZoom,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Command::Open => "Open",
            Command::Save => "Save",
            Command::SaveAs => "Save As",
            Command::Exit => "Exit",
            Command::Undo => "Undo",
            Command::Redo => "Redo",
            Command::LightMode => "Light Mode",
            Command::DarkMode => "Dark Mode",
            Command::ToggleReadOnly => "Read-Only Mode",
            Command::ZoomIn => "Zoom In",
            Command::ZoomOut => "Zoom Out",
            Command::ResetZoom => "Reset Zoom",
        }
    }

    /// Accelerator shown next to the label, if the command has one.
    pub fn accelerator(self) -> Option<&'static str> {
        match self {
            Command::Open => Some("Ctrl+O"),
            Command::Save => Some("Ctrl+S"),
            Command::SaveAs => Some("Ctrl+Shift+S"),
            Command::Exit => Some("Alt+F4"),
            Command::Undo => Some("Ctrl+Z"),
            Command::Redo => Some("Ctrl+Y"),
            Command::LightMode => Some("Ctrl+Shift+L"),
            Command::DarkMode => Some("Ctrl+Shift+D"),
            Command::ToggleReadOnly => Some("Ctrl+Shift+R"),
            Command::ZoomIn => Some("Ctrl+="),
            Command::ZoomOut => Some("Ctrl+-"),
            Command::ResetZoom => Some("Ctrl+0"),
        }
    }

    pub fn menu(self) -> Menu {
        match self {
            Command::Open | Command::Save | Command::SaveAs | Command::Exit => Menu::File,
            Command::Undo | Command::Redo => Menu::Edit,
            _ => Menu::View,
        }
    }
}
