//! Native dialogs and window chrome for the document controller.

use notepad_core::{Confirmation, Shell};
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use winit::window::Window;

/// Extension given to save names typed without one.
const DEFAULT_EXTENSION: &str = "txt";

/// Appends the default extension when `path` has none.
pub fn with_default_extension(path: PathBuf) -> PathBuf {
    if path.extension().is_some() {
        return path;
    }
    let mut path = path;
    path.set_extension(DEFAULT_EXTENSION);
    path
}

fn file_dialog(title: &str, window: Option<&Window>) -> FileDialog {
    let dialog = FileDialog::new()
        .set_title(title)
        .add_filter("Text Files", &[DEFAULT_EXTENSION])
        .add_filter("All Files", &["*"]);
    match window {
        Some(window) => dialog.set_parent(window),
        None => dialog,
    }
}

/// [`Shell`] backed by the platform's dialogs and the winit window.
#[derive(Default)]
pub struct DesktopShell {
    window: Option<Arc<Window>>,
    title: String,
    exit_requested: bool,
}

impl DesktopShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the shell to the window once it exists. Any title set
    /// before that is applied now.
    pub fn attach(&mut self, window: Arc<Window>) {
        window.set_title(&self.title);
        self.window = Some(window);
    }

    /// The last title the controller asked for.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Whether the controller has asked to close the application.
    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    fn parent(&self) -> Option<&Window> {
        self.window.as_deref()
    }
}

impl Shell for DesktopShell {
    fn confirm_unsaved(&mut self) -> Confirmation {
        let mut dialog = MessageDialog::new()
            .set_level(MessageLevel::Warning)
            .set_title("Unsaved Changes")
            .set_description("You have unsaved changes. Do you want to save them?")
            .set_buttons(MessageButtons::YesNoCancel);
        if let Some(window) = self.parent() {
            dialog = dialog.set_parent(window);
        }
        match dialog.show() {
            MessageDialogResult::Yes => Confirmation::Save,
            MessageDialogResult::No => Confirmation::Discard,
            _ => Confirmation::Cancel,
        }
    }

    fn pick_open_path(&mut self) -> Option<PathBuf> {
        let path = file_dialog("Open", self.parent()).pick_file();
        if path.is_none() {
            log::debug!("Open dialog cancelled");
        }
        path
    }

    fn pick_save_path(&mut self) -> Option<PathBuf> {
        let path = file_dialog("Save As", self.parent())
            .set_file_name(format!("untitled.{DEFAULT_EXTENSION}"))
            .save_file();
        if path.is_none() {
            log::debug!("Save dialog cancelled");
        }
        path.map(with_default_extension)
    }

    fn show_error(&mut self, title: &str, message: &str) {
        let mut dialog = MessageDialog::new()
            .set_level(MessageLevel::Error)
            .set_title(title)
            .set_description(message)
            .set_buttons(MessageButtons::Ok);
        if let Some(window) = self.parent() {
            dialog = dialog.set_parent(window);
        }
        dialog.show();
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
        if let Some(window) = &self.window {
            window.set_title(title);
        }
    }

    fn request_exit(&mut self) {
        log::info!("Exit requested");
        self.exit_requested = true;
    }
}

/// Display name for a path, as used in log lines.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
