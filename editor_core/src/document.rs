//! Document controller: ties the text widget to a file on disk.
//!
//! The controller owns the widget, the shell and the presentation state,
//! all handed in at construction. It keeps only the document's path; the
//! dirty flag is always read from the widget.

use crate::buffer::TextBuffer;
use crate::command::Command;
use crate::error::{DocumentError, DocumentResult};
use crate::presentation::PresentationState;
use crate::widget::BufferWidget;
use std::path::{Path, PathBuf};

/// Window title while no file is associated with the document.
pub const UNTITLED_TITLE: &str = "Notepad -- The Ultimate Edition";

/// Appended to the file name in the window title.
const TITLE_SUFFIX: &str = " - Simple Text Editor";

/// Answer to the unsaved-changes prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Save,
    Discard,
    Cancel,
}

/// What the controller needs from the windowing layer.
///
/// Dialog methods block until the user answers.
pub trait Shell {
    /// Asks whether to save unsaved changes before continuing.
    fn confirm_unsaved(&mut self) -> Confirmation;

    /// Asks for a file to open. `None` if the user cancelled.
    fn pick_open_path(&mut self) -> Option<PathBuf>;

    /// Asks for a destination to save to. `None` if the user cancelled.
    fn pick_save_path(&mut self) -> Option<PathBuf>;

    fn show_error(&mut self, title: &str, message: &str);

    fn set_title(&mut self, title: &str);

    /// Closes the application. Called at most once.
    fn request_exit(&mut self);
}

/// The open/save/exit protocol for a single document.
pub struct DocumentController<W: BufferWidget, S: Shell> {
    widget: W,
    shell: S,
    presentation: PresentationState,
    path: Option<PathBuf>,
    exited: bool,
}

impl<W: BufferWidget, S: Shell> DocumentController<W, S> {
    /// Creates an untitled, clean document and pushes the initial
    /// presentation and title.
    pub fn new(mut widget: W, mut shell: S) -> Self {
        let presentation = PresentationState::new();
        presentation.apply_to(&mut widget);
        widget.set_modified(false);
        shell.set_title(UNTITLED_TITLE);

        Self {
            widget,
            shell,
            presentation,
            path: None,
            exited: false,
        }
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    /// Mutable access for direct typing and caret movement.
    pub fn widget_mut(&mut self) -> &mut W {
        &mut self.widget
    }

    pub fn shell(&self) -> &S {
        &self.shell
    }

    pub fn shell_mut(&mut self) -> &mut S {
        &mut self.shell
    }

    pub fn presentation(&self) -> &PresentationState {
        &self.presentation
    }

    /// The file backing the document, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether the content differs from the last load or save.
    pub fn is_dirty(&self) -> bool {
        self.widget.is_modified()
    }

    /// Whether [`DocumentController::exit`] has completed.
    pub fn has_exited(&self) -> bool {
        self.exited
    }

    /// Window title for the current path.
    pub fn title(&self) -> String {
        match self.path.as_deref().and_then(Path::file_name) {
            Some(name) => format!("{}{}", name.to_string_lossy(), TITLE_SUFFIX),
            None => UNTITLED_TITLE.to_string(),
        }
    }

    /// Runs one shell command. Ignored once the application has exited.
    pub fn execute(&mut self, command: Command) {
        if self.exited {
            log::debug!("Ignoring {command:?} after exit");
            return;
        }
        match command {
            Command::Open => {
                self.open();
            }
            Command::Save => {
                self.save();
            }
            Command::SaveAs => {
                self.save_as();
            }
            Command::Exit => {
                self.exit();
            }
            Command::Undo => {
                self.widget.undo();
            }
            Command::Redo => {
                self.widget.redo();
            }
            Command::LightMode => {
                self.apply_theme("Light");
            }
            Command::DarkMode => {
                self.apply_theme("Dark");
            }
            Command::ToggleReadOnly => {
                self.toggle_read_only();
            }
            Command::ZoomIn => self.presentation.zoom_in(&mut self.widget),
            Command::ZoomOut => self.presentation.zoom_out(&mut self.widget),
            Command::ResetZoom => self.presentation.reset_zoom(&mut self.widget),
        }
    }

    // ==================== File Commands ====================

    /// Asks for a file and loads it. Returns true if a file was loaded.
    ///
    /// Unsaved changes are resolved first; cancelling any dialog or a
    /// failed read leaves the document untouched.
    pub fn open(&mut self) -> bool {
        let result = self.try_open();
        self.finish(result)
    }

    fn try_open(&mut self) -> DocumentResult<()> {
        self.resolve_unsaved()?;
        let path = self.shell.pick_open_path().ok_or(DocumentError::Cancelled)?;
        self.load(&path)
    }

    /// Loads `path` into the widget without prompting.
    ///
    /// The file is read completely before the widget is touched, so on
    /// error the buffer, path and dirty flag are unchanged.
    pub fn load(&mut self, path: &Path) -> DocumentResult<()> {
        let loaded = TextBuffer::from_file(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        self.widget.set_text(&loaded.to_string());
        self.widget.set_modified(false);
        self.path = Some(path.to_path_buf());
        self.refresh_title();
        log::info!("Opened {}", path.display());
        Ok(())
    }

    /// Writes the buffer to its file, asking for one if untitled.
    /// Returns true if the content was persisted.
    pub fn save(&mut self) -> bool {
        let result = self.try_save();
        self.finish(result)
    }

    fn try_save(&mut self) -> DocumentResult<()> {
        let Some(path) = self.path.clone() else {
            return self.try_save_as();
        };
        self.write_to(&path)?;
        self.widget.set_modified(false);
        self.refresh_title();
        log::info!("Saved {}", path.display());
        Ok(())
    }

    /// Asks for a destination, adopts it, then saves.
    ///
    /// The new path is kept even if the write fails, so a later
    /// [`DocumentController::save`] retries the same destination.
    pub fn save_as(&mut self) -> bool {
        let result = self.try_save_as();
        self.finish(result)
    }

    fn try_save_as(&mut self) -> DocumentResult<()> {
        let path = self.shell.pick_save_path().ok_or(DocumentError::Cancelled)?;
        self.path = Some(path);
        self.refresh_title();
        self.try_save()
    }

    /// Closes the application once unsaved changes are resolved.
    /// Returns true if the application is exiting.
    pub fn exit(&mut self) -> bool {
        let result = self.try_exit();
        self.finish(result)
    }

    fn try_exit(&mut self) -> DocumentResult<()> {
        if self.exited {
            return Ok(());
        }
        self.resolve_unsaved()?;
        self.exited = true;
        log::info!("Exiting");
        self.shell.request_exit();
        Ok(())
    }

    // ==================== View Commands ====================

    /// Applies a built-in theme by name. Unknown names are ignored.
    pub fn apply_theme(&mut self, name: &str) -> bool {
        self.presentation.apply_theme(&mut self.widget, name)
    }

    pub fn toggle_read_only(&mut self) -> bool {
        self.presentation.toggle_read_only(&mut self.widget)
    }

    // ==================== Helpers ====================

    /// Runs the unsaved-changes prompt if the document is dirty.
    /// `Ok` means the caller may go on.
    fn resolve_unsaved(&mut self) -> DocumentResult<()> {
        if !self.is_dirty() {
            return Ok(());
        }
        match self.shell.confirm_unsaved() {
            Confirmation::Cancel => Err(DocumentError::Cancelled),
            Confirmation::Discard => Ok(()),
            Confirmation::Save => self.try_save(),
        }
    }

    fn write_to(&self, path: &Path) -> DocumentResult<()> {
        TextBuffer::from_text(&self.widget.text())
            .save_to_file(path)
            .map_err(|source| DocumentError::Write {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Reports a failed command to the user. Cancellation is silent.
    fn finish(&mut self, result: DocumentResult<()>) -> bool {
        let Err(err) = result else {
            return true;
        };
        if err.is_cancelled() {
            log::debug!("{err}");
            return false;
        }
        if let Some(path) = err.path() {
            log::error!("{} ({})", err, path.display());
        }
        self.shell.show_error("Error", &err.to_string());
        false
    }

    fn refresh_title(&mut self) {
        let title = self.title();
        self.shell.set_title(&title);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::Editor;
    use std::collections::VecDeque;
    use std::fs;

    /// Shell that answers dialogs from queues and records what it was told.
    #[derive(Default)]
    struct ScriptedShell {
        confirmations: VecDeque<Confirmation>,
        open_paths: VecDeque<Option<PathBuf>>,
        save_paths: VecDeque<Option<PathBuf>>,
        prompts: usize,
        titles: Vec<String>,
        errors: Vec<(String, String)>,
        exit_requests: usize,
    }

    impl Shell for ScriptedShell {
        fn confirm_unsaved(&mut self) -> Confirmation {
            self.prompts += 1;
            self.confirmations
                .pop_front()
                .expect("unexpected unsaved-changes prompt")
        }

        fn pick_open_path(&mut self) -> Option<PathBuf> {
            self.open_paths.pop_front().expect("unexpected open dialog")
        }

        fn pick_save_path(&mut self) -> Option<PathBuf> {
            self.save_paths.pop_front().expect("unexpected save dialog")
        }

        fn show_error(&mut self, title: &str, message: &str) {
            self.errors.push((title.to_string(), message.to_string()));
        }

        fn set_title(&mut self, title: &str) {
            self.titles.push(title.to_string());
        }

        fn request_exit(&mut self) {
            self.exit_requests += 1;
        }
    }

    type Controller = DocumentController<Editor, ScriptedShell>;

    fn controller() -> Controller {
        DocumentController::new(Editor::new(), ScriptedShell::default())
    }

    fn type_text(doc: &mut Controller, text: &str) {
        assert!(doc.widget_mut().insert_text(text));
    }

    fn last_title(doc: &Controller) -> &str {
        doc.shell().titles.last().map(String::as_str).unwrap_or_default()
    }

    #[test]
    fn test_starts_untitled_and_clean() {
        let doc = controller();
        assert_eq!(doc.path(), None);
        assert!(!doc.is_dirty());
        assert_eq!(doc.title(), UNTITLED_TITLE);
        assert_eq!(last_title(&doc), UNTITLED_TITLE);
        assert_eq!(doc.presentation().font_size(), 12);
    }

    #[test]
    fn test_exit_saves_untitled_document_then_terminates() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a.txt");

        let mut doc = controller();
        type_text(&mut doc, "hello");
        doc.shell_mut().confirmations.push_back(Confirmation::Save);
        doc.shell_mut().save_paths.push_back(Some(target.clone()));

        assert!(doc.exit());
        assert_eq!(fs::read_to_string(&target).unwrap(), "hello");
        assert!(!doc.is_dirty());
        assert!(doc.has_exited());
        assert_eq!(doc.shell().exit_requests, 1);
        assert_eq!(last_title(&doc), "a.txt - Simple Text Editor");
    }

    #[test]
    fn test_failed_save_keeps_dirty_and_reports() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        let target = sub.join("a.txt");

        let mut doc = controller();
        type_text(&mut doc, "hello");
        doc.shell_mut().save_paths.push_back(Some(target.clone()));
        assert!(doc.save());

        type_text(&mut doc, " world");
        fs::remove_dir_all(&sub).unwrap();

        assert!(!doc.save());
        assert!(doc.is_dirty());
        assert_eq!(doc.widget().text(), "hello world");
        assert_eq!(doc.path(), Some(target.as_path()));
        assert_eq!(doc.shell().errors.len(), 1);
        assert_eq!(doc.shell().errors[0].0, "Error");
        assert!(doc.shell().errors[0].1.starts_with("Could not save the file"));
        assert!(!doc.has_exited());
        assert_eq!(doc.shell().exit_requests, 0);
    }

    #[test]
    fn test_exit_aborts_when_save_fails() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("missing-dir").join("a.txt");

        let mut doc = controller();
        type_text(&mut doc, "hello");
        doc.shell_mut().confirmations.push_back(Confirmation::Save);
        doc.shell_mut().save_paths.push_back(Some(target));

        assert!(!doc.exit());
        assert!(!doc.has_exited());
        assert!(doc.is_dirty());
        assert_eq!(doc.shell().errors.len(), 1);
    }

    #[test]
    fn test_exit_aborts_when_save_as_cancelled() {
        let mut doc = controller();
        type_text(&mut doc, "hello");
        doc.shell_mut().confirmations.push_back(Confirmation::Save);
        doc.shell_mut().save_paths.push_back(None);

        assert!(!doc.exit());
        assert!(!doc.has_exited());
        assert!(doc.shell().errors.is_empty());
    }

    #[test]
    fn test_exit_cancel_and_discard() {
        let mut doc = controller();
        type_text(&mut doc, "draft");

        doc.shell_mut().confirmations.push_back(Confirmation::Cancel);
        assert!(!doc.exit());
        assert!(!doc.has_exited());

        doc.shell_mut().confirmations.push_back(Confirmation::Discard);
        assert!(doc.exit());
        assert!(doc.has_exited());
        assert_eq!(doc.path(), None);
        assert_eq!(doc.shell().exit_requests, 1);
    }

    #[test]
    fn test_exit_when_clean_does_not_prompt() {
        let mut doc = controller();
        assert!(doc.exit());
        assert_eq!(doc.shell().prompts, 0);
        assert_eq!(doc.shell().exit_requests, 1);
    }

    #[test]
    fn test_commands_ignored_after_exit() {
        let mut doc = controller();
        doc.execute(Command::Exit);
        doc.execute(Command::ZoomIn);
        doc.execute(Command::Exit);

        assert_eq!(doc.presentation().font_size(), 12);
        assert_eq!(doc.shell().exit_requests, 1);
    }

    #[test]
    fn test_save_as_then_open_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("notes.txt");
        let content = "line one\r\nline two\n\ttabbed\n";

        let mut doc = controller();
        type_text(&mut doc, content);
        doc.shell_mut().save_paths.push_back(Some(target.clone()));
        assert!(doc.save_as());
        assert!(!doc.is_dirty());

        let mut reader = controller();
        reader.shell_mut().open_paths.push_back(Some(target.clone()));
        assert!(reader.open());
        assert_eq!(reader.widget().text(), content);
        assert!(!reader.is_dirty());
        assert_eq!(reader.path(), Some(target.as_path()));
        assert_eq!(last_title(&reader), "notes.txt - Simple Text Editor");
    }

    #[test]
    fn test_save_twice_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a.txt");

        let mut doc = controller();
        type_text(&mut doc, "same");
        doc.shell_mut().save_paths.push_back(Some(target.clone()));

        assert!(doc.save());
        assert!(!doc.is_dirty());
        assert!(doc.save());
        assert!(!doc.is_dirty());
        assert_eq!(fs::read_to_string(&target).unwrap(), "same");
        // The second save reused the path without asking.
        assert!(doc.shell().save_paths.is_empty());
    }

    #[test]
    fn test_save_as_cancel_changes_nothing() {
        let mut doc = controller();
        type_text(&mut doc, "draft");
        doc.shell_mut().save_paths.push_back(None);

        assert!(!doc.save_as());
        assert_eq!(doc.path(), None);
        assert!(doc.is_dirty());
        assert_eq!(doc.title(), UNTITLED_TITLE);
    }

    #[test]
    fn test_save_as_keeps_path_when_write_fails() {
        let dir = tempfile::tempdir().unwrap();
        let later = dir.path().join("later");
        let target = later.join("a.txt");

        let mut doc = controller();
        type_text(&mut doc, "retry me");
        doc.shell_mut().save_paths.push_back(Some(target.clone()));

        assert!(!doc.save_as());
        assert_eq!(doc.path(), Some(target.as_path()));
        assert_eq!(last_title(&doc), "a.txt - Simple Text Editor");
        assert!(doc.is_dirty());

        // A plain save retries the adopted destination.
        fs::create_dir(&later).unwrap();
        assert!(doc.save());
        assert_eq!(fs::read_to_string(&target).unwrap(), "retry me");
        assert!(!doc.is_dirty());
    }

    #[test]
    fn test_open_picker_cancel_has_no_side_effects() {
        let dir = tempfile::tempdir().unwrap();
        let original = dir.path().join("orig.txt");
        fs::write(&original, "original").unwrap();

        let mut doc = controller();
        doc.load(&original).unwrap();
        type_text(&mut doc, "edited ");
        let before = doc.widget().text();

        doc.shell_mut().confirmations.push_back(Confirmation::Discard);
        doc.shell_mut().open_paths.push_back(None);

        assert!(!doc.open());
        assert_eq!(doc.widget().text(), before);
        assert_eq!(doc.path(), Some(original.as_path()));
        assert!(doc.is_dirty());
    }

    #[test]
    fn test_open_cancel_at_prompt_skips_picker() {
        let mut doc = controller();
        type_text(&mut doc, "draft");
        doc.shell_mut().confirmations.push_back(Confirmation::Cancel);

        assert!(!doc.open());
        assert_eq!(doc.widget().text(), "draft");
        assert!(doc.is_dirty());
    }

    #[test]
    fn test_open_aborts_when_save_is_cancelled() {
        let mut doc = controller();
        type_text(&mut doc, "draft");
        doc.shell_mut().confirmations.push_back(Confirmation::Save);
        doc.shell_mut().save_paths.push_back(None);

        // No open dialog is queued: reaching it would panic.
        assert!(!doc.open());
        assert_eq!(doc.shell().prompts, 1);
        assert_eq!(doc.widget().text(), "draft");
    }

    #[test]
    fn test_open_saves_first_when_asked() {
        let dir = tempfile::tempdir().unwrap();
        let draft = dir.path().join("draft.txt");
        let other = dir.path().join("other.txt");
        fs::write(&other, "other file").unwrap();

        let mut doc = controller();
        type_text(&mut doc, "draft");
        doc.shell_mut().confirmations.push_back(Confirmation::Save);
        doc.shell_mut().save_paths.push_back(Some(draft.clone()));
        doc.shell_mut().open_paths.push_back(Some(other.clone()));

        assert!(doc.open());
        assert_eq!(fs::read_to_string(&draft).unwrap(), "draft");
        assert_eq!(doc.widget().text(), "other file");
        assert_eq!(doc.path(), Some(other.as_path()));
        assert!(!doc.is_dirty());
    }

    #[test]
    fn test_open_failure_leaves_document_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let binary = dir.path().join("binary.txt");
        fs::write(&binary, [0xc3, 0x28, 0xff]).unwrap();

        let mut doc = controller();
        type_text(&mut doc, "keep me");
        doc.shell_mut().confirmations.push_back(Confirmation::Discard);
        doc.shell_mut().open_paths.push_back(Some(binary));

        assert!(!doc.open());
        assert_eq!(doc.widget().text(), "keep me");
        assert_eq!(doc.path(), None);
        assert!(doc.is_dirty());
        assert_eq!(doc.shell().errors.len(), 1);
        assert!(doc.shell().errors[0].1.starts_with("Could not open the file"));

        doc.shell_mut().open_paths.push_back(Some(dir.path().join("missing.txt")));
        doc.shell_mut().confirmations.push_back(Confirmation::Discard);
        assert!(!doc.open());
        assert_eq!(doc.shell().errors.len(), 2);
        assert_eq!(doc.widget().text(), "keep me");
    }

    #[test]
    fn test_open_while_read_only_loads_content() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("ro.txt");
        fs::write(&file, "read only").unwrap();

        let mut doc = controller();
        doc.execute(Command::ToggleReadOnly);
        doc.shell_mut().open_paths.push_back(Some(file));
        doc.execute(Command::Open);

        assert_eq!(doc.widget().text(), "read only");
        assert!(doc.presentation().is_read_only());
        assert!(!doc.widget_mut().insert_text("x"));
    }

    #[test]
    fn test_edit_commands_and_dirty_flag() {
        let mut doc = controller();
        type_text(&mut doc, "abc");
        assert!(doc.is_dirty());

        doc.execute(Command::Undo);
        assert_eq!(doc.widget().text(), "");
        doc.execute(Command::Redo);
        assert_eq!(doc.widget().text(), "abc");
    }

    #[test]
    fn test_view_commands() {
        let mut doc = controller();
        doc.execute(Command::DarkMode);
        assert_eq!(doc.widget().theme().name, "Dark");
        assert!(!doc.apply_theme("Purple"));
        assert_eq!(doc.widget().theme().name, "Dark");
        doc.execute(Command::LightMode);
        assert_eq!(doc.widget().theme().name, "Light");

        doc.execute(Command::ZoomIn);
        doc.execute(Command::ZoomIn);
        assert_eq!(doc.widget().font_size(), 14);
        doc.execute(Command::ResetZoom);
        assert_eq!(doc.widget().font_size(), 12);
        doc.execute(Command::ZoomOut);
        assert_eq!(doc.widget().font_size(), 11);

        assert!(!doc.is_dirty());
    }
}
