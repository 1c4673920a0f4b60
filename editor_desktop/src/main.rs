//! Notepad - a single-document plain-text editor.
//!
//! Usage: notepad [FILE]

use notepad_ui::{run, EditorApp};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Notepad");

    let file_path = env::args_os().nth(1).map(PathBuf::from);

    let mut app = EditorApp::new();

    if let Some(path) = file_path {
        log::info!("Opening file: {}", path.display());
        if let Err(e) = app.load(&path) {
            log::error!("Failed to open '{}': {}", path.display(), e);
        }
    }

    match run(app) {
        Ok(()) => {
            log::info!("Notepad exited");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Notepad failed: {e}");
            ExitCode::FAILURE
        }
    }
}
