//! Document error types.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of a document command.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Could not open the file: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not save the file: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The user dismissed a dialog. Not reported to the user.
    #[error("Cancelled by user")]
    Cancelled,
}

impl DocumentError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DocumentError::Cancelled)
    }

    /// Path involved in an I/O failure.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            DocumentError::Read { path, .. } | DocumentError::Write { path, .. } => Some(path),
            DocumentError::Cancelled => None,
        }
    }
}

/// Document result
pub type DocumentResult<T> = Result<T, DocumentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_cause() {
        let err = DocumentError::Write {
            path: PathBuf::from("/tmp/a.txt"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        };
        assert_eq!(err.to_string(), "Could not save the file: permission denied");
        assert_eq!(err.path(), Some(&PathBuf::from("/tmp/a.txt")));
        assert!(!err.is_cancelled());
    }

    #[test]
    fn test_cancelled() {
        assert!(DocumentError::Cancelled.is_cancelled());
        assert_eq!(DocumentError::Cancelled.path(), None);
    }
}
