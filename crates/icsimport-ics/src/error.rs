//! Error types for reading iCalendar documents.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for document operations.
pub type IcsResult<T> = Result<T, IcsError>;

/// Errors that can occur while reading an iCalendar document.
#[derive(Debug, Error)]
pub enum IcsError {
    /// The document could not be read from disk.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The document is not valid iCalendar syntax.
    #[error("invalid iCalendar data: {message}")]
    Syntax { message: String },
}

impl IcsError {
    /// Creates an IO error for the given path.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a syntax error.
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::Syntax {
            message: message.into(),
        }
    }
}
