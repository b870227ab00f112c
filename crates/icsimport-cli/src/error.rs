//! CLI error types.

use icsimport_ics::IcsError;
use icsimport_store::StoreError;
use thiserror::Error;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Errors that end a CLI command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The .ics file could not be read.
    #[error(transparent)]
    Ics(#[from] IcsError),

    /// The store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The destination calendar does not exist.
    #[error("unknown calendar '{0}' (create it with `icsimport calendars add`)")]
    UnknownCalendar(String),
}
