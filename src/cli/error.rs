//! CLI-level errors (wraps document and settings errors)

use thiserror::Error;

use crate::errors::ArbError;
use crate::settings::SettingsError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Book(#[from] ArbError),

    #[error("{0}")]
    Settings(#[from] SettingsError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Settings(_) => crate::exitcode::CONFIG,
            CliError::Book(e) => match e {
                ArbError::Io(_) => crate::exitcode::IOERR,
                ArbError::Aborted => crate::exitcode::SOFTWARE,
                _ => crate::exitcode::DATAERR,
            },
        }
    }
}
