//! Error types for hadmin
//!
//! Every failure a restore can run into is reported through [`HadminError`].
//! Nothing is swallowed: a missing versioning directory, an empty snapshot
//! or a failing patch tool all surface as errors the caller can inspect.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Type alias for Results in the hadmin library
pub type Result<T> = std::result::Result<T, HadminError>;

/// Main error type for all hadmin operations
#[derive(Debug, Error)]
pub enum HadminError {
    /// Malformed or out-of-range date/time input
    #[error("Parse error: {input:?}: {reason}")]
    Parse {
        /// The offending input string
        input: String,
        /// What was wrong with it
        reason: String,
    },

    /// No candidate to choose from
    #[error("No {what} found in {location:?}")]
    EmptySet {
        /// Kind of candidate ("snapshots", "patches")
        what: &'static str,
        /// Directory that was searched
        location: PathBuf,
    },

    /// Target file or versioning directory does not exist
    #[error("Path does not exist: {0:?}")]
    MissingPath(PathBuf),

    /// External patch tool exited unsuccessfully
    #[error("{program} failed ({status}): {stderr}")]
    ExternalTool {
        /// Program that was run
        program: String,
        /// Exit status reported by the program
        status: ExitStatus,
        /// Captured standard error, trimmed
        stderr: String,
    },

    /// External patch tool could not be started at all
    #[error("Could not run {program}: {source}")]
    ToolUnavailable {
        /// Program that was looked up
        program: String,
        /// Spawn error
        #[source]
        source: std::io::Error,
    },

    /// I/O errors while reading the versioning directory
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors during JSON serialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl HadminError {
    /// Create a parse error for `input`
    pub fn parse(input: impl Into<String>, reason: impl Into<String>) -> Self {
        HadminError::Parse {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error means the versioning data was not there to begin with
    pub fn is_missing_input(&self) -> bool {
        matches!(
            self,
            HadminError::MissingPath(_) | HadminError::EmptySet { .. }
        )
    }

    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            HadminError::Parse { input, reason } => {
                format!(
                    "Could not parse {:?}: {}. Dates use dd-mm-YYYY and times use hh.mm.ss.",
                    input, reason
                )
            }
            HadminError::MissingPath(path) => {
                format!(
                    "{:?} does not exist. Check the path and that hieronymus has versioned it.",
                    path
                )
            }
            HadminError::EmptySet { what, location } => {
                format!("No {} found in {:?}. Nothing to restore from.", what, location)
            }
            HadminError::ToolUnavailable { program, .. } => {
                format!(
                    "Could not run '{}'. Make sure it is installed and on PATH, or point --program at it.",
                    program
                )
            }
            _ => self.to_string(),
        }
    }
}
