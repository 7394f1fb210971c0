//! Error types and handling for presetmerge
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Per-file variants (`InvalidJson`, `MissingRoot`, `ProcessingFailed`) are
//! recorded in the run summary and never abort a merge. The remaining
//! variants end the run.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for presetmerge operations
#[derive(Error, Diagnostic, Debug)]
pub enum PresetError {
    // Per-file errors
    #[error("Not a valid JSON file: {path}: {reason}")]
    #[diagnostic(code(presetmerge::input::invalid_json))]
    InvalidJson { path: String, reason: String },

    #[error("'Root' key is missing or empty in {path}")]
    #[diagnostic(
        code(presetmerge::input::missing_root),
        help("Add a non-empty \"Root\" field to the file, or move it out of the directory")
    )]
    MissingRoot { path: String },

    #[error("Failed to process {path}: {reason}")]
    #[diagnostic(code(presetmerge::input::processing_failed))]
    ProcessingFailed { path: String, reason: String },

    // Run errors
    #[error("Failed to read directory '{path}': {reason}")]
    #[diagnostic(
        code(presetmerge::fs::dir_read_failed),
        help("Check that the directory exists and is readable")
    )]
    DirectoryReadFailed { path: String, reason: String },

    #[error("Failed to write output file '{path}': {reason}")]
    #[diagnostic(
        code(presetmerge::fs::write_failed),
        help("Check permissions and free space; any previous output file was left untouched")
    )]
    WriteFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(presetmerge::config::invalid))]
    ConfigInvalid { message: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(presetmerge::fs::io_error))]
    IoError { message: String },
}

impl PresetError {
    /// Whether this error only disqualifies one input file
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            Self::InvalidJson { .. } | Self::MissingRoot { .. } | Self::ProcessingFailed { .. }
        )
    }
}

/// Creates an invalid JSON error
pub fn invalid_json(path: impl Into<String>, reason: impl Into<String>) -> PresetError {
    PresetError::InvalidJson {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a processing failed error
pub fn processing_failed(path: impl Into<String>, reason: impl Into<String>) -> PresetError {
    PresetError::ProcessingFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a write failed error
pub fn write_failed(path: impl Into<String>, reason: impl Into<String>) -> PresetError {
    PresetError::WriteFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an invalid config error
pub fn config_invalid(message: impl Into<String>) -> PresetError {
    PresetError::ConfigInvalid {
        message: message.into(),
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, PresetError>;
