//! Error types for mdgen.
//!
//! Library crates use [`MdGenError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all mdgen operations.
#[derive(Debug, thiserror::Error)]
pub enum MdGenError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// The source CSV file could not be opened.
    #[error("cannot open CSV file {path:?}: {source}")]
    SourceNotFound {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Malformed CSV record.
    #[error("CSV error in {path:?}: {message}")]
    Csv { path: PathBuf, message: String },

    /// The header row lacks one or more required columns.
    #[error(
        "Your CSV file does not contain the required header keys of body, title, and/or url (missing: {})",
        .missing.join(", ")
    )]
    MissingColumns { missing: Vec<String> },

    /// The CSV has a header row but no data rows.
    #[error("Your CSV contains no data")]
    EmptyData,

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Row-level data validation error (missing url cell, unsafe path, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// HTML- or Textile-to-Markdown conversion error.
    #[error("conversion error: {0}")]
    Conversion(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, MdGenError>;

impl MdGenError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Create a CSV error for the given source file.
    pub fn csv(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Csv {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
