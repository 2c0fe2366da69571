//! Error types for loading and querying the panel.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort loading a panel file. No partial relation is ever
/// returned alongside one of these.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File missing or unreadable.
    #[error("cannot read {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File present but not a readable table.
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Header row lacks a required column.
    #[error("required column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },
}

impl LoadError {
    pub(crate) fn parse(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        LoadError::Parse {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

/// Errors raised by query operations on a loaded relation.
#[derive(Debug, Error, PartialEq)]
pub enum QueryError {
    #[error("year range start {start} is after end {end}")]
    InvertedYearRange { start: i32, end: i32 },

    #[error("unknown numeric column '{0}'")]
    UnknownColumn(String),
}
