use std::path::{Path, PathBuf};
use thiserror::Error;

/// All errors produced by Sales Explorer.
#[derive(Error, Debug)]
pub enum SalesError {
    /// The dataset path does not exist.
    #[error("file '{}' not found", .0.display())]
    NotFound(PathBuf),

    /// The file exists but its content could not be decoded as a table.
    #[error("failed to parse file '{}': {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },

    /// The file holds no columns at all.
    #[error("file '{}' is empty", .0.display())]
    EmptyData(PathBuf),

    /// A column required by an aggregation is absent from the table.
    #[error("Column not found: {0}")]
    MissingColumn(String),

    /// A cell in a numeric column holds text that is not a number.
    #[error("Non-numeric value {value:?} in column {column} at row {row}")]
    NotNumeric {
        column: String,
        row: usize,
        value: String,
    },

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A report could not be serialised.
    #[error("Failed to serialise JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SalesError {
    /// Build a [`SalesError::Parse`] from anything printable.
    pub fn parse(path: &Path, reason: impl std::fmt::Display) -> Self {
        SalesError::Parse {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// The one-line message printed when loading a dataset fails.
    ///
    /// The three recognised load failures get a fixed wording; anything else
    /// is reported generically with its own message.
    pub fn diagnostic(&self) -> String {
        match self {
            SalesError::NotFound(path) => format!("Error: file '{}' not found", path.display()),
            SalesError::Parse { path, .. } => {
                format!("Error: failed to parse file '{}'", path.display())
            }
            SalesError::EmptyData(path) => format!("Error: file '{}' is empty", path.display()),
            other => format!("Error while opening file: {}", other),
        }
    }
}

/// Convenience alias used throughout the sales crates.
pub type Result<T> = std::result::Result<T, SalesError>;
