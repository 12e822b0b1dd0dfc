//! Record store error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during record store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The file exists but its content cannot be read as the expected table.
    #[error("Malformed table {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// CSV encoding error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Filesystem error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Creates a malformed table error for the given file.
    pub fn malformed(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Malformed {
            path: path.into(),
            source,
        }
    }
}

/// Result type for record store operations.
pub type StoreResult<T> = Result<T, StoreError>;
