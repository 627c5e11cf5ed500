//! Error types for the viewer crate.

use std::path::PathBuf;

use thiserror::Error;

/// Viewer error type covering every request-fatal failure.
///
/// Read failures on an already validated file are not represented here: the
/// readers recover them into empty results.
#[derive(Debug, Error)]
pub enum ViewerError {
    // Path validation errors
    /// The requested path is malformed or escapes the log root.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// The requested file or directory does not exist.
    #[error("path not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The requested path exists but is not a regular file.
    #[error("path is not a file: {}", .0.display())]
    NotAFile(PathBuf),

    /// The requested path exists but is not a directory.
    #[error("path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    // Root errors
    /// The configured log root cannot be resolved.
    #[error("log root is unavailable: {}", path.display())]
    RootUnavailable {
        /// The configured root.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ViewerError {
    /// Whether a request layer should answer this error with "not found".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ViewerError::InvalidPath(_)
                | ViewerError::NotFound(_)
                | ViewerError::NotAFile(_)
                | ViewerError::NotADirectory(_)
        )
    }
}

/// Result type alias for viewer operations.
pub type Result<T> = std::result::Result<T, ViewerError>;
