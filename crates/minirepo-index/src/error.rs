//! Index error types.

use std::path::PathBuf;

/// Errors that can occur while reading package metadata or writing indexes.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// A DCF document could not be parsed.
    #[error("malformed DCF at line {line}: {detail}")]
    MalformedDcf { line: usize, detail: String },

    /// An archive does not contain `<package>/DESCRIPTION`.
    #[error("no DESCRIPTION for '{package}' in {}", path.display())]
    MissingDescription { path: PathBuf, package: String },

    /// A DESCRIPTION lacks a field the index requires.
    #[error("DESCRIPTION in {} has no '{field}' field", path.display())]
    MissingField { path: PathBuf, field: &'static str },

    /// An archive could not be read.
    #[error("cannot read archive {}: {detail}", path.display())]
    Archive { path: PathBuf, detail: String },

    /// An index file could not be written.
    #[error("cannot write index {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Zip container error.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for index operations.
pub type Result<T> = std::result::Result<T, IndexError>;
