//! Repository error types.

use std::path::PathBuf;

use minirepo_layout::{ArtifactFlavor, LayoutError};

/// Errors that can occur while building or indexing a repository.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// The repository root does not exist.
    #[error("repository root does not exist: {}", path.display())]
    RootMissing { path: PathBuf },

    /// An upstream location is not a valid URL.
    #[error("invalid repository URL '{url}': {detail}")]
    InvalidUrl { url: String, detail: String },

    /// A `file://` URL does not map to a local path.
    #[error("'{url}' is not a local file URL")]
    NotLocal { url: String },

    /// A flavor's directory could not be created.
    #[error("cannot provision {flavor} directory: {source}")]
    Provisioning {
        flavor: ArtifactFlavor,
        #[source]
        source: LayoutError,
    },

    /// The HTTP client could not be constructed.
    #[error("cannot build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// HTTP transport failure.
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Upstream answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// A downloaded file could not be copied into the repository.
    #[error("cannot relocate {}: {detail}", path.display())]
    Relocation { path: PathBuf, detail: String },

    /// Layout error.
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// Index read/write error.
    #[error(transparent)]
    Index(#[from] minirepo_index::IndexError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for repository operations.
pub type Result<T> = std::result::Result<T, RepoError>;
