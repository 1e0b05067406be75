//! Error types for layout operations.

use std::path::PathBuf;

/// Errors that can occur while resolving or provisioning repository paths.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    /// The flavor label does not name a supported artifact flavor.
    #[error("unsupported artifact flavor: '{name}'")]
    UnsupportedFlavor {
        /// The label that failed to parse.
        name: String,
    },

    /// The runtime version string is not `major.minor[.patch]`.
    #[error("invalid runtime version '{value}': expected <major>.<minor>")]
    InvalidRuntimeVersion {
        /// The rejected input.
        value: String,
    },

    /// A repository directory could not be created.
    #[error("cannot create directory {}: {source}", path.display())]
    Provisioning {
        /// The directory that could not be created.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

/// Result type for layout operations.
pub type Result<T> = std::result::Result<T, LayoutError>;
