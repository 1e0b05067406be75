//! On-demand creation of repository directories.

use std::path::Path;

use crate::error::{LayoutError, Result};

/// Outcome of [`ensure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provisioned {
    /// The directory was already present.
    Existing,
    /// The directory (and any missing ancestors) was created.
    Created,
}

/// Make sure `path` exists as a directory, creating missing ancestors.
///
/// Logs the created path at `info` unless `quiet` is set.
pub fn ensure(path: &Path, quiet: bool) -> Result<Provisioned> {
    if path.is_dir() {
        return Ok(Provisioned::Existing);
    }

    std::fs::create_dir_all(path).map_err(|source| LayoutError::Provisioning {
        path: path.to_path_buf(),
        source,
    })?;

    if quiet {
        tracing::debug!(path = %path.display(), "created repository directory");
    } else {
        tracing::info!(path = %path.display(), "created repository directory");
    }
    Ok(Provisioned::Created)
}
