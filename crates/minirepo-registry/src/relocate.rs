//! Copying artifacts fetched from a local mirror into the repository root.
//!
//! A fetch from a `file://` upstream reports paths inside the mirror. To keep
//! the built repository self-contained those files are copied to the same
//! relative location under the root, and the reported paths rewritten.

use std::path::{Path, PathBuf};

use crate::client::DownloadedArtifact;
use crate::error::{RepoError, Result};
use crate::upstream::UpstreamRepository;

/// The local upstream used for relocation: the first `file://` entry.
///
/// Logs a warning when more than one local upstream is present.
pub fn local_source(repos: &[UpstreamRepository]) -> Option<&UpstreamRepository> {
    let mut local = repos.iter().filter(|r| r.is_local());
    let first = local.next()?;
    let ignored: Vec<String> = local.map(|r| r.to_string()).collect();
    if !ignored.is_empty() {
        tracing::warn!(
            used = %first,
            ignored = ?ignored,
            "more than one local repository given; only the first is used for relocation"
        );
    }
    Some(first)
}

/// Rebase artifacts under the local mirror onto `root`, copying the files.
///
/// Artifacts outside the mirror are returned unchanged. When no upstream
/// is local the input is returned as is.
pub fn relocate(
    downloaded: Vec<DownloadedArtifact>,
    repos: &[UpstreamRepository],
    root: &Path,
    quiet: bool,
) -> Result<Vec<DownloadedArtifact>> {
    relocate_from(downloaded, local_source(repos), root, quiet)
}

/// [`relocate`] with the local mirror already chosen by [`local_source`].
pub fn relocate_from(
    downloaded: Vec<DownloadedArtifact>,
    source: Option<&UpstreamRepository>,
    root: &Path,
    quiet: bool,
) -> Result<Vec<DownloadedArtifact>> {
    let Some(source) = source else {
        return Ok(downloaded);
    };
    if downloaded.is_empty() {
        return Ok(downloaded);
    }
    let source_dir = canonical(&source.local_path()?)?;
    let root_dir = canonical(root)?;

    downloaded
        .into_iter()
        .map(|artifact| {
            let from = canonical(&artifact.path)?;
            let Ok(relative) = from.strip_prefix(&source_dir) else {
                return Ok(artifact);
            };
            let to = root_dir.join(relative);
            if to != from {
                copy_into_place(&from, &to, quiet)?;
            }
            Ok(DownloadedArtifact {
                package: artifact.package,
                path: to,
            })
        })
        .collect()
}

fn canonical(path: &Path) -> Result<PathBuf> {
    path.canonicalize().map_err(|e| RepoError::Relocation {
        path: path.to_path_buf(),
        detail: format!("cannot resolve path: {e}"),
    })
}

fn copy_into_place(from: &Path, to: &Path, quiet: bool) -> Result<()> {
    if let Some(parent) = to.parent() {
        minirepo_layout::ensure(parent, quiet)?;
    }
    std::fs::copy(from, to).map_err(|e| RepoError::Relocation {
        path: from.to_path_buf(),
        detail: format!("copy to {} failed: {e}", to.display()),
    })?;
    tracing::debug!(from = %from.display(), to = %to.display(), "relocated artifact");
    Ok(())
}
