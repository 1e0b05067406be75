//! Flavor → directory mapping.

use std::path::{Path, PathBuf};

use crate::flavor::ArtifactFlavor;
use crate::runtime::RuntimeVersion;

/// Relative location of a flavor's contrib directory, as `/`-separated segments.
///
/// This is shared by local paths and upstream URLs so both agree on layout.
pub fn contrib_segments(flavor: ArtifactFlavor, version: RuntimeVersion) -> Vec<String> {
    match flavor.platform_segment() {
        None => vec!["src".to_string(), "contrib".to_string()],
        Some(platform) => {
            let mut segments = vec!["bin".to_string()];
            segments.extend(platform.split('/').map(str::to_string));
            segments.push("contrib".to_string());
            segments.push(version.to_string());
            segments
        }
    }
}

/// Relative contrib path for a flavor (e.g. `bin/windows/contrib/4.2`).
pub fn contrib_path(flavor: ArtifactFlavor, version: RuntimeVersion) -> PathBuf {
    contrib_segments(flavor, version).iter().collect()
}

/// Resolve the directory under `root` that holds artifacts of `flavor`.
///
/// Source artifacts ignore `version`.
pub fn resolve(root: &Path, flavor: ArtifactFlavor, version: RuntimeVersion) -> PathBuf {
    root.join(contrib_path(flavor, version))
}
