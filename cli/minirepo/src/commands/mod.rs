//! CLI command implementations.

pub mod index;
pub mod layout;
pub mod make;

use std::process::Command;

use anyhow::{bail, Result};
use minirepo_layout::{ArtifactFlavor, RuntimeVersion};

/// Placeholder version for source-only runs; it never reaches a path.
const SOURCE_ONLY: RuntimeVersion = RuntimeVersion::new(0, 0);

/// Pick the runtime version: flag, then config, then the installed `R`.
///
/// Source-only flavor sets fall back to a placeholder when nothing is found,
/// since the source layout does not depend on the version.
pub fn runtime_version(
    flag: Option<RuntimeVersion>,
    config: Option<RuntimeVersion>,
    flavors: &[ArtifactFlavor],
) -> Result<RuntimeVersion> {
    resolve_runtime_version(flag, config, flavors, detect_r_version)
}

fn resolve_runtime_version(
    flag: Option<RuntimeVersion>,
    config: Option<RuntimeVersion>,
    flavors: &[ArtifactFlavor],
    detect: impl FnOnce() -> Option<RuntimeVersion>,
) -> Result<RuntimeVersion> {
    if let Some(version) = flag.or(config) {
        return Ok(version);
    }
    if let Some(version) = detect() {
        tracing::debug!(version = %version, "detected runtime version");
        return Ok(version);
    }
    if flavors.iter().all(|f| !f.is_binary()) {
        return Ok(SOURCE_ONLY);
    }
    bail!("binary flavors need a runtime version; pass --runtime-version or set repository.runtime_version")
}

/// Ask `R --version` for the installed runtime version.
fn detect_r_version() -> Option<RuntimeVersion> {
    let output = Command::new("R").arg("--version").output().ok()?;
    if !output.status.success() {
        return None;
    }
    RuntimeVersion::from_banner(&String::from_utf8_lossy(&output.stdout))
}

/// Flags win over config; empty means `[Source]`.
pub fn pick_flavors(flag: Vec<ArtifactFlavor>, config: &[ArtifactFlavor]) -> Vec<ArtifactFlavor> {
    if !flag.is_empty() {
        flag
    } else if !config.is_empty() {
        config.to_vec()
    } else {
        vec![ArtifactFlavor::Source]
    }
}
