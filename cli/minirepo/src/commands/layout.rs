//! `minirepo layout`: print each flavor's directory relative to the root.

use anyhow::Result;
use minirepo_layout::{contrib_path, ArtifactFlavor, RuntimeVersion};

/// One `<flavor> <relative path>` line per flavor.
pub fn lines(version: RuntimeVersion) -> Vec<String> {
    ArtifactFlavor::ALL
        .iter()
        .map(|&flavor| {
            format!(
                "{:<22} {}",
                flavor.label(),
                contrib_path(flavor, version).display()
            )
        })
        .collect()
}

pub fn run(version: RuntimeVersion) -> Result<()> {
    for line in lines(version) {
        println!("{line}");
    }
    Ok(())
}
