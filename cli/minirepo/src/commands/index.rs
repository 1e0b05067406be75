//! `minirepo index`: rewrite `PACKAGES` for existing flavor directories.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use minirepo_layout::{ArtifactFlavor, RuntimeVersion};
use minirepo_registry::{update_repo_index, IndexSummary, PackagesIndexWriter};

pub fn run(
    root: &Path,
    flavors: &[ArtifactFlavor],
    version: RuntimeVersion,
) -> Result<BTreeMap<ArtifactFlavor, IndexSummary>> {
    let summaries = update_repo_index(root, flavors, version, &PackagesIndexWriter::new())
        .with_context(|| format!("indexing {}", root.display()))?;

    for (flavor, summary) in &summaries {
        println!(
            "{:<22} {} packages ({} index)",
            flavor.label(),
            summary.packages,
            summary.format
        );
        for path in &summary.skipped {
            println!("  skipped {}", path.display());
        }
    }
    Ok(summaries)
}
