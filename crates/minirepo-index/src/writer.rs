//! Index writer trait and the `PACKAGES` implementation.

use std::cmp::Ordering;
use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use minirepo_layout::IndexFormat;

use crate::dcf::{write_dcf, DcfRecord};
use crate::description::{package_name_from_file, read_description};
use crate::error::{IndexError, Result};
use crate::version::PackageVersion;

/// Fields copied from `DESCRIPTION` into every index record.
pub const INDEX_FIELDS: &[&str] = &[
    "Package",
    "Version",
    "Priority",
    "Depends",
    "Suggests",
    "Imports",
    "LinkingTo",
    "Enhances",
    "License",
    "License_is_FOSS",
    "License_restricts_use",
    "OS_type",
    "Archs",
    "NeedsCompilation",
];

/// Extra field carried by binary indexes.
pub const BINARY_FIELDS: &[&str] = &["Built"];

/// Result of rewriting one directory's index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSummary {
    /// Format the directory was indexed as.
    pub format: IndexFormat,
    /// Number of packages written to the index.
    pub packages: usize,
    /// Artifacts that matched the format but could not be read.
    pub skipped: Vec<PathBuf>,
}

/// Something that (re)writes the index of a directory of artifacts.
pub trait IndexWriter {
    /// Scan `dir` for artifacts of `format` and fully rewrite its index.
    fn write_index(&self, dir: &Path, format: IndexFormat) -> Result<IndexSummary>;
}

/// Writes `PACKAGES` and `PACKAGES.gz`.
#[derive(Debug, Clone, Default)]
pub struct PackagesIndexWriter;

impl PackagesIndexWriter {
    /// Create a writer.
    pub fn new() -> Self {
        PackagesIndexWriter
    }

    /// Artifacts in `dir` whose names end in the format's extension, sorted by file name.
    pub fn artifacts(dir: &Path, format: IndexFormat) -> Result<Vec<PathBuf>> {
        let mut found = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name.ends_with(format.extension()) && package_name_from_file(&path).is_some() {
                found.push(path);
            }
        }
        found.sort();
        Ok(found)
    }

    fn fields_for(format: IndexFormat) -> Vec<&'static str> {
        let mut fields = INDEX_FIELDS.to_vec();
        if format.is_binary() {
            fields.extend_from_slice(BINARY_FIELDS);
        }
        fields
    }
}

impl IndexWriter for PackagesIndexWriter {
    fn write_index(&self, dir: &Path, format: IndexFormat) -> Result<IndexSummary> {
        let fields = Self::fields_for(format);
        let mut records: Vec<DcfRecord> = Vec::new();
        let mut skipped = Vec::new();

        for artifact in Self::artifacts(dir, format)? {
            match read_description(&artifact, format) {
                Ok(description) => records.push(description.project(&fields)),
                Err(e) => {
                    tracing::warn!(path = %artifact.display(), error = %e, "skipping unreadable artifact");
                    skipped.push(artifact);
                }
            }
        }

        // Versions that do not parse keep their file-name order.
        records.sort_by(|a, b| {
            a.get("Package")
                .cmp(&b.get("Package"))
                .then_with(|| match (record_version(a), record_version(b)) {
                    (Some(x), Some(y)) => x.cmp(&y),
                    _ => Ordering::Equal,
                })
        });

        let text = write_dcf(&records);
        write_atomic(&dir.join("PACKAGES"), text.as_bytes())?;

        let mut gz = GzEncoder::new(Vec::new(), Compression::default());
        gz.write_all(text.as_bytes())?;
        write_atomic(&dir.join("PACKAGES.gz"), &gz.finish()?)?;

        tracing::info!(
            dir = %dir.display(),
            format = %format,
            packages = records.len(),
            "wrote PACKAGES index"
        );

        Ok(IndexSummary {
            format,
            packages: records.len(),
            skipped,
        })
    }
}

fn record_version(record: &DcfRecord) -> Option<PackageVersion> {
    PackageVersion::parse(record.get("Version")?).ok()
}

/// Replace `target` with `data` via a temp file in the same directory.
///
/// The result is world-readable like the artifacts beside it.
fn write_atomic(target: &Path, data: &[u8]) -> Result<()> {
    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    let write_err = |source| IndexError::Write {
        path: target.to_path_buf(),
        source,
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(data).map_err(write_err)?;
    publish_mode(tmp.as_file()).map_err(write_err)?;
    tmp.persist(target).map_err(|e| write_err(e.error))?;
    Ok(())
}

/// Give a temp file the `0644` mode of a regular published file.
#[cfg(unix)]
pub fn publish_mode(file: &std::fs::File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(0o644))
}

/// Give a temp file the `0644` mode of a regular published file.
#[cfg(not(unix))]
pub fn publish_mode(_file: &std::fs::File) -> std::io::Result<()> {
    Ok(())
}
