//! Availability tables: which package versions upstreams offer.

use std::collections::BTreeMap;

use minirepo_index::{parse_dcf, DcfRecord, PackageVersion};
use minirepo_layout::ArtifactFlavor;
use url::Url;

use crate::error::Result;
use crate::upstream::join_file;

/// One package offered by an upstream contrib directory.
#[derive(Debug, Clone)]
pub struct AvailableRecord {
    /// Package name.
    pub package: String,
    /// Package version.
    pub version: PackageVersion,
    /// Contrib URL the package is served from.
    pub repository: Url,
    /// The full index record.
    pub fields: DcfRecord,
}

impl AvailableRecord {
    /// Build a record from one `PACKAGES` entry. Entries without a usable
    /// `Package`/`Version` pair yield `None`.
    pub fn from_dcf(fields: DcfRecord, repository: &Url) -> Option<Self> {
        let package = fields.get("Package")?.to_string();
        let version = PackageVersion::parse(fields.get("Version")?).ok()?;
        Some(AvailableRecord {
            package,
            version,
            repository: repository.clone(),
            fields,
        })
    }

    /// Artifact file name for a flavor (`<package>_<version><ext>`).
    pub fn file_name(&self, flavor: ArtifactFlavor) -> String {
        format!("{}_{}{}", self.package, self.version, flavor.extension())
    }

    /// Full URL of the artifact.
    pub fn artifact_url(&self, flavor: ArtifactFlavor) -> Result<Url> {
        join_file(&self.repository, &self.file_name(flavor))
    }
}

/// Package name → best available record, merged across upstreams.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityTable {
    records: BTreeMap<String, AvailableRecord>,
}

impl AvailabilityTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record. When the package is already present the higher
    /// version wins; on a tie the earlier record is kept.
    pub fn insert(&mut self, record: AvailableRecord) {
        match self.records.get(&record.package) {
            Some(existing) if existing.version >= record.version => {}
            _ => {
                self.records.insert(record.package.clone(), record);
            }
        }
    }

    /// Merge every entry of a `PACKAGES` document served from `repository`.
    ///
    /// Returns the number of usable entries read.
    pub fn merge_index(&mut self, text: &str, repository: &Url) -> Result<usize> {
        let mut merged = 0;
        for fields in parse_dcf(text)? {
            match AvailableRecord::from_dcf(fields, repository) {
                Some(record) => {
                    self.insert(record);
                    merged += 1;
                }
                None => {
                    tracing::debug!(repository = %repository, "ignoring index entry without Package/Version");
                }
            }
        }
        Ok(merged)
    }

    /// Look up a package.
    pub fn get(&self, package: &str) -> Option<&AvailableRecord> {
        self.records.get(package)
    }

    /// Whether a package is available.
    pub fn contains(&self, package: &str) -> bool {
        self.records.contains_key(package)
    }

    /// Number of distinct packages.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in package-name order.
    pub fn iter(&self) -> impl Iterator<Item = &AvailableRecord> {
        self.records.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn merge_single_index() {
        let mut table = AvailabilityTable::new();
        let n = table
            .merge_index(
                "Package: a\nVersion: 1.0\n\nPackage: b\nVersion: 0.1-2\nDepends: a\n",
                &url("https://one.test/src/contrib"),
            )
            .unwrap();
        assert_eq!(n, 2);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("b").unwrap().fields.get("Depends"), Some("a"));
    }

    #[test]
    fn highest_version_wins_across_upstreams() {
        let mut table = AvailabilityTable::new();
        table
            .merge_index("Package: a\nVersion: 1.0\n", &url("https://one.test/src/contrib"))
            .unwrap();
        table
            .merge_index("Package: a\nVersion: 1.2\n", &url("https://two.test/src/contrib"))
            .unwrap();
        table
            .merge_index("Package: a\nVersion: 1.1\n", &url("https://three.test/src/contrib"))
            .unwrap();

        let rec = table.get("a").unwrap();
        assert_eq!(rec.version.as_str(), "1.2");
        assert_eq!(rec.repository.host_str(), Some("two.test"));
    }

    #[test]
    fn tie_keeps_first_upstream() {
        let mut table = AvailabilityTable::new();
        table
            .merge_index("Package: a\nVersion: 1.0\n", &url("https://first.test/src/contrib"))
            .unwrap();
        table
            .merge_index("Package: a\nVersion: 1.0\n", &url("https://second.test/src/contrib"))
            .unwrap();
        assert_eq!(table.get("a").unwrap().repository.host_str(), Some("first.test"));
    }

    #[test]
    fn entries_without_version_are_ignored() {
        let mut table = AvailabilityTable::new();
        let n = table
            .merge_index(
                "Package: a\n\nPackage: b\nVersion: banana\n\nPackage: c\nVersion: 2\n",
                &url("https://one.test/src/contrib"),
            )
            .unwrap();
        assert_eq!(n, 1);
        assert!(table.contains("c"));
        assert!(!table.contains("a"));
    }

    #[test]
    fn artifact_url_per_flavor() {
        let mut table = AvailabilityTable::new();
        table
            .merge_index(
                "Package: pkgA\nVersion: 1.0-1\n",
                &url("https://one.test/bin/windows/contrib/4.2"),
            )
            .unwrap();
        let rec = table.get("pkgA").unwrap();
        assert_eq!(rec.file_name(ArtifactFlavor::WinBinary), "pkgA_1.0-1.zip");
        assert_eq!(
            rec.artifact_url(ArtifactFlavor::WinBinary).unwrap().as_str(),
            "https://one.test/bin/windows/contrib/4.2/pkgA_1.0-1.zip"
        );
    }
}
