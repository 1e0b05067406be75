//! Package version numbers.
//!
//! Package versions are sequences of non-negative integers separated by `.`
//! or `-` (`1.0`, `0.10-2`, `1.8.8`). They compare component-wise, with a
//! missing component ordering before any present one (`1.0 < 1.0-1`).

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A parsed package version. Keeps the original spelling for display.
#[derive(Debug, Clone)]
pub struct PackageVersion {
    components: Vec<u64>,
    raw: String,
}

/// Error returned for strings that are not package versions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid package version '{0}'")]
pub struct InvalidVersion(pub String);

impl PackageVersion {
    /// Parse a version string like `"1.2-3"`.
    pub fn parse(s: &str) -> Result<Self, InvalidVersion> {
        let raw = s.trim();
        if raw.is_empty() {
            return Err(InvalidVersion(s.to_string()));
        }
        let components = raw
            .split(['.', '-'])
            .map(|part| part.parse::<u64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| InvalidVersion(s.to_string()))?;
        Ok(PackageVersion {
            components,
            raw: raw.to_string(),
        })
    }

    /// Numeric components in order.
    pub fn components(&self) -> &[u64] {
        &self.components
    }

    /// The version as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl PartialEq for PackageVersion {
    fn eq(&self, other: &Self) -> bool {
        self.components == other.components
    }
}

impl Eq for PackageVersion {}

impl PartialOrd for PackageVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PackageVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        // Vec ordering is lexicographic with shorter prefixes first.
        self.components.cmp(&other.components)
    }
}

impl fmt::Display for PackageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for PackageVersion {
    type Err = InvalidVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
