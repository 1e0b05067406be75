//! Target runtime version.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

/// The `(major, minor)` release of the runtime that binaries are built for.
///
/// Only binary flavors consult it. Callers resolve the effective version
/// themselves; nothing in this crate reads ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RuntimeVersion {
    /// Major release number.
    pub major: u32,
    /// Minor release number.
    pub minor: u32,
}

impl RuntimeVersion {
    /// Construct a version from its components.
    pub const fn new(major: u32, minor: u32) -> Self {
        RuntimeVersion { major, minor }
    }

    /// Parse `"4.2"` or `"4.2.1"`; the patch component is ignored.
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.trim().split('.');
        let major = parts.next()?.parse().ok()?;
        let minor = parts.next()?.parse().ok()?;
        match parts.next() {
            Some(patch) if patch.parse::<u32>().is_err() => return None,
            _ => {}
        }
        if parts.next().is_some() {
            return None;
        }
        Some(RuntimeVersion { major, minor })
    }

    /// Extract the version from `R --version` style output
    /// (`"R version 4.3.1 (2023-06-16) -- ..."`).
    pub fn from_banner(banner: &str) -> Option<Self> {
        let line = banner.lines().find(|l| l.trim_start().starts_with("R version"))?;
        let version = line.trim_start().strip_prefix("R version")?.split_whitespace().next()?;
        Self::parse(version)
    }
}

impl fmt::Display for RuntimeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for RuntimeVersion {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| LayoutError::InvalidRuntimeVersion {
            value: s.to_string(),
        })
    }
}

impl TryFrom<String> for RuntimeVersion {
    type Error = LayoutError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RuntimeVersion> for String {
    fn from(v: RuntimeVersion) -> String {
        v.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_major_minor() {
        assert_eq!(RuntimeVersion::parse("4.2"), Some(RuntimeVersion::new(4, 2)));
        assert_eq!(RuntimeVersion::parse("3.6.3"), Some(RuntimeVersion::new(3, 6)));
        assert_eq!(RuntimeVersion::parse(" 4.10 "), Some(RuntimeVersion::new(4, 10)));
    }

    #[test]
    fn reject_malformed() {
        assert_eq!(RuntimeVersion::parse("4"), None);
        assert_eq!(RuntimeVersion::parse("x.y"), None);
        assert_eq!(RuntimeVersion::parse("4.2.x"), None);
        assert_eq!(RuntimeVersion::parse("4.2.1.0"), None);
        assert!("four".parse::<RuntimeVersion>().is_err());
    }

    #[test]
    fn display_is_major_dot_minor() {
        assert_eq!(RuntimeVersion::new(4, 2).to_string(), "4.2");
    }

    #[test]
    fn version_from_banner() {
        let banner = "R version 4.3.1 (2023-06-16) -- \"Beagle Scouts\"\nCopyright (C) 2023\n";
        assert_eq!(RuntimeVersion::from_banner(banner), Some(RuntimeVersion::new(4, 3)));
        assert_eq!(RuntimeVersion::from_banner("command not found"), None);
    }

    #[test]
    fn ordering() {
        assert!(RuntimeVersion::new(3, 6) < RuntimeVersion::new(4, 0));
        assert!(RuntimeVersion::new(4, 2) < RuntimeVersion::new(4, 10));
    }
}
