//! Artifact flavors and the index format family each one writes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

/// A source-vs-binary variant of a package distribution.
///
/// Canonical labels follow the package manager's own type names
/// (`source`, `win.binary`, ...). Short aliases are accepted when parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ArtifactFlavor {
    /// Source tarballs.
    #[serde(rename = "source")]
    Source,
    /// Windows binary zips.
    #[serde(rename = "win.binary", alias = "windows")]
    WinBinary,
    /// Generic macOS binary tarballs.
    #[serde(rename = "mac.binary", alias = "mac")]
    MacBinary,
    /// macOS binaries built for Mavericks and later.
    #[serde(rename = "mac.binary.mavericks", alias = "mac-mavericks")]
    MacBinaryMavericks,
    /// macOS binaries built for Leopard.
    #[serde(rename = "mac.binary.leopard", alias = "mac-leopard")]
    MacBinaryLeopard,
}

impl ArtifactFlavor {
    /// Every supported flavor, in layout order.
    pub const ALL: [ArtifactFlavor; 5] = [
        ArtifactFlavor::Source,
        ArtifactFlavor::WinBinary,
        ArtifactFlavor::MacBinary,
        ArtifactFlavor::MacBinaryMavericks,
        ArtifactFlavor::MacBinaryLeopard,
    ];

    /// Canonical label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::WinBinary => "win.binary",
            Self::MacBinary => "mac.binary",
            Self::MacBinaryMavericks => "mac.binary.mavericks",
            Self::MacBinaryLeopard => "mac.binary.leopard",
        }
    }

    /// Parse a flavor label, accepting canonical names and short aliases.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "source" => Some(Self::Source),
            "win.binary" | "windows" => Some(Self::WinBinary),
            "mac.binary" | "mac" => Some(Self::MacBinary),
            "mac.binary.mavericks" | "mac-mavericks" => Some(Self::MacBinaryMavericks),
            "mac.binary.leopard" | "mac-leopard" => Some(Self::MacBinaryLeopard),
            _ => None,
        }
    }

    /// Path segment under `bin/` for binary flavors; `None` for source.
    pub fn platform_segment(&self) -> Option<&'static str> {
        match self {
            Self::Source => None,
            Self::WinBinary => Some("windows"),
            Self::MacBinary => Some("macosx"),
            Self::MacBinaryMavericks => Some("macosx/mavericks"),
            Self::MacBinaryLeopard => Some("macosx/leopard"),
        }
    }

    /// Whether this flavor is a platform binary (and thus runtime-version qualified).
    pub fn is_binary(&self) -> bool {
        !matches!(self, Self::Source)
    }

    /// The index format family this flavor's directory is indexed with.
    pub fn index_format(&self) -> IndexFormat {
        match self {
            Self::Source => IndexFormat::Source,
            Self::WinBinary => IndexFormat::WinBinary,
            Self::MacBinary | Self::MacBinaryMavericks | Self::MacBinaryLeopard => {
                IndexFormat::MacBinary
            }
        }
    }

    /// File extension of this flavor's artifacts, including the leading dot.
    pub fn extension(&self) -> &'static str {
        self.index_format().extension()
    }
}

impl fmt::Display for ArtifactFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ArtifactFlavor {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| LayoutError::UnsupportedFlavor {
            name: s.to_string(),
        })
    }
}

/// The family of index an artifact directory is written with.
///
/// Several flavors can share one family: all macOS variants are indexed as
/// `mac.binary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexFormat {
    /// Source tarball index.
    #[serde(rename = "source")]
    Source,
    /// Windows binary index.
    #[serde(rename = "win.binary")]
    WinBinary,
    /// macOS binary index.
    #[serde(rename = "mac.binary")]
    MacBinary,
}

impl IndexFormat {
    /// Label passed to index writers.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::WinBinary => "win.binary",
            Self::MacBinary => "mac.binary",
        }
    }

    /// Artifact extension scanned by this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Source => ".tar.gz",
            Self::WinBinary => ".zip",
            Self::MacBinary => ".tgz",
        }
    }

    /// Whether artifacts of this format are built binaries.
    pub fn is_binary(&self) -> bool {
        !matches!(self, Self::Source)
    }
}

impl fmt::Display for IndexFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
