//! Upstream repository locations.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use minirepo_layout::{contrib_segments, ArtifactFlavor, RuntimeVersion};
use url::Url;

use crate::error::{RepoError, Result};

/// A repository that packages are queried and fetched from.
///
/// Either a network mirror (`http`/`https`) or a local mirror (`file`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRepository {
    url: Url,
}

impl UpstreamRepository {
    /// Parse and validate an upstream URL.
    pub fn parse(s: &str) -> Result<Self> {
        let url = Url::parse(s.trim()).map_err(|e| RepoError::InvalidUrl {
            url: s.to_string(),
            detail: e.to_string(),
        })?;
        match url.scheme() {
            "http" | "https" | "file" => Ok(UpstreamRepository { url }),
            other => Err(RepoError::InvalidUrl {
                url: s.to_string(),
                detail: format!("unsupported scheme '{other}'"),
            }),
        }
    }

    /// Parse every entry, failing on the first invalid one.
    pub fn parse_all<S: AsRef<str>>(urls: &[S]) -> Result<Vec<Self>> {
        urls.iter().map(|u| Self::parse(u.as_ref())).collect()
    }

    /// The underlying URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Whether this upstream is addressed with the `file` scheme.
    pub fn is_local(&self) -> bool {
        self.url.scheme() == "file"
    }

    /// Native path of a `file://` upstream.
    pub fn local_path(&self) -> Result<PathBuf> {
        if !self.is_local() {
            return Err(RepoError::NotLocal {
                url: self.url.to_string(),
            });
        }
        self.url.to_file_path().map_err(|()| RepoError::NotLocal {
            url: self.url.to_string(),
        })
    }

    /// URL of this upstream's contrib directory for a flavor.
    pub fn contrib_url(&self, flavor: ArtifactFlavor, version: RuntimeVersion) -> Result<Url> {
        let mut url = self.url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| RepoError::InvalidUrl {
                url: self.url.to_string(),
                detail: "URL cannot be a base".to_string(),
            })?;
            segments.pop_if_empty();
            for segment in contrib_segments(flavor, version) {
                segments.push(&segment);
            }
        }
        Ok(url)
    }
}

impl FromStr for UpstreamRepository {
    type Err = RepoError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for UpstreamRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

/// Append a file name to a directory URL.
pub(crate) fn join_file(base: &Url, file_name: &str) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| RepoError::InvalidUrl {
            url: base.to_string(),
            detail: "URL cannot be a base".to_string(),
        })?
        .pop_if_empty()
        .push(file_name);
    Ok(url)
}
