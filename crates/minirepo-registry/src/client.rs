//! Availability and fetch traits, and the default upstream client.
//!
//! `AvailabilityQuery` and `Fetcher` are the seams the orchestrator talks
//! to. `RepositoryClient` implements both against real upstreams: HTTP(S)
//! mirrors through a blocking `reqwest` client and `file://` mirrors through
//! the local filesystem.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use flate2::read::GzDecoder;
use minirepo_index::publish_mode;
use minirepo_layout::{ArtifactFlavor, RuntimeVersion};
use url::Url;

use crate::availability::AvailabilityTable;
use crate::error::{RepoError, Result};
use crate::upstream::{join_file, UpstreamRepository};

/// A package artifact produced by a fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedArtifact {
    /// Package name.
    pub package: String,
    /// Where the artifact now lives.
    pub path: PathBuf,
}

/// Asks upstreams which packages they offer.
pub trait AvailabilityQuery {
    /// Query every upstream for `flavor` and merge the results.
    fn query(
        &self,
        repos: &[UpstreamRepository],
        flavor: ArtifactFlavor,
        version: RuntimeVersion,
    ) -> Result<AvailabilityTable>;
}

/// Downloads package artifacts.
pub trait Fetcher {
    /// Fetch each named package (as resolved by `available`) into `dest_dir`.
    ///
    /// Results follow the order of `packages`. Names missing from `available`
    /// are skipped.
    fn fetch(
        &self,
        packages: &[String],
        dest_dir: &Path,
        available: &AvailabilityTable,
        flavor: ArtifactFlavor,
        quiet: bool,
    ) -> Result<Vec<DownloadedArtifact>>;
}

/// HTTP client settings.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// `User-Agent` header value.
    pub user_agent: String,
    /// TCP connect timeout.
    pub connect_timeout: Option<Duration>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        ClientOptions {
            user_agent: format!("minirepo/{}", env!("CARGO_PKG_VERSION")),
            connect_timeout: Some(Duration::from_secs(30)),
        }
    }
}

/// Talks to HTTP(S) and `file://` upstreams.
pub struct RepositoryClient {
    http: reqwest::blocking::Client,
}

impl RepositoryClient {
    /// Create a client with default options.
    pub fn new() -> Result<Self> {
        Self::with_options(&ClientOptions::default())
    }

    /// Create a client with explicit options.
    pub fn with_options(options: &ClientOptions) -> Result<Self> {
        let mut builder = reqwest::blocking::Client::builder().user_agent(options.user_agent.clone());
        if let Some(timeout) = options.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        let http = builder.build().map_err(RepoError::HttpClient)?;
        Ok(RepositoryClient { http })
    }

    /// Read a contrib directory's index, preferring `PACKAGES.gz`.
    ///
    /// Returns `None` when the upstream has no index for this directory.
    pub fn read_index(&self, contrib: &Url) -> Result<Option<String>> {
        let gz_url = join_file(contrib, "PACKAGES.gz")?;
        tracing::debug!(url = %gz_url, "probing index");
        if let Some(bytes) = self.get(&gz_url)? {
            let mut text = String::new();
            GzDecoder::new(bytes.as_slice()).read_to_string(&mut text)?;
            return Ok(Some(text));
        }

        let plain_url = join_file(contrib, "PACKAGES")?;
        tracing::debug!(url = %plain_url, "probing index");
        match self.get(&plain_url)? {
            Some(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
            None => Ok(None),
        }
    }

    /// Fetch a URL's body; `None` if it does not exist.
    fn get(&self, url: &Url) -> Result<Option<Vec<u8>>> {
        if url.scheme() == "file" {
            let path = file_url_path(url)?;
            return match std::fs::read(&path) {
                Ok(bytes) => Ok(Some(bytes)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            };
        }

        let response = self.send(url)?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check_status(url, response)?;
        let bytes = response.bytes().map_err(|source| RepoError::Http {
            url: url.to_string(),
            source,
        })?;
        Ok(Some(bytes.to_vec()))
    }

    fn send(&self, url: &Url) -> Result<reqwest::blocking::Response> {
        self.http
            .get(url.as_str())
            .send()
            .map_err(|source| RepoError::Http {
                url: url.to_string(),
                source,
            })
    }

    /// Stream `url` into `dest`.
    ///
    /// The body lands in a temp file beside `dest`, renamed only once complete.
    fn download(&self, url: &Url, dest: &Path) -> Result<()> {
        let mut response = check_status(url, self.send(url)?)?;
        let dir = dest.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        response.copy_to(&mut tmp).map_err(|source| RepoError::Http {
            url: url.to_string(),
            source,
        })?;
        publish_mode(tmp.as_file())?;
        tmp.persist(dest).map_err(|e| RepoError::Io(e.error))?;
        Ok(())
    }
}

impl AvailabilityQuery for RepositoryClient {
    fn query(
        &self,
        repos: &[UpstreamRepository],
        flavor: ArtifactFlavor,
        version: RuntimeVersion,
    ) -> Result<AvailabilityTable> {
        let mut table = AvailabilityTable::new();
        for repo in repos {
            let contrib = repo.contrib_url(flavor, version)?;
            match self.read_index(&contrib)? {
                Some(text) => {
                    let n = table.merge_index(&text, &contrib)?;
                    tracing::debug!(repository = %contrib, packages = n, "read upstream index");
                }
                None => {
                    tracing::warn!(repository = %contrib, flavor = %flavor, "upstream has no index");
                }
            }
        }
        Ok(table)
    }
}

impl Fetcher for RepositoryClient {
    fn fetch(
        &self,
        packages: &[String],
        dest_dir: &Path,
        available: &AvailabilityTable,
        flavor: ArtifactFlavor,
        quiet: bool,
    ) -> Result<Vec<DownloadedArtifact>> {
        let mut downloaded = Vec::new();
        for package in packages {
            let Some(record) = available.get(package) else {
                tracing::warn!(package = %package, flavor = %flavor, "no package at the repositories");
                continue;
            };
            let url = record.artifact_url(flavor)?;

            // Local mirrors are reported in place; the relocator copies them.
            let path = if url.scheme() == "file" {
                let path = file_url_path(&url)?;
                if !path.is_file() {
                    return Err(RepoError::Io(std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        format!("{} listed in index but missing", path.display()),
                    )));
                }
                path
            } else {
                let dest = dest_dir.join(record.file_name(flavor));
                self.download(&url, &dest)?;
                dest
            };

            if quiet {
                tracing::debug!(package = %package, version = %record.version, path = %path.display(), "fetched");
            } else {
                tracing::info!(package = %package, version = %record.version, path = %path.display(), "fetched");
            }
            downloaded.push(DownloadedArtifact {
                package: package.clone(),
                path,
            });
        }
        Ok(downloaded)
    }
}

fn file_url_path(url: &Url) -> Result<PathBuf> {
    url.to_file_path().map_err(|()| RepoError::NotLocal {
        url: url.to_string(),
    })
}

fn check_status(
    url: &Url,
    response: reqwest::blocking::Response,
) -> Result<reqwest::blocking::Response> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(RepoError::HttpStatus {
            url: url.to_string(),
            status: response.status().as_u16(),
        })
    }
}
