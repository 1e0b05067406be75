//! `minirepo.toml` parsing.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use minirepo_layout::{ArtifactFlavor, RuntimeVersion};
use minirepo_registry::ClientOptions;
use serde::{Deserialize, Serialize};

/// File name looked up in the working directory when `--config` is absent.
pub const CONFIG_FILE: &str = "minirepo.toml";

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepoConfig {
    /// Repository defaults.
    #[serde(default)]
    pub repository: RepositoryConfig,
    /// HTTP client settings.
    #[serde(default)]
    pub http: HttpConfig,
}

/// `[repository]` section. Every key is a default that flags override.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Repository root directory.
    #[serde(default)]
    pub root: Option<PathBuf>,
    /// Upstream repository URLs.
    #[serde(default)]
    pub upstreams: Vec<String>,
    /// Flavors to build.
    #[serde(default)]
    pub flavors: Vec<ArtifactFlavor>,
    /// Target runtime version, e.g. `"4.3"`.
    #[serde(default)]
    pub runtime_version: Option<RuntimeVersion>,
    /// Packages to fetch when none are given on the command line.
    #[serde(default)]
    pub packages: Vec<String>,
}

/// `[http]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
}

impl HttpConfig {
    /// Client options with unset keys left at their defaults.
    pub fn client_options(&self) -> ClientOptions {
        let mut options = ClientOptions::default();
        if let Some(agent) = &self.user_agent {
            options.user_agent = agent.clone();
        }
        if let Some(secs) = self.connect_timeout_secs {
            options.connect_timeout = Some(Duration::from_secs(secs));
        }
        options
    }
}

impl RepoConfig {
    /// Load the explicit `path`, or `minirepo.toml` in `cwd` if it exists.
    ///
    /// An explicit path that cannot be read is an error; a missing default
    /// file yields an empty configuration.
    pub fn load(path: Option<&Path>, cwd: &Path) -> Result<Self> {
        match path {
            Some(path) => Self::read(path),
            None => {
                let candidate = cwd.join(CONFIG_FILE);
                if candidate.is_file() {
                    Self::read(&candidate)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: RepoConfig =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parse a configuration from a TOML string.
    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing minirepo.toml")
    }
}
