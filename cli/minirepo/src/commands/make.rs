//! `minirepo make`: populate a repository from upstreams.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use minirepo_layout::{ArtifactFlavor, RuntimeVersion};
use minirepo_registry::{
    build_repo, MakeRepoOptions, PackagesIndexWriter, RepositoryClient, UpstreamRepository,
};

use crate::config::RepoConfig;

/// Command-line inputs for `make`; unset values fall back to the config file.
#[derive(Debug, Default)]
pub struct MakeArgs {
    pub packages: Vec<String>,
    pub root: Option<PathBuf>,
    pub repos: Vec<String>,
    pub flavors: Vec<ArtifactFlavor>,
    pub runtime_version: Option<RuntimeVersion>,
    pub no_download: bool,
    pub no_index: bool,
    pub quiet: bool,
}

/// Build the repository and print what was fetched.
///
/// Returns the artifact paths of the first flavor.
pub fn run(args: MakeArgs, config: &RepoConfig) -> Result<Vec<PathBuf>> {
    let repo_config = &config.repository;
    let download = !args.no_download;

    let packages = if args.packages.is_empty() {
        repo_config.packages.clone()
    } else {
        args.packages
    };
    let Some(root) = args.root.or_else(|| repo_config.root.clone()) else {
        bail!("no repository root; pass --root or set repository.root");
    };
    let urls = if args.repos.is_empty() {
        repo_config.upstreams.clone()
    } else {
        args.repos
    };
    if download && urls.is_empty() {
        bail!("no upstream repositories; pass --repo or set repository.upstreams");
    }
    if download && packages.is_empty() {
        tracing::warn!("no packages requested; only directories and indexes will be written");
    }
    let repos = UpstreamRepository::parse_all(&urls)?;

    let flavors = super::pick_flavors(args.flavors, &repo_config.flavors);
    let version = super::runtime_version(args.runtime_version, repo_config.runtime_version, &flavors)?;

    let options = MakeRepoOptions::new(version)
        .flavors(flavors)
        .download(download)
        .write_index(!args.no_index)
        .quiet(args.quiet);
    let client = RepositoryClient::with_options(&config.http.client_options())
        .context("creating HTTP client")?;

    let report = build_repo(&packages, &root, &repos, &options, &client, &PackagesIndexWriter::new())
        .with_context(|| format!("building repository at {}", root.display()))?;

    if !args.quiet {
        for outcome in &report.flavors {
            match (&outcome.error, &outcome.index) {
                (Some(err), _) => println!("{:<22} failed: {err}", outcome.flavor.label()),
                (None, Some(index)) => println!(
                    "{:<22} {} fetched, {} indexed  {}",
                    outcome.flavor.label(),
                    outcome.downloaded.len(),
                    index.packages,
                    outcome.dir.display()
                ),
                (None, None) => println!(
                    "{:<22} {} fetched  {}",
                    outcome.flavor.label(),
                    outcome.downloaded.len(),
                    outcome.dir.display()
                ),
            }
        }
    }

    let paths = report.into_result()?;
    Ok(paths)
}
