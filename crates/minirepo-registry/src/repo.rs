//! Repository assembly: resolve → provision → query → fetch → relocate → index.
//!
//! Flavors are processed one after another in the order given. A flavor
//! whose directory cannot be created is recorded as failed and skipped;
//! the remaining flavors still run. Query, fetch and index failures abort
//! the whole call.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use minirepo_index::{IndexSummary, IndexWriter};
use minirepo_layout::{ensure, resolve, ArtifactFlavor, Provisioned, RuntimeVersion};

use crate::client::{AvailabilityQuery, DownloadedArtifact, Fetcher};
use crate::error::{RepoError, Result};
use crate::relocate::{local_source, relocate_from};
use crate::upstream::UpstreamRepository;

/// Options for [`make_repo`] and [`build_repo`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MakeRepoOptions {
    /// Flavors to build, in processing order.
    pub flavors: Vec<ArtifactFlavor>,
    /// Runtime version binary flavors are built for.
    pub runtime_version: RuntimeVersion,
    /// Query upstreams and fetch artifacts.
    pub download: bool,
    /// Rewrite each flavor's index afterwards.
    pub write_index: bool,
    /// Silence progress logging.
    pub quiet: bool,
}

impl MakeRepoOptions {
    /// Source-only, download and index, for the given runtime version.
    pub fn new(runtime_version: RuntimeVersion) -> Self {
        MakeRepoOptions {
            flavors: vec![ArtifactFlavor::Source],
            runtime_version,
            download: true,
            write_index: true,
            quiet: false,
        }
    }

    /// Replace the flavor list.
    pub fn flavors(mut self, flavors: impl IntoIterator<Item = ArtifactFlavor>) -> Self {
        self.flavors = flavors.into_iter().collect();
        self
    }

    /// Enable or disable fetching.
    pub fn download(mut self, download: bool) -> Self {
        self.download = download;
        self
    }

    /// Enable or disable index rewriting.
    pub fn write_index(mut self, write_index: bool) -> Self {
        self.write_index = write_index;
        self
    }

    /// Enable or disable quiet mode.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }
}

/// What happened to one flavor.
#[derive(Debug)]
pub struct FlavorOutcome {
    /// The flavor.
    pub flavor: ArtifactFlavor,
    /// Its directory under the root.
    pub dir: PathBuf,
    /// Whether the directory already existed; `None` if provisioning failed.
    pub provisioned: Option<Provisioned>,
    /// Artifacts fetched (after relocation).
    pub downloaded: Vec<DownloadedArtifact>,
    /// Index written for this flavor, if requested.
    pub index: Option<IndexSummary>,
    /// Provisioning failure, if any.
    pub error: Option<RepoError>,
}

impl FlavorOutcome {
    fn new(flavor: ArtifactFlavor, dir: PathBuf) -> Self {
        FlavorOutcome {
            flavor,
            dir,
            provisioned: None,
            downloaded: Vec::new(),
            index: None,
            error: None,
        }
    }

    /// Whether the flavor was processed without error.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-flavor results of a repository build.
#[derive(Debug, Default)]
pub struct MakeRepoReport {
    /// One entry per requested flavor, in processing order.
    pub flavors: Vec<FlavorOutcome>,
}

impl MakeRepoReport {
    /// Paths fetched for the first requested flavor.
    pub fn primary_paths(&self) -> Vec<PathBuf> {
        self.flavors
            .first()
            .map(|o| o.downloaded.iter().map(|d| d.path.clone()).collect())
            .unwrap_or_default()
    }

    /// Flavors that failed.
    pub fn failures(&self) -> impl Iterator<Item = &FlavorOutcome> {
        self.flavors.iter().filter(|o| !o.is_ok())
    }

    /// The first flavor's paths, or the first recorded failure.
    pub fn into_result(mut self) -> Result<Vec<PathBuf>> {
        if let Some(err) = self.flavors.iter_mut().find_map(|o| o.error.take()) {
            return Err(err);
        }
        Ok(self.primary_paths())
    }
}

fn ensure_root(root: &Path) -> Result<()> {
    if root.is_dir() {
        Ok(())
    } else {
        Err(RepoError::RootMissing {
            path: root.to_path_buf(),
        })
    }
}

/// Build a repository and report per-flavor outcomes.
pub fn build_repo<C, W>(
    packages: &[String],
    root: &Path,
    repos: &[UpstreamRepository],
    options: &MakeRepoOptions,
    client: &C,
    writer: &W,
) -> Result<MakeRepoReport>
where
    C: AvailabilityQuery + Fetcher,
    W: IndexWriter,
{
    ensure_root(root)?;
    let version = options.runtime_version;

    let mut flavors: Vec<ArtifactFlavor> = Vec::with_capacity(options.flavors.len());
    for flavor in &options.flavors {
        if !flavors.contains(flavor) {
            flavors.push(*flavor);
        }
    }

    if !options.quiet {
        tracing::info!(
            root = %root.display(),
            packages = packages.len(),
            flavors = ?flavors.iter().map(|f| f.label()).collect::<Vec<_>>(),
            "building repository"
        );
    }

    let mut report = MakeRepoReport::default();
    for flavor in flavors {
        let dir = resolve(root, flavor, version);
        let mut outcome = FlavorOutcome::new(flavor, dir);

        match ensure(&outcome.dir, options.quiet) {
            Ok(state) => outcome.provisioned = Some(state),
            Err(source) => {
                tracing::error!(flavor = %flavor, error = %source, "skipping flavor");
                outcome.error = Some(RepoError::Provisioning { flavor, source });
                report.flavors.push(outcome);
                continue;
            }
        }

        if options.download {
            let available = client.query(repos, flavor, version)?;
            outcome.downloaded =
                client.fetch(packages, &outcome.dir, &available, flavor, options.quiet)?;
        }
        report.flavors.push(outcome);
    }

    if options.download {
        let source = local_source(repos);
        for outcome in report.flavors.iter_mut().filter(|o| o.is_ok()) {
            let fetched = std::mem::take(&mut outcome.downloaded);
            outcome.downloaded = relocate_from(fetched, source, root, options.quiet)?;
        }
    }

    if options.write_index {
        let indexable: Vec<ArtifactFlavor> = report
            .flavors
            .iter()
            .filter(|o| o.is_ok())
            .map(|o| o.flavor)
            .collect();
        let mut summaries = update_repo_index(root, &indexable, version, writer)?;
        for outcome in &mut report.flavors {
            outcome.index = summaries.remove(&outcome.flavor);
        }
    }

    Ok(report)
}

/// Build a repository from upstreams.
///
/// Returns the artifact paths of the first requested flavor (empty when
/// `download` is off). If any flavor's directory could not be created the
/// other flavors are still processed and the first such failure is returned.
pub fn make_repo<C, W>(
    packages: &[String],
    root: &Path,
    repos: &[UpstreamRepository],
    options: &MakeRepoOptions,
    client: &C,
    writer: &W,
) -> Result<Vec<PathBuf>>
where
    C: AvailabilityQuery + Fetcher,
    W: IndexWriter,
{
    build_repo(packages, root, repos, options, client, writer)?.into_result()
}

/// Rewrite the index of each flavor's directory under `root`.
///
/// The three macOS flavors are all indexed with the `mac.binary` format.
pub fn update_repo_index<W: IndexWriter>(
    root: &Path,
    flavors: &[ArtifactFlavor],
    version: RuntimeVersion,
    writer: &W,
) -> Result<BTreeMap<ArtifactFlavor, IndexSummary>> {
    ensure_root(root)?;
    let mut summaries = BTreeMap::new();
    for &flavor in flavors {
        let dir = resolve(root, flavor, version);
        let summary = writer.write_index(&dir, flavor.index_format())?;
        summaries.insert(flavor, summary);
    }
    Ok(summaries)
}
