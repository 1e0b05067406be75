//! Local CRAN-style repository builder.
//!
//! Given package names and one or more upstream mirrors, downloads each
//! package's artifact into the matching contrib directory under a local root
//! and regenerates the `PACKAGES` indexes, so that the root can be used as a
//! repository (including through a `file://` URL).
//!
//! # Architecture
//!
//! - [`client`]: `AvailabilityQuery` and `Fetcher` traits, and the default
//!   `RepositoryClient` for HTTP(S) and `file://` upstreams
//! - [`relocate`]: copies artifacts reported inside a local mirror into the root
//! - [`repo`]: `make_repo` / `update_repo_index` orchestration
//!
//! Directory layout comes from `minirepo-layout`; index writing from
//! `minirepo-index`.

pub mod availability;
pub mod client;
pub mod error;
pub mod relocate;
pub mod repo;
pub mod upstream;

// Re-exports for convenience.
pub use availability::{AvailabilityTable, AvailableRecord};
pub use client::{AvailabilityQuery, ClientOptions, DownloadedArtifact, Fetcher, RepositoryClient};
pub use error::{RepoError, Result};
pub use relocate::{local_source, relocate, relocate_from};
pub use repo::{build_repo, make_repo, update_repo_index, FlavorOutcome, MakeRepoOptions, MakeRepoReport};
pub use upstream::UpstreamRepository;

pub use minirepo_index::{IndexSummary, IndexWriter, PackageVersion, PackagesIndexWriter};
pub use minirepo_layout::{ArtifactFlavor, IndexFormat, RuntimeVersion};
