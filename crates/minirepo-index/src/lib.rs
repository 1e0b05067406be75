//! `PACKAGES` index handling for CRAN-style repositories.
//!
//! Both package metadata (`DESCRIPTION`) and repository indexes (`PACKAGES`)
//! use the Debian Control File (DCF) format:
//!
//! ```text
//! Package: jsonlite
//! Version: 1.8.8
//! Depends: methods
//! License: MIT + file LICENSE
//!
//! Package: rlang
//! Version: 1.1.3
//! ```
//!
//! [`PackagesIndexWriter`] scans a contrib directory, reads each archive's
//! `DESCRIPTION` and rewrites `PACKAGES` and `PACKAGES.gz` from scratch.

pub mod dcf;
pub mod description;
pub mod error;
pub mod version;
pub mod writer;

pub use dcf::{parse_dcf, write_dcf, DcfRecord};
pub use description::{package_name_from_file, read_description};
pub use error::{IndexError, Result};
pub use version::{InvalidVersion, PackageVersion};
pub use writer::{publish_mode, IndexSummary, IndexWriter, PackagesIndexWriter};
