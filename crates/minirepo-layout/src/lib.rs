//! Repository layout for CRAN-style package repositories.
//!
//! A repository root holds one directory per artifact flavor:
//!
//! ```text
//! <root>/
//!   src/contrib/                              # source tarballs (.tar.gz)
//!   bin/windows/contrib/<major>.<minor>/      # Windows binaries (.zip)
//!   bin/macosx/contrib/<major>.<minor>/       # macOS binaries (.tgz)
//!   bin/macosx/mavericks/contrib/<x.y>/
//!   bin/macosx/leopard/contrib/<x.y>/
//! ```
//!
//! Path resolution is pure. Directory creation lives in [`provision`].

pub mod error;
pub mod flavor;
pub mod path;
pub mod provision;
pub mod runtime;

pub use error::{LayoutError, Result};
pub use flavor::{ArtifactFlavor, IndexFormat};
pub use path::{contrib_path, contrib_segments, resolve};
pub use provision::{ensure, Provisioned};
pub use runtime::RuntimeVersion;
