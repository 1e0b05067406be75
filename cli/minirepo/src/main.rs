//! minirepo CLI: build and index local CRAN-style package repositories.

mod commands;
mod config;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use minirepo_layout::{ArtifactFlavor, RuntimeVersion};
use tracing_subscriber::EnvFilter;

use commands::make::MakeArgs;
use config::RepoConfig;

#[derive(Parser)]
#[command(name = "minirepo", version, about = "Local CRAN-style package repositories")]
struct Cli {
    /// Configuration file (default: ./minirepo.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download packages into a repository and index it
    Make {
        /// Package names
        packages: Vec<String>,
        /// Repository root (must exist)
        #[arg(long)]
        root: Option<PathBuf>,
        /// Upstream repository URL (http, https or file); repeatable
        #[arg(long = "repo")]
        repos: Vec<String>,
        /// Artifact flavor (source, win.binary, mac.binary, mac.binary.mavericks, mac.binary.leopard); repeatable
        #[arg(long = "flavor")]
        flavors: Vec<ArtifactFlavor>,
        /// Runtime version binaries are built for, e.g. 4.3
        #[arg(long)]
        runtime_version: Option<RuntimeVersion>,
        /// Only create directories and indexes
        #[arg(long)]
        no_download: bool,
        /// Skip writing PACKAGES
        #[arg(long)]
        no_index: bool,
        /// Only log warnings and errors
        #[arg(long)]
        quiet: bool,
    },
    /// Rewrite PACKAGES for existing flavor directories
    Index {
        /// Repository root
        #[arg(long)]
        root: Option<PathBuf>,
        /// Artifact flavor; repeatable
        #[arg(long = "flavor")]
        flavors: Vec<ArtifactFlavor>,
        /// Runtime version, e.g. 4.3
        #[arg(long)]
        runtime_version: Option<RuntimeVersion>,
    },
    /// Print the directory layout for every flavor
    Layout {
        /// Runtime version, e.g. 4.3
        #[arg(long)]
        runtime_version: Option<RuntimeVersion>,
    },
}

fn main() {
    let cli = Cli::parse();

    let quiet = matches!(cli.command, Commands::Make { quiet: true, .. });
    init_tracing(quiet);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

/// `RUST_LOG` wins; otherwise `info`, or `warn` when quiet.
fn init_tracing(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let config = RepoConfig::load(cli.config.as_deref(), &cwd)?;

    match cli.command {
        Commands::Make {
            packages,
            root,
            repos,
            flavors,
            runtime_version,
            no_download,
            no_index,
            quiet,
        } => {
            let args = MakeArgs {
                packages,
                root,
                repos,
                flavors,
                runtime_version,
                no_download,
                no_index,
                quiet,
            };
            for path in commands::make::run(args, &config)? {
                println!("{}", path.display());
            }
            Ok(())
        }

        Commands::Index {
            root,
            flavors,
            runtime_version,
        } => {
            let Some(root) = root.or_else(|| config.repository.root.clone()) else {
                anyhow::bail!("no repository root; pass --root or set repository.root");
            };
            let flavors = commands::pick_flavors(flavors, &config.repository.flavors);
            let version = commands::runtime_version(
                runtime_version,
                config.repository.runtime_version,
                &flavors,
            )?;
            commands::index::run(&root, &flavors, version)?;
            Ok(())
        }

        Commands::Layout { runtime_version } => {
            let version = commands::runtime_version(
                runtime_version,
                config.repository.runtime_version,
                &ArtifactFlavor::ALL,
            )?;
            commands::layout::run(version)
        }
    }
}
