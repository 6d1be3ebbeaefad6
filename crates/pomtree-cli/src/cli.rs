//! CLI argument definitions for pomtree.
//!
//! Uses `clap` derive macros to define the command surface. Each command
//! corresponds to a handler in the [`super::commands`] module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "pomtree",
    version,
    about = "Print the transitive runtime dependency tree of Maven coordinates",
    long_about = "pomtree fetches POM manifests from a local cache and remote Maven \
                  repositories, resolves runtime dependencies transitively, and prints \
                  the tree pruned so each artifact appears once."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to ~/.pomtree/config.toml)
    #[arg(long, global = true, env = "POMTREE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Local manifest cache directory
    #[arg(long, global = true)]
    pub cache_dir: Option<String>,

    /// Remote repository as HOST/PATH; repeatable, replaces the configured list
    #[arg(long = "repo", global = true, value_name = "HOST/PATH")]
    pub repos: Vec<String>,

    /// Use only the local cache
    #[arg(long, global = true)]
    pub offline: bool,

    /// Fail on missing manifests and dependency cycles
    #[arg(long, global = true)]
    pub strict: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Display the pruned dependency tree
    Tree {
        /// Coordinates as group:artifact:version (defaults to configured roots)
        coordinates: Vec<String>,
        /// Maximum depth
        #[arg(long)]
        depth: Option<u32>,
        /// Show the tree before pruning
        #[arg(long)]
        raw: bool,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
        /// Explain why a dependency is included
        #[arg(long)]
        why: Option<String>,
        /// With --why, show dependents instead of a single path
        #[arg(long, requires = "why")]
        inverted: bool,
        /// Show version conflicts and exclusions
        #[arg(long)]
        conflicts: bool,
    },

    /// Print the effective properties of a coordinate's manifest
    Properties {
        /// Coordinate as group:artifact:version
        coordinate: String,
    },

    /// Show the cache location and repository URLs of a coordinate's manifest
    Path {
        /// Coordinate as group:artifact:version
        coordinate: String,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}
