//! Command dispatch and handler modules.

mod path;
mod properties;
mod tree;

use miette::Result;

use pomtree_core::config::{RepositoryConfig, ResolutionMode, ResolverConfig};
use pomtree_util::errors::PomtreeError;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    match cli.command {
        Command::Tree {
            coordinates,
            depth,
            raw,
            json,
            why,
            inverted,
            conflicts,
        } => tree::exec(
            &config,
            &coordinates,
            depth,
            raw,
            json,
            why,
            inverted,
            conflicts,
        ),
        Command::Properties { coordinate } => properties::exec(&config, &coordinate),
        Command::Path { coordinate } => path::exec(&config, &coordinate),
    }
}

/// Config file values with command-line overrides applied.
fn load_config(cli: &Cli) -> Result<ResolverConfig> {
    let mut config = match cli.config {
        Some(ref path) => ResolverConfig::load_from(path)?,
        None => ResolverConfig::load()?,
    };

    if let Some(ref dir) = cli.cache_dir {
        config.cache_dir = dir.clone();
    }
    if !cli.repos.is_empty() {
        config.repositories = cli
            .repos
            .iter()
            .map(|spec| {
                RepositoryConfig::parse(spec).ok_or_else(|| PomtreeError::Config {
                    message: format!("Invalid repository '{spec}': expected HOST/PATH"),
                })
            })
            .collect::<std::result::Result<_, _>>()?;
    }
    if cli.offline {
        config.repositories.clear();
    }
    if cli.strict {
        config.mode = ResolutionMode::Strict;
    }

    tracing::debug!(
        "Cache {}, {} repositories, {:?} mode",
        config.cache_root().display(),
        config.repositories.len(),
        config.mode
    );
    Ok(config)
}
