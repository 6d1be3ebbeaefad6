use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use pomtree_util::errors::{PomtreeError, PomtreeResult};

use crate::coordinate::Coordinate;

/// Resolver configuration loaded from `~/.pomtree/config.toml`.
///
/// Every field has a default, so an empty or missing file yields a working
/// configuration pointing at Maven Central and Clojars with the standard
/// `~/.m2/repository` cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResolverConfig {
    /// Local cache root; mirrors the remote repository layout.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,

    /// Remote repositories, consulted in order.
    #[serde(default = "default_repositories")]
    pub repositories: Vec<RepositoryConfig>,

    /// Connect timeout applied to every repository request.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default)]
    pub mode: ResolutionMode,

    /// Root coordinates used when none are given on the command line.
    #[serde(default)]
    pub roots: Vec<String>,
}

/// A remote repository addressed as `https://{host}/{path}/...`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    #[serde(default)]
    pub name: String,
    pub host: String,
    #[serde(default)]
    pub path: String,
}

/// How the graph resolver treats a manifest that cannot be obtained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionMode {
    /// Unavailable manifests become leaves; cycles are truncated.
    #[default]
    Lenient,
    /// The first lookup failure or cycle aborts resolution.
    Strict,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            repositories: default_repositories(),
            connect_timeout_secs: default_connect_timeout(),
            mode: ResolutionMode::default(),
            roots: Vec::new(),
        }
    }
}

fn default_cache_dir() -> String {
    "~/.m2/repository".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_repositories() -> Vec<RepositoryConfig> {
    vec![
        RepositoryConfig::new("central", "repo1.maven.org", "maven2"),
        RepositoryConfig::new("clojars", "clojars.org", "repo"),
    ]
}

impl RepositoryConfig {
    pub fn new(name: &str, host: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            host: host.to_string(),
            path: path.to_string(),
        }
    }

    /// Parse the command-line form `host/path` (e.g. `clojars.org/repo`).
    /// A leading `https://` is tolerated.
    pub fn parse(spec: &str) -> Option<Self> {
        let spec = spec.trim();
        let spec = spec.strip_prefix("https://").unwrap_or(spec);
        let spec = spec.trim_end_matches('/');
        let (host, path) = spec.split_once('/').unwrap_or((spec, ""));
        if host.is_empty() {
            return None;
        }
        Some(Self::new(host, host, path))
    }
}

impl ResolutionMode {
    pub fn is_strict(self) -> bool {
        self == ResolutionMode::Strict
    }
}

impl ResolverConfig {
    /// Load the configuration from `~/.pomtree/config.toml`, or return
    /// defaults if the file doesn't exist.
    pub fn load() -> PomtreeResult<Self> {
        let path = Self::default_path();
        if path.is_file() {
            tracing::debug!("Loading config from {}", path.display());
            Self::load_from(&path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load the configuration from an explicit path, which must exist.
    pub fn load_from(path: &Path) -> PomtreeResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PomtreeError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        Self::parse_toml(&content)
    }

    pub fn parse_toml(content: &str) -> PomtreeResult<Self> {
        toml::from_str(content).map_err(|e| PomtreeError::Config {
            message: format!("Failed to parse config: {e}"),
        })
    }

    /// Returns the default path to the config file.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }

    /// Cache root with `~` expanded against the home directory.
    pub fn cache_root(&self) -> PathBuf {
        pomtree_util::fs::expand_tilde(&self.cache_dir, &pomtree_util::fs::home_dir())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Parse the configured `roots` into coordinates.
    pub fn root_coordinates(&self) -> PomtreeResult<Vec<Coordinate>> {
        self.roots
            .iter()
            .map(|s| {
                Coordinate::parse(s).ok_or_else(|| PomtreeError::Config {
                    message: format!("Invalid root coordinate '{s}'"),
                })
            })
            .collect()
    }
}

/// Returns the path to the pomtree data directory (`~/.pomtree/`).
pub fn dirs_path() -> PathBuf {
    pomtree_util::fs::home_dir().join(".pomtree")
}
