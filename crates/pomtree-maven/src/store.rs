//! Manifest lookup: local cache first, then each configured repository in
//! order, writing successful downloads back to the cache.

use pomtree_core::config::ResolverConfig;
use pomtree_core::coordinate::Coordinate;
use pomtree_util::errors::{PomtreeError, PomtreeResult};

use crate::cache::{is_contained, LocalCache};
use crate::download::{FetchOutcome, Fetcher, HttpFetcher};
use crate::pom::Manifest;
use crate::repository::Repository;

/// Anything that can produce the manifest for a coordinate.
///
/// The resolver depends on this trait rather than on [`ManifestStore`] so it
/// can run against in-memory fixtures.
pub trait ManifestSource {
    fn manifest(&self, coordinate: &Coordinate) -> PomtreeResult<Manifest>;
}

impl<S: ManifestSource + ?Sized> ManifestSource for &S {
    fn manifest(&self, coordinate: &Coordinate) -> PomtreeResult<Manifest> {
        (**self).manifest(coordinate)
    }
}

/// Cache-backed manifest store over a list of remote repositories.
///
/// Manifests are parsed on every call; nothing is memoised in memory.
pub struct ManifestStore<F = HttpFetcher> {
    cache: LocalCache,
    repositories: Vec<Repository>,
    fetcher: F,
}

impl ManifestStore<HttpFetcher> {
    /// Build a store from configuration, using a blocking HTTP fetcher.
    pub fn from_config(config: &ResolverConfig) -> PomtreeResult<Self> {
        let repositories = config
            .repositories
            .iter()
            .map(Repository::from_config)
            .collect();
        let fetcher = HttpFetcher::new(config.connect_timeout())?;
        Ok(Self::new(LocalCache::new(config.cache_root()), repositories, fetcher))
    }
}

impl<F: Fetcher> ManifestStore<F> {
    pub fn new(cache: LocalCache, repositories: Vec<Repository>, fetcher: F) -> Self {
        Self {
            cache,
            repositories,
            fetcher,
        }
    }

    pub fn cache(&self) -> &LocalCache {
        &self.cache
    }

    pub fn repositories(&self) -> &[Repository] {
        &self.repositories
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Look up the manifest stored at `repository_path`.
    ///
    /// Fails with `ManifestNotFound` when neither the cache nor any
    /// repository has it. When every repository failed at the transport
    /// level (none answered at all), the last transport error is returned
    /// instead so callers can tell "offline" from "absent".
    ///
    /// A path that would leave the cache root is rejected as malformed before
    /// the cache or any repository is touched. A corrupt cache entry is
    /// skipped in favour of the repositories; with none configured it is
    /// reported as malformed.
    pub fn get(&self, repository_path: &str) -> PomtreeResult<Manifest> {
        if !is_contained(repository_path.trim_start_matches('/')) {
            return Err(PomtreeError::MalformedManifest {
                message: format!("Refusing repository path {repository_path}"),
            });
        }

        let corrupt = match self.cache.get_manifest(repository_path) {
            Some(Ok(manifest)) => {
                tracing::debug!("Cache hit: {repository_path}");
                return Ok(manifest);
            }
            Some(Err(e)) => {
                tracing::warn!("Ignoring cached {repository_path}: {e}");
                Some(e)
            }
            None => {
                tracing::debug!("Cache miss: {repository_path}");
                None
            }
        };
        if self.repositories.is_empty() {
            if let Some(e) = corrupt {
                return Err(e);
            }
        }

        let mut last_transport_error = None;
        let mut answered = false;

        for repo in &self.repositories {
            let url = repo.url_for(repository_path);
            match self.fetcher.get(&url) {
                Ok(FetchOutcome::Found(bytes)) => {
                    let manifest = Manifest::from_bytes(&bytes).map_err(|e| {
                        tracing::warn!("Malformed manifest from {url}: {e}");
                        e
                    })?;
                    self.write_to_cache(repository_path, &bytes);
                    tracing::debug!("Fetched {repository_path} from {}", repo.name);
                    return Ok(manifest);
                }
                Ok(FetchOutcome::Missing(status)) => {
                    tracing::debug!("Unable to download {url} [{status}]");
                    answered = true;
                }
                Err(e) => {
                    tracing::warn!("{} unavailable: {e}", repo.name);
                    last_transport_error = Some(e);
                }
            }
        }

        match last_transport_error {
            Some(e) if !answered => Err(e),
            _ => Err(PomtreeError::ManifestNotFound {
                path: repository_path.to_string(),
            }),
        }
    }

    /// Cache writes never fail a lookup; the manifest is already in hand.
    fn write_to_cache(&self, repository_path: &str, bytes: &[u8]) {
        match self.cache.put(repository_path, bytes) {
            Ok(path) => tracing::info!("Caching {}", path.display()),
            Err(e) => tracing::warn!("Unable to cache {repository_path}: {e}"),
        }
    }
}

impl<F: Fetcher> ManifestSource for ManifestStore<F> {
    fn manifest(&self, coordinate: &Coordinate) -> PomtreeResult<Manifest> {
        let path = coordinate.repository_path();
        if coordinate.version.is_empty() {
            tracing::debug!("No version for {}, nothing to look up", coordinate.root_name());
            return Err(PomtreeError::ManifestNotFound { path });
        }
        if let Some(problem) = coordinate.layout_error() {
            tracing::warn!("Skipping {coordinate}: {problem}");
            return Err(PomtreeError::MalformedManifest {
                message: format!("{problem} in {}", coordinate.root_name()),
            });
        }
        self.get(&path)
    }
}
