//! Local manifest cache mirroring the remote repository layout.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use pomtree_util::errors::{PomtreeError, PomtreeResult};

use crate::pom::Manifest;

/// On-disk cache keyed by repository path, e.g. `~/.m2/repository`.
///
/// Entries are written once and never mutated; two processes racing on the
/// same path write identical bytes.
#[derive(Debug, Clone)]
pub struct LocalCache {
    root: PathBuf,
}

impl LocalCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory of this cache.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of a repository path inside the cache, or `None` if the
    /// path would resolve outside the cache root.
    pub fn path_for(&self, repository_path: &str) -> Option<PathBuf> {
        let relative = repository_path.trim_start_matches('/');
        is_contained(relative).then(|| self.root.join(relative))
    }

    pub fn contains(&self, repository_path: &str) -> bool {
        self.path_for(repository_path).is_some_and(|p| p.is_file())
    }

    /// Raw bytes of a cached file, `None` on a miss.
    pub fn read(&self, repository_path: &str) -> Option<Vec<u8>> {
        let path = self.path_for(repository_path)?;
        match fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!("Unable to read cached {}: {e}", path.display());
                None
            }
        }
    }

    /// Check if a manifest is cached and parse it.
    ///
    /// `None` on a miss. A cached file that no longer parses comes back as
    /// `Some(Err(..))`; the caller decides whether a remote copy replaces it.
    pub fn get_manifest(&self, repository_path: &str) -> Option<PomtreeResult<Manifest>> {
        let bytes = self.read(repository_path)?;
        Some(Manifest::from_bytes(&bytes))
    }

    /// Store data in the cache, creating directories as needed.
    pub fn put(&self, repository_path: &str, data: &[u8]) -> PomtreeResult<PathBuf> {
        let path = self.path_for(repository_path).ok_or_else(|| PomtreeError::Generic {
            message: format!("Refusing to cache {repository_path}: outside the cache root"),
        })?;
        pomtree_util::fs::write_with_parents(&path, data)?;
        Ok(path)
    }
}

/// Whether a relative repository path is made of plain segments only, so
/// joining it onto a directory cannot climb out of that directory.
pub fn is_contained(repository_path: &str) -> bool {
    repository_path
        .split('/')
        .all(|seg| !seg.is_empty() && seg != "." && seg != ".." && !seg.contains(['\\', ':']))
}
