//! Maven repository abstraction: URL layout and configuration.

use pomtree_core::config::RepositoryConfig;

/// A remote repository addressed as `https://{host}/{path}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub name: String,
    pub host: String,
    pub path: String,
}

impl Repository {
    pub fn new(host: &str, path: &str) -> Self {
        Self {
            name: host.to_string(),
            host: host.trim_matches('/').to_string(),
            path: path.trim_matches('/').to_string(),
        }
    }

    /// Build a `Repository` from a configuration entry.
    pub fn from_config(entry: &RepositoryConfig) -> Self {
        let mut repo = Self::new(&entry.host, &entry.path);
        if !entry.name.is_empty() {
            repo.name = entry.name.clone();
        }
        repo
    }

    /// `https://{host}/{path}` without a trailing slash.
    pub fn base_url(&self) -> String {
        if self.path.is_empty() {
            format!("https://{}", self.host)
        } else {
            format!("https://{}/{}", self.host, self.path)
        }
    }

    /// Full URL for a path in the repository layout.
    pub fn url_for(&self, repository_path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url(),
            repository_path.trim_start_matches('/')
        )
    }
}
