//! Manifest downloading from remote repositories.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;

use pomtree_util::errors::{PomtreeError, PomtreeResult};

/// Result of a single GET against a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// HTTP 200 with the response body.
    Found(Vec<u8>),
    /// Any other status; the repository does not serve this path.
    Missing(u16),
}

/// Something that can GET a URL. The store only ever issues one request per
/// repository per lookup, and never retries.
pub trait Fetcher {
    fn get(&self, url: &str) -> PomtreeResult<FetchOutcome>;
}

/// Blocking HTTP fetcher with a fixed connect timeout and no overall
/// request deadline, so slow but live repositories are waited on.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(connect_timeout: Duration) -> PomtreeResult<Self> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(None::<Duration>)
            .user_agent(concat!("pomtree/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PomtreeError::Transport {
                message: format!("Failed to create HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn get(&self, url: &str) -> PomtreeResult<FetchOutcome> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| PomtreeError::Transport {
                message: format!("Request to {url} failed: {e}"),
            })?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Ok(FetchOutcome::Missing(status.as_u16()));
        }

        let bytes = resp.bytes().map_err(|e| PomtreeError::Transport {
            message: format!("Failed to read response from {url}: {e}"),
        })?;
        Ok(FetchOutcome::Found(bytes.to_vec()))
    }
}

