use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all pomtree operations.
#[derive(Debug, Error, Diagnostic)]
pub enum PomtreeError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration file or command-line coordinate.
    #[error("Configuration error: {message}")]
    #[diagnostic(help("Check ~/.pomtree/config.toml or the coordinates passed on the command line"))]
    Config { message: String },

    /// Neither the local cache nor any configured repository has the manifest.
    #[error("Manifest not found: {path}")]
    #[diagnostic(help("Check the coordinate and the configured repositories"))]
    ManifestNotFound { path: String },

    /// Connection, timeout or HTTP client failure.
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// The manifest bytes could not be decoded or parsed.
    #[error("Malformed manifest: {message}")]
    MalformedManifest { message: String },

    /// A coordinate was reached again along its own ancestor path.
    #[error("Dependency cycle detected: {path}")]
    CycleDetected { path: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

impl PomtreeError {
    /// Whether this error means "the manifest is unavailable" rather than
    /// "the manifest is broken". Lenient resolution treats both the same way
    /// but logs absences more quietly.
    pub fn is_absence(&self) -> bool {
        matches!(
            self,
            PomtreeError::ManifestNotFound { .. } | PomtreeError::Transport { .. }
        )
    }
}

/// Convenience alias used throughout the library crates.
pub type PomtreeResult<T> = Result<T, PomtreeError>;
