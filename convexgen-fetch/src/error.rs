//! Error types for catalog fetching.

use std::process::ExitStatus;
use thiserror::Error;

/// Error type for fetch operations.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The local command could not be started.
    #[error("failed to run '{command}': {source}")]
    Spawn {
        /// Command line.
        command: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The local command exited unsuccessfully.
    #[error("'{command}' failed ({status}): {stderr}")]
    CommandFailed {
        /// Command line.
        command: String,
        /// Exit status.
        status: ExitStatus,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// The configured command is blank.
    #[error("empty function-spec command")]
    EmptyCommand,

    /// No deploy key for a remote source.
    #[error("no deploy key configured for {url}")]
    MissingKey {
        /// Deployment URL.
        url: String,
    },

    /// HTTP transport or status error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The deployment answered with an error status.
    #[error("remote query failed: {message}")]
    Remote {
        /// Error message reported by the deployment.
        message: String,
    },

    /// The fetched catalog is malformed.
    #[error("invalid function spec: {0}")]
    Parse(#[from] convexgen_schema::ParseError),
}
