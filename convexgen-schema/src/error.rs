//! Error types for schema parsing.

use thiserror::Error;

/// Error type for schema parsing operations.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON did not match the catalog format.
    #[error("invalid schema JSON at '{path}': {source}")]
    Json {
        /// Path to the offending element, e.g. `[3].args.value.name`.
        path: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_path_to_error::Error<serde_json::Error>> for ParseError {
    fn from(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        Self::Json {
            path: err.path().to_string(),
            source: err.into_inner(),
        }
    }
}
