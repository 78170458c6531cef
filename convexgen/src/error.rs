//! Error types for the build integration.

use std::path::PathBuf;
use thiserror::Error;

/// Error raised while generating bindings from a build script.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The catalog could not be fetched.
    #[error("fetch error: {0}")]
    Fetch(#[from] convexgen_fetch::FetchError),

    /// The catalog could not be turned into code.
    #[error("codegen error: {0}")]
    Codegen(#[from] convexgen_codegen::CodegenError),

    /// Reading or writing a file failed.
    #[error("io error at {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// No output directory was configured and `OUT_DIR` is unset.
    #[error("no output directory: set one explicitly or run from a build script")]
    MissingOutDir,
}
