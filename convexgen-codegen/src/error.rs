//! Error types for code generation.

use thiserror::Error;

/// Error type for code generation operations.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Catalog parsing error.
    #[error("catalog parse error: {0}")]
    Parse(#[from] convexgen_schema::ParseError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The emitted tokens are not a valid Rust file.
    #[error("generated code does not parse: {0}")]
    Syntax(#[from] syn::Error),
}
