//! Error types for convexgen runtime operations.

use thiserror::Error;

/// Core error type for encoding and decoding Convex values.
#[derive(Debug, Error)]
pub enum Error {
    /// JSON serialization or deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A wire-encoded value was not valid base64.
    #[error("invalid base64 in '{key}': {source}")]
    Base64 {
        /// Wire key of the boxed value (`$integer`, `$float`, `$bytes`).
        key: &'static str,
        /// Underlying decode error.
        #[source]
        source: base64::DecodeError,
    },

    /// A boxed 64-bit value did not decode to exactly 8 bytes.
    #[error("invalid length for '{key}': expected {expected} bytes, actual {actual} bytes")]
    InvalidLength {
        /// Wire key of the boxed value.
        key: &'static str,
        /// Expected length in bytes.
        expected: usize,
        /// Actual decoded length in bytes.
        actual: usize,
    },

    /// Function arguments did not serialize to a JSON object.
    #[error("arguments of '{identifier}' must encode to a JSON object, found {found}")]
    ArgsNotObject {
        /// Function identifier.
        identifier: &'static str,
        /// Kind of JSON value that was produced.
        found: &'static str,
    },
}

/// Result type alias for convexgen runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error returned by generated builders.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A required field was never set.
    #[error("missing required field '{field}' on '{ty}'")]
    MissingField {
        /// Generated type name.
        ty: &'static str,
        /// Field name as it appears on the wire.
        field: &'static str,
    },
}

impl BuildError {
    /// Creates a missing field error.
    #[must_use]
    pub const fn missing_field(ty: &'static str, field: &'static str) -> Self {
        Self::MissingField { ty, field }
    }
}
