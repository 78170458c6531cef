//! Result decoding for function calls.

use crate::error::Result;
use crate::function::ConvexFunction;
use serde::de::DeserializeOwned;

/// Decodes a function result from its JSON text.
///
/// # Errors
/// Returns `Error::Json` if the text does not match `F::Output`.
pub fn decode_output<F: ConvexFunction>(json: &str) -> Result<F::Output> {
    Ok(serde_json::from_str(json)?)
}

/// Outcome of a function call as delivered by the client.
#[derive(Debug, Clone, PartialEq)]
pub enum ConvexResponse<T> {
    /// The function returned a value.
    Success(T),
    /// The function failed.
    Failure {
        /// Error message.
        message: String,
        /// Application payload of a `ConvexError`, if any.
        data: Option<FailureData>,
    },
}

impl<T> ConvexResponse<T> {
    /// Returns true if the call succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Converts into a `Result`, keeping the failure message.
    ///
    /// # Errors
    /// Returns the failure message if the call failed.
    pub fn into_result(self) -> std::result::Result<T, String> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure { message, .. } => Err(message),
        }
    }
}

/// JSON payload attached to an application error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureData {
    json: String,
}

impl FailureData {
    /// Wraps raw JSON text.
    #[must_use]
    pub fn new(json: impl Into<String>) -> Self {
        Self { json: json.into() }
    }

    /// Returns the raw JSON text.
    #[must_use]
    pub fn json(&self) -> &str {
        &self.json
    }

    /// Decodes the payload.
    ///
    /// # Errors
    /// Returns `Error::Json` if the payload does not match `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.json)?)
    }

    /// Decodes the payload, returning `None` on mismatch.
    #[must_use]
    pub fn try_decode<T: DeserializeOwned>(&self) -> Option<T> {
        self.decode().ok()
    }
}
