//! Catalog JSON parser.
//!
//! Three JSON shapes carry function catalogs:
//! - a bare array of descriptors,
//! - the local CLI output `{"url": ..., "functions": [...]}`,
//! - the remote query response `{"status": ..., "value": [...]}`.

use crate::error::ParseError;
use crate::functions::{Catalog, SchemaFunction};
use serde::Deserialize;
use serde::de::DeserializeOwned;

fn from_json<T: DeserializeOwned>(json: &str) -> Result<T, ParseError> {
    let mut deserializer = serde_json::Deserializer::from_str(json);
    let value = serde_path_to_error::deserialize(&mut deserializer)?;
    deserializer.end().map_err(|source| ParseError::Json {
        path: ".".to_string(),
        source,
    })?;
    Ok(value)
}

/// Parses a JSON array of function descriptors.
///
/// # Errors
/// Returns `ParseError` if the JSON is malformed or an entry does not match
/// the descriptor format.
pub fn parse_functions(json: &str) -> Result<Vec<SchemaFunction>, ParseError> {
    from_json(json)
}

#[derive(Deserialize)]
struct LocalOutput {
    #[serde(default)]
    url: Option<String>,
    functions: Vec<SchemaFunction>,
}

/// Parses the output of the local `convex function-spec` command.
///
/// # Errors
/// Returns `ParseError` if the output is not a valid function spec.
pub fn parse_local_output(json: &str) -> Result<Catalog, ParseError> {
    let output: LocalOutput = from_json(json)?;
    Ok(Catalog {
        url: output.url,
        functions: output.functions,
    })
}

/// Status of a remote query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    /// The query succeeded.
    Success,
    /// The query failed.
    Error,
}

/// Response of the remote `apiSpec` query.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteResponse {
    /// Query status.
    pub status: ResponseStatus,
    /// Function list on success, error payload otherwise.
    #[serde(default)]
    pub value: serde_json::Value,
    /// Error message, present on failure.
    #[serde(default, rename = "errorMessage")]
    pub error_message: Option<String>,
}

impl RemoteResponse {
    /// Returns true if the query succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.status, ResponseStatus::Success)
    }

    /// Decodes the function list. An error status yields an empty catalog.
    ///
    /// # Errors
    /// Returns `ParseError` if a successful response carries malformed
    /// descriptors.
    pub fn into_catalog(self) -> Result<Catalog, ParseError> {
        if !self.is_success() {
            return Ok(Catalog::default());
        }
        let functions = serde_path_to_error::deserialize(self.value)
            .map_err(|err| ParseError::Json {
                path: format!("value.{}", err.path()),
                source: err.into_inner(),
            })?;
        Ok(Catalog::new(functions))
    }
}

/// Parses the remote `apiSpec` query response.
///
/// # Errors
/// Returns `ParseError` if the response envelope is malformed.
pub fn parse_remote_response(json: &str) -> Result<RemoteResponse, ParseError> {
    from_json(json)
}
