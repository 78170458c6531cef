//! Remote catalog fetch through a deployment's system query.

use crate::error::FetchError;
use convexgen_schema::{Catalog, parse_remote_response};
use reqwest::header::AUTHORIZATION;
use serde::Serialize;
use std::time::Duration;
use tracing::info;

/// System query returning the function catalog.
pub const API_SPEC_PATH: &str = "_system/cli/modules:apiSpec";

/// Body of a query request.
#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    path: &'a str,
    args: serde_json::Map<String, serde_json::Value>,
}

impl QueryRequest<'static> {
    fn api_spec() -> Self {
        Self {
            path: API_SPEC_PATH,
            args: serde_json::Map::new(),
        }
    }
}

/// Fetches the catalog from a deployment over HTTP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSource {
    url: String,
    key: Option<String>,
    timeout: Duration,
}

impl RemoteSource {
    /// Creates a source for the deployment at `url`.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            key: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the deploy key.
    #[must_use]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the deployment URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns true if a deploy key is set.
    #[must_use]
    pub fn has_key(&self) -> bool {
        self.key.is_some()
    }

    /// Returns the query endpoint.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}/api/query", self.url.trim_end_matches('/'))
    }

    /// Queries the deployment for its catalog.
    ///
    /// # Errors
    /// Returns `FetchError` if no key is set, the request fails, the
    /// deployment reports an error or the response is malformed.
    pub fn fetch(&self) -> Result<Catalog, FetchError> {
        let key = self.key.as_deref().ok_or_else(|| FetchError::MissingKey {
            url: self.url.clone(),
        })?;
        let endpoint = self.endpoint();
        info!(%endpoint, "fetching function spec");

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()?;
        let body = client
            .post(&endpoint)
            .header(AUTHORIZATION, format!("Convex {key}"))
            .json(&QueryRequest::api_spec())
            .send()?
            .error_for_status()?
            .text()?;

        let response = parse_remote_response(&body)?;
        if !response.is_success() {
            return Err(FetchError::Remote {
                message: response
                    .error_message
                    .unwrap_or_else(|| response.value.to_string()),
            });
        }

        let mut catalog = response.into_catalog()?;
        catalog.url = Some(self.url.clone());
        info!(functions = catalog.len(), "fetched function spec");
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body() {
        let body = serde_json::to_value(QueryRequest::api_spec()).expect("Failed to serialize");
        assert_eq!(
            body,
            serde_json::json!({ "path": "_system/cli/modules:apiSpec", "args": {} })
        );
    }

    #[test]
    fn test_endpoint() {
        let source = RemoteSource::new("https://happy-otter-123.convex.cloud/");
        assert_eq!(
            source.endpoint(),
            "https://happy-otter-123.convex.cloud/api/query"
        );
    }

    #[test]
    fn test_builder() {
        let source = RemoteSource::new("https://x.convex.cloud")
            .key("prod:abc")
            .timeout(Duration::from_secs(5));
        assert!(source.has_key());
        assert_eq!(source.url(), "https://x.convex.cloud");
    }

    #[test]
    fn test_missing_key() {
        let err = RemoteSource::new("https://x.convex.cloud")
            .fetch()
            .expect_err("fetch without key must fail");
        assert!(matches!(err, FetchError::MissingKey { url } if url == "https://x.convex.cloud"));
    }
}
