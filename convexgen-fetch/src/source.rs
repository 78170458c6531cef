//! Catalog source configuration.

use crate::error::FetchError;
use crate::local::LocalSource;
use crate::remote::RemoteSource;
use convexgen_schema::Catalog;
use std::path::PathBuf;

/// Where a catalog comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaSource {
    /// The Convex CLI, run in a backend project.
    Local(LocalSource),
    /// A deployment's system query.
    Remote(RemoteSource),
}

impl SchemaSource {
    /// Local source for the backend project in `dir`.
    #[must_use]
    pub fn local(dir: impl Into<PathBuf>) -> Self {
        Self::Local(LocalSource::new(dir))
    }

    /// Remote source for the deployment at `url`.
    #[must_use]
    pub fn remote(url: impl Into<String>) -> Self {
        Self::Remote(RemoteSource::new(url))
    }

    /// Sets the deploy key of a remote source that has none.
    #[must_use]
    pub fn with_default_key(self, key: impl Into<String>) -> Self {
        match self {
            Self::Remote(remote) if !remote.has_key() => Self::Remote(remote.key(key)),
            other => other,
        }
    }

    /// Returns true for a remote source without a deploy key.
    #[must_use]
    pub fn needs_key(&self) -> bool {
        matches!(self, Self::Remote(remote) if !remote.has_key())
    }

    /// Fetches the catalog.
    ///
    /// # Errors
    /// Returns `FetchError` if the fetch fails.
    pub fn fetch(&self) -> Result<Catalog, FetchError> {
        match self {
            Self::Local(local) => local.fetch(),
            Self::Remote(remote) => remote.fetch(),
        }
    }
}

impl From<LocalSource> for SchemaSource {
    fn from(source: LocalSource) -> Self {
        Self::Local(source)
    }
}

impl From<RemoteSource> for SchemaSource {
    fn from(source: RemoteSource) -> Self {
        Self::Remote(source)
    }
}
