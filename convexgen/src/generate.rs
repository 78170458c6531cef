//! Build script integration.

use crate::error::GenerateError;
use crate::properties::{PROPERTIES_FILE, Properties};
use convexgen_codegen::{Generator, NamespaceTree};
use convexgen_fetch::{FetchError, SchemaSource};
use convexgen_schema::Catalog;
use std::env;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default name of the generated file.
pub const DEFAULT_FILE_NAME: &str = "convex_api.rs";

/// Fetches a catalog and writes its bindings, typically from `build.rs`.
///
/// # Example
/// ```ignore
/// GenerateSources::new(SchemaSource::remote("https://happy-otter-123.convex.cloud"))
///     .file_name("convex.rs")
///     .run()?;
/// ```
#[derive(Debug, Clone)]
pub struct GenerateSources {
    source: SchemaSource,
    out_dir: Option<PathBuf>,
    file_name: String,
    properties: Option<PathBuf>,
}

impl GenerateSources {
    /// Creates a run for the given source.
    #[must_use]
    pub fn new(source: impl Into<SchemaSource>) -> Self {
        Self {
            source: source.into(),
            out_dir: None,
            file_name: DEFAULT_FILE_NAME.to_string(),
            properties: None,
        }
    }

    /// Sets the output directory (default: `$OUT_DIR`).
    #[must_use]
    pub fn out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.out_dir = Some(dir.into());
        self
    }

    /// Sets the output file name.
    #[must_use]
    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = name.into();
        self
    }

    /// Sets the properties file consulted for a missing deploy key
    /// (default: `local.properties` in `$CARGO_MANIFEST_DIR`).
    #[must_use]
    pub fn properties(mut self, path: impl Into<PathBuf>) -> Self {
        self.properties = Some(path.into());
        self
    }

    /// Returns the path of the generated file.
    ///
    /// # Errors
    /// Returns `GenerateError::MissingOutDir` if no directory is configured
    /// and `OUT_DIR` is unset.
    pub fn output_path(&self) -> Result<PathBuf, GenerateError> {
        let dir = match &self.out_dir {
            Some(dir) => dir.clone(),
            None => env::var_os("OUT_DIR")
                .map(PathBuf::from)
                .ok_or(GenerateError::MissingOutDir)?,
        };
        Ok(dir.join(&self.file_name))
    }

    /// Returns the source, with the deploy key from the properties file
    /// filled in when the remote source has none.
    ///
    /// # Errors
    /// Returns `GenerateError::Io` if the properties file cannot be read.
    pub fn resolve_source(&self) -> Result<SchemaSource, GenerateError> {
        if !self.source.needs_key() {
            return Ok(self.source.clone());
        }
        let Some(path) = self.properties_path() else {
            return Ok(self.source.clone());
        };
        println!("cargo:rerun-if-changed={}", path.display());

        let properties = Properties::load(&path).map_err(|source| GenerateError::Io {
            path: path.clone(),
            source,
        })?;
        match properties.as_ref().and_then(Properties::deploy_key) {
            Some(key) => Ok(self.source.clone().with_default_key(key)),
            None => Ok(self.source.clone()),
        }
    }

    /// Fetches the catalog.
    ///
    /// # Errors
    /// Returns `GenerateError` if the properties file cannot be read or the
    /// fetch fails.
    pub fn fetch(&self) -> Result<Catalog, GenerateError> {
        Ok(self.resolve_source()?.fetch()?)
    }

    /// Fetches the catalog and writes the bindings.
    ///
    /// A failed fetch is logged and skips generation: `Ok(None)` is returned
    /// and nothing is written. A fetched schema that does not decode is an
    /// error.
    ///
    /// # Errors
    /// Returns `GenerateError` for undecodable schemas and for failures after
    /// the fetch.
    pub fn run(&self) -> Result<Option<PathBuf>, GenerateError> {
        let catalog = match self.fetch() {
            Ok(catalog) => catalog,
            Err(GenerateError::Fetch(FetchError::Parse(err))) => {
                return Err(GenerateError::Fetch(FetchError::Parse(err)));
            }
            Err(GenerateError::Fetch(err)) => {
                warn!(error = %err, "failed to fetch function spec, skipping generation");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };
        self.write(&catalog).map(Some)
    }

    /// Writes the bindings of an already fetched catalog.
    ///
    /// # Errors
    /// Returns `GenerateError` if generation or writing fails.
    pub fn write(&self, catalog: &Catalog) -> Result<PathBuf, GenerateError> {
        let tree = NamespaceTree::from_catalog(catalog);
        let source = Generator::new(&tree).generate()?;
        let path = self.output_path()?;
        write_file(&path, &source)?;
        info!(
            path = %path.display(),
            functions = tree.function_count(),
            "wrote bindings"
        );
        Ok(path)
    }

    fn properties_path(&self) -> Option<PathBuf> {
        self.properties.clone().or_else(|| {
            env::var_os("CARGO_MANIFEST_DIR").map(|dir| PathBuf::from(dir).join(PROPERTIES_FILE))
        })
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), GenerateError> {
    let io_err = |source| GenerateError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, contents).map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use convexgen_fetch::{LocalSource, RemoteSource};
    use convexgen_schema::{FunctionDescriptor, FunctionKind, SchemaFunction, TypeNode, Visibility};

    fn catalog() -> Catalog {
        Catalog::new(vec![SchemaFunction::Rpc(FunctionDescriptor::new(
            FunctionKind::Query,
            "tasks.js:count",
            TypeNode::Any,
            TypeNode::Float64,
            Visibility::Public,
        ))])
    }

    #[test]
    fn test_write_creates_directories() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let out = dir.path().join("nested").join("out");
        let path = GenerateSources::new(SchemaSource::local("."))
            .out_dir(&out)
            .file_name("api.rs")
            .write(&catalog())
            .expect("Failed to write");

        assert_eq!(path, out.join("api.rs"));
        let code = std::fs::read_to_string(&path).expect("Failed to read output");
        assert!(code.starts_with("// @generated by convexgen"));
        assert!(code.contains("pub struct Count;"), "{code}");
    }

    #[test]
    fn test_default_file_name() {
        let path = GenerateSources::new(SchemaSource::local("."))
            .out_dir("/tmp/out")
            .output_path()
            .expect("Failed to resolve output path");
        assert_eq!(path, Path::new("/tmp/out").join(DEFAULT_FILE_NAME));
    }

    #[test]
    fn test_key_from_properties() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let props = dir.path().join(PROPERTIES_FILE);
        std::fs::write(&props, "convex.key=dev:abc\n").expect("Failed to write properties");

        let run = GenerateSources::new(SchemaSource::remote("https://x.convex.cloud")).properties(&props);
        let source = run.resolve_source().expect("Failed to resolve source");
        assert_eq!(
            source,
            SchemaSource::from(RemoteSource::new("https://x.convex.cloud").key("dev:abc"))
        );
    }

    #[test]
    fn test_explicit_key_wins() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let props = dir.path().join(PROPERTIES_FILE);
        std::fs::write(&props, "convex.key=dev:abc\n").expect("Failed to write properties");

        let explicit = SchemaSource::from(RemoteSource::new("https://x.convex.cloud").key("prod:xyz"));
        let run = GenerateSources::new(explicit.clone()).properties(&props);
        assert_eq!(run.resolve_source().expect("Failed to resolve source"), explicit);
    }

    #[test]
    fn test_missing_key_skips_generation() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let run = GenerateSources::new(SchemaSource::remote("https://x.convex.cloud"))
            .properties(dir.path().join(PROPERTIES_FILE))
            .out_dir(dir.path());

        assert_eq!(run.run().expect("Failed to run"), None);
        assert!(!dir.path().join(DEFAULT_FILE_NAME).exists());
    }

    #[test]
    fn test_failed_command_skips_generation() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let source = LocalSource::new(dir.path()).command("convexgen-no-such-program");
        let run = GenerateSources::new(source).out_dir(dir.path());

        assert_eq!(run.run().expect("Failed to run"), None);
        assert!(!dir.path().join(DEFAULT_FILE_NAME).exists());
    }
}
