//! Local catalog fetch through the Convex CLI.

use crate::error::FetchError;
use convexgen_schema::{Catalog, parse_local_output};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Subcommand that prints the function catalog.
pub const FUNCTION_SPEC_ARGS: [&str; 2] = ["convex", "function-spec"];

/// JavaScript package manager of the backend project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageManager {
    /// `bun.lock` or `bun.lockb`.
    Bun,
    /// `pnpm-lock.yaml`.
    Pnpm,
    /// `yarn.lock`.
    Yarn,
    /// No recognized lock file.
    Npm,
}

impl PackageManager {
    /// Detects the package manager from the lock files in `dir`.
    #[must_use]
    pub fn detect(dir: &Path) -> Self {
        let has = |name: &str| dir.join(name).is_file();
        let manager = if has("bun.lock") || has("bun.lockb") {
            Self::Bun
        } else if has("pnpm-lock.yaml") {
            Self::Pnpm
        } else if has("yarn.lock") {
            Self::Yarn
        } else {
            Self::Npm
        };
        debug!(dir = %dir.display(), ?manager, "detected package manager");
        manager
    }

    /// Returns the package runner invocation.
    #[must_use]
    pub const fn runner(&self) -> &'static [&'static str] {
        match self {
            Self::Bun => &["bunx"],
            Self::Pnpm => &["pnpm", "exec"],
            Self::Yarn => &["yarn"],
            Self::Npm => &["npx"],
        }
    }

    /// Returns the full `function-spec` command line.
    #[must_use]
    pub fn function_spec_command(&self) -> Vec<String> {
        self.runner()
            .iter()
            .chain(FUNCTION_SPEC_ARGS.iter())
            .map(|part| (*part).to_string())
            .collect()
    }
}

/// Fetches the catalog by running the Convex CLI in a backend directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalSource {
    dir: PathBuf,
    command: Option<String>,
}

impl LocalSource {
    /// Creates a source for the backend project in `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            command: None,
        }
    }

    /// Overrides the detected command. Arguments are split on whitespace.
    #[must_use]
    pub fn command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Returns the backend directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the command line that [`fetch`](Self::fetch) runs.
    #[must_use]
    pub fn resolve_command(&self) -> Vec<String> {
        match &self.command {
            Some(command) => command.split_whitespace().map(str::to_string).collect(),
            None => PackageManager::detect(&self.dir).function_spec_command(),
        }
    }

    /// Runs the command and parses its output.
    ///
    /// # Errors
    /// Returns `FetchError` if the command cannot start, exits unsuccessfully
    /// or prints something other than a function spec.
    pub fn fetch(&self) -> Result<Catalog, FetchError> {
        let argv = self.resolve_command();
        let (program, args) = argv.split_first().ok_or(FetchError::EmptyCommand)?;
        let command = argv.join(" ");
        info!(%command, dir = %self.dir.display(), "fetching function spec");

        let output = Command::new(program)
            .args(args)
            .current_dir(&self.dir)
            .output()
            .map_err(|source| FetchError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(FetchError::CommandFailed {
                command,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let catalog = parse_local_output(stdout.trim())?;
        info!(functions = catalog.len(), "fetched function spec");
        Ok(catalog)
    }
}
