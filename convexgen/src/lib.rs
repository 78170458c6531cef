//! # convexgen
//!
//! Typed Rust bindings for the public functions of a Convex deployment.
//!
//! The function catalog is fetched at build time, either from the Convex CLI
//! of a local backend project or from a deployment, and turned into one Rust
//! source file of `serde` types and [`ConvexFunction`] bindings.
//!
//! ## Quick Start
//!
//! ```ignore
//! // build.rs
//! use convexgen::prelude::*;
//!
//! fn main() -> Result<(), GenerateError> {
//!     GenerateSources::new(SchemaSource::local("../backend")).run()?;
//!     Ok(())
//! }
//! ```
//!
//! ```ignore
//! // src/lib.rs
//! include!(concat!(env!("OUT_DIR"), "/convex_api.rs"));
//!
//! let call = api::tasks::List::new(api::tasks::list::Args::builder().limit(10).build()?);
//! let args = convexgen_core::encode_args(&call)?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`] - Runtime types used by generated code
//! - [`schema`] - Function catalog model and parsing
//! - [`codegen`] - Rust code generation from catalogs
//! - [`fetch`] - Catalog retrieval from the CLI or a deployment

pub mod error;
pub mod generate;
pub mod prelude;
pub mod properties;

/// Runtime types used by generated code.
pub mod core {
    pub use convexgen_core::*;
}

/// Function catalog model and parsing.
pub mod schema {
    pub use convexgen_schema::*;
}

/// Code generation from catalogs.
pub mod codegen {
    pub use convexgen_codegen::*;
}

/// Catalog retrieval.
pub mod fetch {
    pub use convexgen_fetch::*;
}

pub use error::GenerateError;
pub use generate::{DEFAULT_FILE_NAME, GenerateSources};
pub use properties::{KEY_PROPERTY, PROPERTIES_FILE, Properties};

pub use convexgen_core::{
    BuildError, Bytes, ConvexFunction, ConvexResponse, EmptyArgs, Float64, FunctionKind, Int64,
    Nullable, decode_output, encode_args,
};
pub use convexgen_fetch::{LocalSource, RemoteSource, SchemaSource};
