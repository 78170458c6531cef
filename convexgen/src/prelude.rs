//! Prelude module for convenient imports.
//!
//! ```ignore
//! use convexgen::prelude::*;
//! ```

// Build integration
pub use crate::error::GenerateError;
pub use crate::generate::GenerateSources;
pub use convexgen_fetch::{LocalSource, PackageManager, RemoteSource, SchemaSource};

// Runtime types
pub use convexgen_core::{
    BuildError, Bytes, ConvexFunction, ConvexResponse, EmptyArgs, FailureData, Float64, Int64,
    Nullable, decode_output, encode_args,
};
