//! # convexgen core
//!
//! Runtime types and traits used by generated Convex bindings.
//!
//! This crate provides:
//! - Wire-encoded value types ([`Int64`], [`Float64`], [`Bytes`])
//! - [`Nullable`] for values that must serialize as an explicit `null`
//! - The [`ConvexFunction`] trait implemented by every generated binding
//! - Argument encoding and result decoding helpers
//! - Error types for encoding, decoding and builder construction

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod function;
pub mod nullable;
pub mod types;

pub use decoder::{ConvexResponse, FailureData, decode_output};
pub use encoder::{encode_args, encode_value};
pub use error::{BuildError, Error, Result};
pub use function::{ConvexFunction, EmptyArgs, FunctionKind};
pub use nullable::Nullable;
pub use types::{Bytes, Float64, Int64};

// Generated code refers to these through `::convexgen_core` so that consumers
// only need a single dependency.
pub use serde;
pub use serde_json;
