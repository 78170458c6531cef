//! # convexgen schema
//!
//! Convex function catalog model and parser.
//!
//! This crate provides:
//! - The recursive [`TypeNode`] describing argument and return validators
//! - Function descriptors with kind and visibility
//! - Parsing of descriptor lists, local CLI output and remote responses

pub mod error;
pub mod functions;
pub mod parser;
pub mod types;

pub use error::ParseError;
pub use functions::{
    Catalog, FunctionDescriptor, FunctionKind, HttpEndpoint, SchemaFunction, Visibility,
};
pub use parser::{
    RemoteResponse, ResponseStatus, parse_functions, parse_local_output, parse_remote_response,
};
pub use types::{ObjectField, TypeNode};
