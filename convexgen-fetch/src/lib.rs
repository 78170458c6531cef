//! # convexgen fetch
//!
//! Retrieval of Convex function catalogs.
//!
//! This crate provides:
//! - Local fetch through the project's package manager (`convex function-spec`)
//! - Remote fetch through a deployment's `apiSpec` system query
//! - [`SchemaSource`], the configuration choosing between the two

pub mod error;
pub mod local;
pub mod remote;
pub mod source;

pub use error::FetchError;
pub use local::{LocalSource, PackageManager};
pub use remote::RemoteSource;
pub use source::SchemaSource;
