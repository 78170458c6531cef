//! Function descriptors for Convex catalogs.
//!
//! This module contains the data structures describing the functions a
//! deployment exposes: RPC functions (queries, mutations, actions) and HTTP
//! actions.

use crate::types::TypeNode;
use serde::Deserialize;

/// Kind of function in a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    /// Read-only query.
    Query,
    /// Transactional mutation.
    Mutation,
    /// Action.
    Action,
    /// HTTP route handler.
    HttpAction,
}

impl FunctionKind {
    /// Returns the kind as spelled in the catalog.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "Query",
            Self::Mutation => "Mutation",
            Self::Action => "Action",
            Self::HttpAction => "HttpAction",
        }
    }
}

/// Visibility of a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Visibility {
    /// Callable by clients.
    Public,
    /// Callable only from other functions.
    Internal,
}

/// An RPC function: query, mutation or action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDescriptor {
    /// Function path, e.g. `users/get.js:byId`.
    pub identifier: String,
    /// Function kind.
    pub kind: FunctionKind,
    /// Argument validator.
    pub args: TypeNode,
    /// Return validator.
    pub returns: TypeNode,
    /// Visibility.
    pub visibility: Visibility,
}

impl FunctionDescriptor {
    /// Creates a new descriptor.
    #[must_use]
    pub fn new(
        kind: FunctionKind,
        identifier: impl Into<String>,
        args: TypeNode,
        returns: TypeNode,
        visibility: Visibility,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            kind,
            args,
            returns,
            visibility,
        }
    }

    /// Returns true if clients may call this function.
    #[must_use]
    pub const fn is_public(&self) -> bool {
        matches!(self.visibility, Visibility::Public)
    }
}

/// An HTTP action route.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HttpEndpoint {
    /// HTTP method.
    pub method: String,
    /// Route path.
    pub path: String,
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawFunction")]
pub enum SchemaFunction {
    /// Query, mutation or action.
    Rpc(FunctionDescriptor),
    /// HTTP action.
    Http(HttpEndpoint),
}

impl SchemaFunction {
    /// Returns the function kind.
    #[must_use]
    pub const fn kind(&self) -> FunctionKind {
        match self {
            Self::Rpc(descriptor) => descriptor.kind,
            Self::Http(_) => FunctionKind::HttpAction,
        }
    }

    /// Returns the RPC descriptor, if this is one.
    #[must_use]
    pub const fn as_rpc(&self) -> Option<&FunctionDescriptor> {
        match self {
            Self::Rpc(descriptor) => Some(descriptor),
            Self::Http(_) => None,
        }
    }
}

/// Wire shape of an entry, discriminated by `functionType`.
#[derive(Deserialize)]
#[serde(tag = "functionType")]
enum RawFunction {
    Query(RawRpc),
    Mutation(RawRpc),
    Action(RawRpc),
    HttpAction(HttpEndpoint),
}

#[derive(Deserialize)]
struct RawRpc {
    identifier: String,
    args: TypeNode,
    returns: TypeNode,
    visibility: Visibility,
}

impl From<RawFunction> for SchemaFunction {
    fn from(raw: RawFunction) -> Self {
        let (kind, rpc) = match raw {
            RawFunction::Query(rpc) => (FunctionKind::Query, rpc),
            RawFunction::Mutation(rpc) => (FunctionKind::Mutation, rpc),
            RawFunction::Action(rpc) => (FunctionKind::Action, rpc),
            RawFunction::HttpAction(endpoint) => return Self::Http(endpoint),
        };
        Self::Rpc(FunctionDescriptor::new(
            kind,
            rpc.identifier,
            rpc.args,
            rpc.returns,
            rpc.visibility,
        ))
    }
}

/// A fetched function catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Catalog {
    /// Deployment URL, when reported by the source.
    pub url: Option<String>,
    /// All entries in schema order.
    pub functions: Vec<SchemaFunction>,
}

impl Catalog {
    /// Creates a catalog from entries.
    #[must_use]
    pub fn new(functions: Vec<SchemaFunction>) -> Self {
        Self {
            url: None,
            functions,
        }
    }

    /// Returns the RPC descriptors in schema order, skipping HTTP actions.
    pub fn descriptors(&self) -> impl Iterator<Item = &FunctionDescriptor> {
        self.functions.iter().filter_map(SchemaFunction::as_rpc)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Returns true if the catalog has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
