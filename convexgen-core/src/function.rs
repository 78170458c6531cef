//! The trait implemented by generated function bindings.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Kind of callable Convex function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    /// Read-only, subscribable function.
    Query,
    /// Transactional write.
    Mutation,
    /// Non-transactional function that may call third-party services.
    Action,
}

impl FunctionKind {
    /// Returns the kind as used in Convex schemas.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "Query",
            Self::Mutation => "Mutation",
            Self::Action => "Action",
        }
    }
}

impl std::fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed binding to one Convex function.
///
/// Generated code implements this for every public function in the catalog.
///
/// # Example
/// ```ignore
/// // Generated binding usage
/// let call = api::users::get::ById::new(
///     api::users::get::by_id::Args::builder().id("k57...").build()?,
/// );
/// let args = convexgen_core::encode_args(&call)?;
/// ```
pub trait ConvexFunction {
    /// Argument type; serializes to a JSON object.
    type Args: Serialize;

    /// Result type.
    type Output: DeserializeOwned;

    /// Function path, e.g. `users/get.js:byId`.
    const IDENTIFIER: &'static str;

    /// Function kind.
    const KIND: FunctionKind;

    /// Returns the call arguments.
    fn args(&self) -> &Self::Args;
}

/// Arguments of a function that takes none. Serializes as `{}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct EmptyArgs {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_args_is_empty_object() {
        let encoded = serde_json::to_string(&EmptyArgs {}).expect("Failed to encode");
        assert_eq!(encoded, "{}");
    }

    #[test]
    fn test_function_kind_display() {
        assert_eq!(FunctionKind::Query.to_string(), "Query");
        assert_eq!(FunctionKind::Mutation.as_str(), "Mutation");
        assert_eq!(FunctionKind::Action.as_str(), "Action");
    }
}
