//! Argument encoding for function calls.
//!
//! The native client takes arguments as a map from argument name to that
//! argument's JSON text; [`encode_args`] produces exactly that.

use crate::error::{Error, Result};
use crate::function::ConvexFunction;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Encodes a function's arguments as `name -> JSON text` pairs.
///
/// # Errors
/// Returns `Error::ArgsNotObject` if the arguments do not serialize to a JSON
/// object, or `Error::Json` if serialization fails.
pub fn encode_args<F: ConvexFunction>(function: &F) -> Result<BTreeMap<String, String>> {
    match serde_json::to_value(function.args())? {
        Value::Object(fields) => Ok(fields
            .into_iter()
            .map(|(name, value)| (name, value.to_string()))
            .collect()),
        other => Err(Error::ArgsNotObject {
            identifier: F::IDENTIFIER,
            found: json_kind(&other),
        }),
    }
}

/// Encodes any value to its Convex JSON text.
///
/// # Errors
/// Returns `Error::Json` if serialization fails.
pub fn encode_value<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::{EmptyArgs, FunctionKind};
    use crate::types::Int64;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize)]
    struct PageArgs {
        cursor: String,
        #[serde(rename = "numItems")]
        num_items: Int64,
    }

    struct Page {
        args: PageArgs,
    }

    impl ConvexFunction for Page {
        type Args = PageArgs;
        type Output = Vec<String>;
        const IDENTIFIER: &'static str = "messages.js:page";
        const KIND: FunctionKind = FunctionKind::Query;

        fn args(&self) -> &Self::Args {
            &self.args
        }
    }

    struct List;

    impl ConvexFunction for List {
        type Args = EmptyArgs;
        type Output = Vec<String>;
        const IDENTIFIER: &'static str = "messages.js:list";
        const KIND: FunctionKind = FunctionKind::Query;

        fn args(&self) -> &Self::Args {
            &EmptyArgs {}
        }
    }

    struct Broken;

    impl ConvexFunction for Broken {
        type Args = String;
        type Output = ();
        const IDENTIFIER: &'static str = "broken.js:call";
        const KIND: FunctionKind = FunctionKind::Mutation;

        fn args(&self) -> &Self::Args {
            const ARGS: &String = &String::new();
            ARGS
        }
    }

    #[test]
    fn test_encode_args_per_field_json() {
        let call = Page {
            args: PageArgs {
                cursor: "abc".to_string(),
                num_items: Int64(-1),
            },
        };
        let encoded = encode_args(&call).expect("Failed to encode");
        assert_eq!(encoded["cursor"], "\"abc\"");
        assert_eq!(encoded["numItems"], r#"{"$integer":"//////////8="}"#);
    }

    #[test]
    fn test_encode_empty_args() {
        let encoded = encode_args(&List).expect("Failed to encode");
        assert!(encoded.is_empty());
    }

    #[test]
    fn test_encode_non_object_args() {
        let err = encode_args(&Broken).expect_err("string args must be rejected");
        assert!(matches!(
            err,
            Error::ArgsNotObject {
                identifier: "broken.js:call",
                found: "string"
            }
        ));
    }

    #[test]
    fn test_encode_value() {
        assert_eq!(encode_value(&vec![1, 2]).expect("Failed to encode"), "[1,2]");
    }
}
