//! # convexgen codegen
//!
//! Rust binding generation from Convex function catalogs.
//!
//! This crate provides:
//! - Identifier sanitization for schema names
//! - Type synthesis: structs, literal enums, unions and builders
//! - The namespace tree of public functions
//! - Emission of one formatted source file

pub mod error;
pub mod generator;
pub mod namespace;
pub mod naming;
pub mod rust;

pub use error::CodegenError;
pub use generator::Generator;
pub use namespace::{Namespace, NamespaceTree};

use convexgen_schema::Catalog;

/// Generates Rust bindings for a catalog.
///
/// # Errors
/// Returns `CodegenError` if the emitted code does not parse.
pub fn generate(catalog: &Catalog) -> Result<String, CodegenError> {
    let tree = NamespaceTree::from_catalog(catalog);
    Generator::new(&tree).generate()
}

/// Generates Rust bindings from a JSON array of function descriptors.
///
/// # Arguments
/// * `json` - Descriptor list, as returned by `convex function-spec`
///
/// # Returns
/// Generated Rust code as a string.
///
/// # Errors
/// Returns `CodegenError` if parsing or generation fails.
pub fn generate_from_json(json: &str) -> Result<String, CodegenError> {
    let functions = convexgen_schema::parse_functions(json)?;
    generate(&Catalog::new(functions))
}

/// Generates Rust bindings from a file holding a descriptor list.
///
/// # Arguments
/// * `path` - Path to the JSON file
///
/// # Returns
/// Generated Rust code as a string.
///
/// # Errors
/// Returns `CodegenError` if reading, parsing, or generation fails.
pub fn generate_from_file(path: &std::path::Path) -> Result<String, CodegenError> {
    let json = std::fs::read_to_string(path)?;
    generate_from_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CATALOG: &str = r#"[
        {
            "functionType": "Query",
            "identifier": "tasks.js:get",
            "args": { "type": "object", "value": { "id": { "fieldType": { "type": "id", "tableName": "tasks" }, "optional": false } } },
            "returns": { "type": "string" },
            "visibility": { "kind": "public" }
        }
    ]"#;

    #[test]
    fn test_generate_from_json() {
        let code = generate_from_json(CATALOG).expect("Failed to generate");
        assert!(code.contains("pub mod tasks"), "{code}");
        assert!(code.contains("pub struct Get"), "{code}");
    }

    #[test]
    fn test_generate_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(CATALOG.as_bytes()).expect("Failed to write");
        let code = generate_from_file(file.path()).expect("Failed to generate");
        assert!(code.contains("\"tasks.js:get\""), "{code}");
    }

    #[test]
    fn test_generate_from_json_invalid() {
        let err = generate_from_json("{").expect_err("invalid JSON must fail");
        assert!(matches!(err, CodegenError::Parse(_)));
    }

    #[test]
    fn test_missing_visibility_is_not_bound() {
        let json = r#"[{
            "functionType": "Query",
            "identifier": "secret.js:leak",
            "args": { "type": "any" },
            "returns": { "type": "null" }
        }]"#;
        let err = generate_from_json(json).expect_err("descriptor without visibility must fail");
        assert!(matches!(err, CodegenError::Parse(_)));
    }
}
