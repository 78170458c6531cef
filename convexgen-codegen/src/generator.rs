//! Artifact emission.
//!
//! [`Generator`] renders a [`NamespaceTree`] into a single Rust source file:
//! one `pub mod api` holding a module per container and a struct per
//! function. The file is meant to be pulled in with `include!`.

use crate::error::CodegenError;
use crate::namespace::{Namespace, NamespaceTree};
use crate::naming::{dedupe_ident, field_name, ident, type_name, unraw};
use proc_macro2::TokenStream;
use quote::quote;
use std::collections::HashSet;
use tracing::debug;

/// First lines of every generated file.
pub const HEADER: &str = "// @generated by convexgen. Do not edit.\n\
// Typed bindings for the public functions of a Convex deployment.\n\n";

/// Main code generator.
pub struct Generator<'a> {
    tree: &'a NamespaceTree,
}

impl<'a> Generator<'a> {
    /// Creates a new generator for the given tree.
    #[must_use]
    pub fn new(tree: &'a NamespaceTree) -> Self {
        Self { tree }
    }

    /// Generates the complete source file.
    ///
    /// # Errors
    /// Returns `CodegenError::Syntax` if the emitted tokens do not form a
    /// valid file.
    pub fn generate(&self) -> Result<String, CodegenError> {
        let source = format_tokens(self.tokens())?;
        debug!(
            functions = self.tree.function_count(),
            bytes = source.len(),
            "generated bindings"
        );
        Ok(format!("{HEADER}{source}"))
    }

    /// Returns the token stream of the whole file.
    #[must_use]
    pub fn tokens(&self) -> TokenStream {
        let root = &self.tree.root;
        let module = ident(&field_name(&root.name));
        let body = render_namespace(root);
        quote! {
            #[allow(dead_code, non_camel_case_types, non_snake_case, clippy::all)]
            pub mod #module {
                #body
            }
        }
    }
}

/// Renders the items of one namespace.
///
/// Names are resolved per namespace: function structs first, then container
/// modules, then the type module of each function. A type module that clashes
/// with a taken name gets a `_fn` suffix.
fn render_namespace(namespace: &Namespace) -> TokenStream {
    let mut used = HashSet::new();
    let structs: Vec<String> = namespace
        .functions
        .iter()
        .map(|function| dedupe_ident(&type_name(&function.name), &mut used))
        .collect();
    let containers: Vec<String> = namespace
        .namespaces
        .iter()
        .map(|child| dedupe_ident(&field_name(&child.name), &mut used))
        .collect();

    let functions = namespace.functions.iter().zip(&structs).map(|(function, name)| {
        let module = field_name(&function.name);
        let module = if used.contains(unraw(&module)) {
            dedupe_ident(&format!("{}_fn", unraw(&module)), &mut used)
        } else {
            dedupe_ident(&module, &mut used)
        };
        function.render(name, &module)
    });
    let functions: Vec<TokenStream> = functions.collect();

    let children = namespace.namespaces.iter().zip(&containers).map(|(child, name)| {
        let module = ident(name);
        let body = render_namespace(child);
        quote! {
            pub mod #module {
                #body
            }
        }
    });

    quote! {
        #(#functions)*
        #(#children)*
    }
}

/// Parses tokens as a file and pretty-prints them.
///
/// # Errors
/// Returns `CodegenError::Syntax` if the tokens do not form a valid file.
pub fn format_tokens(tokens: TokenStream) -> Result<String, CodegenError> {
    let file: syn::File = syn::parse2(tokens)?;
    Ok(prettyplease::unparse(&file))
}
