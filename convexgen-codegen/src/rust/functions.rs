//! Function binding generation.
//!
//! Each public function becomes a struct implementing
//! `convexgen_core::ConvexFunction`, next to a module holding its argument
//! and output types.

use crate::naming::ident;
use crate::rust::types::{Scope, TypeInfo, TypeSynthesizer};
use convexgen_schema::{FunctionDescriptor, FunctionKind, TypeNode};
use proc_macro2::TokenStream;
use quote::quote;

/// Context name of argument types.
pub const ARGS_TYPE: &str = "Args";
/// Context name of output types.
pub const OUTPUT_TYPE: &str = "Output";

/// A typed binding for one function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionBinding {
    /// Last path segment, capitalized.
    pub name: String,
    /// Full function identifier.
    pub identifier: String,
    /// Function kind.
    pub kind: FunctionKind,
    /// Argument type; `None` when the function takes no arguments.
    pub args: Option<TypeInfo>,
    /// Output type.
    pub output: TypeInfo,
}

impl FunctionBinding {
    /// Synthesizes the binding for `descriptor`.
    ///
    /// `any` arguments and empty argument objects both mean "no arguments".
    #[must_use]
    pub fn synthesize(name: impl Into<String>, descriptor: &FunctionDescriptor) -> Self {
        let mut scope = Scope::default();
        let args = match &descriptor.args {
            TypeNode::Any => None,
            TypeNode::Object { value } if value.is_empty() => None,
            node => Some(TypeSynthesizer::for_args().synthesize_in(node, ARGS_TYPE, &mut scope)),
        };
        let output = TypeSynthesizer::new().synthesize_in(&descriptor.returns, OUTPUT_TYPE, &mut scope);

        Self {
            name: name.into(),
            identifier: descriptor.identifier.clone(),
            kind: descriptor.kind,
            args,
            output,
        }
    }

    /// Returns true if the function takes arguments.
    #[must_use]
    pub const fn has_args(&self) -> bool {
        self.args.is_some()
    }

    /// Renders the binding struct named `struct_name` and its type module
    /// named `module`.
    #[must_use]
    pub fn render(&self, struct_name: &str, module: &str) -> TokenStream {
        let name = ident(struct_name);
        let identifier = &self.identifier;
        let kind = ident(self.kind.as_str());
        let doc = format!(
            " `{identifier}` ({}).",
            self.kind.as_str().to_ascii_lowercase()
        );
        let output = self.output.type_ref.in_module(module).to_tokens();

        let binding = match &self.args {
            None => quote! {
                #[doc = #doc]
                #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
                pub struct #name;

                impl ::convexgen_core::ConvexFunction for #name {
                    type Args = ::convexgen_core::EmptyArgs;
                    type Output = #output;
                    const IDENTIFIER: &'static str = #identifier;
                    const KIND: ::convexgen_core::FunctionKind = ::convexgen_core::FunctionKind::#kind;

                    fn args(&self) -> &Self::Args {
                        &::convexgen_core::EmptyArgs {}
                    }
                }
            },
            Some(args) => {
                let args = args.type_ref.in_module(module).to_tokens();
                quote! {
                    #[doc = #doc]
                    #[derive(Debug, Clone, PartialEq)]
                    pub struct #name {
                        pub args: #args,
                    }

                    impl #name {
                        /// Creates a call with the given arguments.
                        #[must_use]
                        pub fn new(args: #args) -> Self {
                            Self { args }
                        }
                    }

                    impl ::std::convert::From<#args> for #name {
                        fn from(args: #args) -> Self {
                            Self { args }
                        }
                    }

                    impl ::convexgen_core::ConvexFunction for #name {
                        type Args = #args;
                        type Output = #output;
                        const IDENTIFIER: &'static str = #identifier;
                        const KIND: ::convexgen_core::FunctionKind = ::convexgen_core::FunctionKind::#kind;

                        fn args(&self) -> &Self::Args {
                            &self.args
                        }
                    }
                }
            }
        };

        let defs: Vec<TokenStream> = self
            .args
            .iter()
            .chain(std::iter::once(&self.output))
            .filter_map(|info| info.definition.as_ref())
            .map(|def| def.render())
            .collect();
        let types = (!defs.is_empty()).then(|| {
            let module = ident(module);
            quote! {
                pub mod #module {
                    #(#defs)*
                }
            }
        });

        quote! {
            #binding
            #types
        }
    }
}
