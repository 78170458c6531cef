//! Literal enum generation.

use crate::naming::{dedupe_ident, ident, literal_to_enum_member, type_name};
use crate::rust::types::{RustType, Scope, TypeDef, TypeInfo, serde_derives};
use proc_macro2::TokenStream;
use quote::quote;
use std::collections::HashSet;

/// One member of a literal enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    /// Rust variant name.
    pub ident: String,
    /// Literal value on the wire.
    pub value: String,
}

/// An enum over a fixed set of literal values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDef {
    /// Type name.
    pub name: String,
    /// Members in declaration order; the first is the default.
    pub members: Vec<EnumMember>,
}

impl EnumDef {
    /// Builds the enum for `values` and claims its name in `scope`.
    ///
    /// Repeated values collapse into one member; member names that collide
    /// after sanitization get `_1`, `_2`, ... suffixes.
    pub fn synthesize(values: &[String], context: &str, scope: &mut Scope) -> TypeInfo {
        let name = scope.claim(&type_name(context));
        let mut seen = HashSet::new();
        let mut used = HashSet::new();
        let members = values
            .iter()
            .filter(|value| seen.insert(value.as_str()))
            .map(|value| EnumMember {
                ident: dedupe_ident(&literal_to_enum_member(value), &mut used),
                value: value.clone(),
            })
            .collect();

        let def = Self {
            name: name.clone(),
            members,
        };
        TypeInfo::defined(RustType::named(name), TypeDef::Enum(def))
    }

    /// Returns the member values in order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|member| member.value.as_str())
    }

    /// Renders the enum.
    #[must_use]
    pub fn render(&self) -> TokenStream {
        let name = ident(&self.name);
        let derives = serde_derives(&quote!(Copy, Eq, Hash, Default,));
        let members = self.members.iter().enumerate().map(|(index, member)| {
            let variant = ident(&member.ident);
            let value = &member.value;
            let default = (index == 0).then(|| quote!(#[default]));
            quote! {
                #default
                #[serde(rename = #value)]
                #variant
            }
        });

        quote! {
            #derives
            pub enum #name {
                #(#members,)*
            }
        }
    }
}
