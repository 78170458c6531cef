//! Union strategy resolution and union enum generation.
//!
//! A union of validator types maps onto one of a few Rust shapes, picked by
//! [`classify`]:
//!
//! | Members                                 | Rust type                          |
//! |-----------------------------------------|------------------------------------|
//! | literals only                           | literal enum                       |
//! | literals and `null`                     | `Nullable<Enum>`                   |
//! | one type and `null`                     | `Nullable<T>`                      |
//! | objects sharing a literal field         | `#[serde(tag = "...")]` enum       |
//! | the same, plus non-object members       | tagged enum, untagged fallbacks    |
//! | other objects, primitives               | `#[serde(untagged)]` enum          |
//! | anything degenerate                     | `serde_json::Value`                |

use crate::naming::{dedupe_ident, ident, module_name, type_name};
use crate::rust::enums::EnumDef;
use crate::rust::types::{
    FieldDef, RustType, Scope, TypeDef, TypeInfo, TypeSynthesizer, render_nested, serde_derives,
};
use convexgen_schema::{ObjectField, TypeNode};
use indexmap::IndexMap;
use proc_macro2::TokenStream;
use quote::quote;
use std::collections::HashSet;

/// How a union is represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnionStrategy {
    /// Only literals, optionally with `null`.
    LiteralEnum {
        /// Whether `null` is a member.
        nullable: bool,
    },
    /// Exactly two members, one of them `null`.
    NullableWrapper,
    /// At least one object member.
    ObjectUnion,
    /// Several non-object members.
    PrimitiveUnion,
    /// Nothing better applies.
    Untyped,
}

/// Picks the representation for a union.
#[must_use]
pub fn classify(members: &[TypeNode]) -> UnionStrategy {
    let has_null = members.iter().any(TypeNode::is_null);
    let mut non_null = members.iter().filter(|member| !member.is_null()).peekable();

    if non_null.peek().is_some() && non_null.all(|member| member.as_literal().is_some()) {
        UnionStrategy::LiteralEnum { nullable: has_null }
    } else if members.len() == 2 && has_null {
        UnionStrategy::NullableWrapper
    } else if members.iter().any(TypeNode::is_object) {
        UnionStrategy::ObjectUnion
    } else if members.len() > 1 {
        UnionStrategy::PrimitiveUnion
    } else {
        UnionStrategy::Untyped
    }
}

/// Finds the field that tells object members apart.
///
/// Candidates are the fields present in every object, in the first object's
/// field order. The first one holding a literal in every object, with all
/// literals distinct, wins.
#[must_use]
pub fn detect_discriminator(objects: &[&IndexMap<String, ObjectField>]) -> Option<String> {
    let (first, rest) = objects.split_first()?;
    if rest.is_empty() {
        return None;
    }

    first.keys().find_map(|key| {
        let mut seen = HashSet::new();
        objects
            .iter()
            .all(|object| {
                object
                    .get(key)
                    .and_then(|field| field.field_type.as_literal())
                    .is_some_and(|literal| seen.insert(literal))
            })
            .then(|| key.clone())
    })
}

/// Shape of one union variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantShape {
    /// `Null`, matching JSON `null`.
    Unit,
    /// Newtype over a single value.
    Newtype(RustType),
    /// Object member.
    Struct(Vec<FieldDef>),
}

/// One variant of a union enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionVariant {
    /// Rust variant name.
    pub ident: String,
    /// Tag value, for tagged unions.
    pub rename: Option<String>,
    /// Matched by shape inside a tagged union.
    pub untagged: bool,
    /// Payload.
    pub shape: VariantShape,
}

impl UnionVariant {
    fn in_module(mut self, module: &str) -> Self {
        self.shape = match self.shape {
            VariantShape::Unit => VariantShape::Unit,
            VariantShape::Newtype(ty) => VariantShape::Newtype(ty.in_module(module)),
            VariantShape::Struct(fields) => VariantShape::Struct(
                fields.into_iter().map(|f| f.in_module(module)).collect(),
            ),
        };
        self
    }

    fn render(&self) -> TokenStream {
        let name = ident(&self.ident);
        let rename = match (&self.rename, self.untagged) {
            (_, true) => Some(quote!(#[serde(untagged)])),
            (Some(value), false) => Some(quote!(#[serde(rename = #value)])),
            (None, false) => None,
        };
        let body = match &self.shape {
            VariantShape::Unit => quote!(),
            VariantShape::Newtype(ty) => {
                let ty = ty.to_tokens();
                quote!((#ty))
            }
            VariantShape::Struct(fields) => {
                let fields = fields.iter().map(|field| field.render(false));
                quote!({ #(#fields,)* })
            }
        };
        quote! {
            #rename
            #name #body
        }
    }
}

/// A union enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionDef {
    /// Type name.
    pub name: String,
    /// Discriminator field; `None` means untagged.
    pub tag: Option<String>,
    /// Variants in member order.
    pub variants: Vec<UnionVariant>,
    /// Definitions used by the variants.
    pub nested: Vec<TypeDef>,
    /// Module holding `nested`.
    pub module: Option<String>,
}

impl UnionDef {
    /// Renders the enum and its nested module.
    #[must_use]
    pub fn render(&self) -> TokenStream {
        let name = ident(&self.name);
        let derives = serde_derives(&quote!());
        let representation = match &self.tag {
            Some(tag) => quote!(#[serde(tag = #tag)]),
            None => quote!(#[serde(untagged)]),
        };
        let variants = self.variants.iter().map(UnionVariant::render);
        let nested = render_nested(self.module.as_deref(), &self.nested);

        quote! {
            #derives
            #representation
            pub enum #name {
                #(#variants,)*
            }

            #nested
        }
    }
}

/// Variant name for an untagged member.
fn untagged_variant_name(member: &TypeNode, index: usize) -> String {
    match member {
        TypeNode::Null => "Null".to_string(),
        TypeNode::String => "StringValue".to_string(),
        TypeNode::Int64 => "IntValue".to_string(),
        TypeNode::Float64 => "DoubleValue".to_string(),
        TypeNode::Bool => "BoolValue".to_string(),
        TypeNode::Array { .. } => "ArrayValue".to_string(),
        TypeNode::Id { .. } => "IdValue".to_string(),
        TypeNode::Bytes => "BytesValue".to_string(),
        _ => format!("Variant{index}"),
    }
}

impl TypeSynthesizer {
    /// Synthesizes a union node.
    pub(crate) fn synthesize_union(
        &self,
        members: &[TypeNode],
        context: &str,
        scope: &mut Scope,
    ) -> TypeInfo {
        match classify(members) {
            UnionStrategy::LiteralEnum { nullable } => {
                let values: Vec<String> = members
                    .iter()
                    .filter_map(TypeNode::as_literal)
                    .map(str::to_string)
                    .collect();
                let info = EnumDef::synthesize(&values, context, scope);
                if nullable { info.into_nullable() } else { info }
            }
            UnionStrategy::NullableWrapper => {
                let other = members
                    .iter()
                    .find(|member| !member.is_null())
                    .unwrap_or(&TypeNode::Null);
                self.synthesize_in(other, context, scope).into_nullable()
            }
            UnionStrategy::ObjectUnion => self.synthesize_object_union(members, context, scope),
            UnionStrategy::PrimitiveUnion => self.synthesize_untagged(members, context, scope),
            UnionStrategy::Untyped => TypeInfo::plain(RustType::Any),
        }
    }

    /// Objects with a discriminator become tagged variants; other non-null
    /// members follow as untagged variants, tried when no tag matches.
    fn synthesize_object_union(
        &self,
        members: &[TypeNode],
        context: &str,
        scope: &mut Scope,
    ) -> TypeInfo {
        let objects: Vec<&IndexMap<String, ObjectField>> =
            members.iter().filter_map(TypeNode::as_object).collect();
        let Some(tag) = detect_discriminator(&objects) else {
            return self.synthesize_untagged(members, context, scope);
        };

        let name = scope.claim(&type_name(context));
        let mut inner = Scope::default();
        let mut used = HashSet::new();
        let mut variants = Vec::with_capacity(members.len());
        let mut fallbacks = Vec::new();
        let mut nested = Vec::new();

        for (index, member) in members.iter().enumerate() {
            match member {
                TypeNode::Null => {}
                TypeNode::Object { value } => {
                    let literal = value
                        .get(&tag)
                        .and_then(|field| field.field_type.as_literal())
                        .unwrap_or_default();
                    let variant = dedupe_ident(&type_name(literal), &mut used);
                    inner.set_owner(Some(&variant));
                    let (fields, defs) = self.synthesize_fields(value, Some(&tag), &mut inner);
                    nested.extend(defs);
                    variants.push(UnionVariant {
                        ident: variant,
                        rename: Some(literal.to_string()),
                        untagged: false,
                        shape: VariantShape::Struct(fields),
                    });
                }
                other => {
                    let variant = dedupe_ident(&untagged_variant_name(other, index), &mut used);
                    inner.set_owner(Some(&variant));
                    let info = self.synthesize_in(other, &variant, &mut inner);
                    nested.extend(info.definition);
                    fallbacks.push(UnionVariant {
                        ident: variant,
                        rename: None,
                        untagged: true,
                        shape: VariantShape::Newtype(info.type_ref),
                    });
                }
            }
        }
        // serde only accepts untagged variants after all tagged ones.
        variants.extend(fallbacks);

        let info = finish_union(name, Some(tag), variants, nested, scope);
        if members.iter().any(TypeNode::is_null) {
            info.into_nullable()
        } else {
            info
        }
    }

    fn synthesize_untagged(
        &self,
        members: &[TypeNode],
        context: &str,
        scope: &mut Scope,
    ) -> TypeInfo {
        let name = scope.claim(&type_name(context));
        let mut inner = Scope::default();
        let mut used = HashSet::new();
        let mut variants = Vec::with_capacity(members.len());
        let mut nested = Vec::new();

        for (index, member) in members.iter().enumerate() {
            let variant = dedupe_ident(&untagged_variant_name(member, index), &mut used);
            inner.set_owner(Some(&variant));
            let shape = match member {
                TypeNode::Null => VariantShape::Unit,
                TypeNode::Object { value } => {
                    let (fields, defs) = self.synthesize_fields(value, None, &mut inner);
                    nested.extend(defs);
                    VariantShape::Struct(fields)
                }
                other => {
                    let info = self.synthesize_in(other, &variant, &mut inner);
                    nested.extend(info.definition);
                    VariantShape::Newtype(info.type_ref)
                }
            };
            variants.push(UnionVariant {
                ident: variant,
                rename: None,
                untagged: false,
                shape,
            });
        }

        finish_union(name, None, variants, nested, scope)
    }
}

fn finish_union(
    name: String,
    tag: Option<String>,
    variants: Vec<UnionVariant>,
    nested: Vec<TypeDef>,
    scope: &mut Scope,
) -> TypeInfo {
    let module = (!nested.is_empty()).then(|| scope.claim(&module_name(&name)));
    let variants = match &module {
        Some(module) => variants.into_iter().map(|v| v.in_module(module)).collect(),
        None => variants,
    };
    let def = UnionDef {
        name: name.clone(),
        tag,
        variants,
        nested,
        module,
    };
    TypeInfo::defined(RustType::named(name), TypeDef::Union(def))
}
