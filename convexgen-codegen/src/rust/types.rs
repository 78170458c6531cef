//! Type synthesis and struct generation.
//!
//! [`TypeSynthesizer`] walks a [`TypeNode`] tree and produces a [`TypeInfo`]:
//! the Rust type to write at the use site plus any definition (struct, enum,
//! union) that type needs. Definitions nest: the types used by the fields of
//! a struct live in a child module named after the struct, so a field typed
//! by a nested object reads `args::Address`.

use crate::naming::{
    capitalize, dedupe_ident, field_name, ident, module_name, type_name, unraw,
};
use crate::rust::enums::EnumDef;
use crate::rust::unions::UnionDef;
use convexgen_schema::{ObjectField, TypeNode};
use indexmap::IndexMap;
use proc_macro2::TokenStream;
use quote::quote;
use std::collections::HashSet;

/// A Rust type as written at a use site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RustType {
    /// `String`, also used for document ids.
    String,
    /// `bool`.
    Bool,
    /// `convexgen_core::Int64`.
    Int64,
    /// `convexgen_core::Float64`.
    Float64,
    /// `convexgen_core::Bytes`.
    Bytes,
    /// `serde_json::Value`, the open type.
    Any,
    /// `()`, the explicit null.
    Unit,
    /// A generated type, as a path relative to the current module.
    Named(Vec<String>),
    /// `Vec<T>`.
    Vec(Box<RustType>),
    /// `BTreeMap<String, T>`.
    Map(Box<RustType>),
    /// `Option<T>`, an omittable field.
    Option(Box<RustType>),
    /// `Nullable<T>`, a value that may be an explicit null.
    Nullable(Box<RustType>),
}

impl RustType {
    /// Creates a reference to a generated type in the current module.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(vec![name.into()])
    }

    /// Returns this type as seen from the parent of `module`.
    #[must_use]
    pub fn in_module(&self, module: &str) -> Self {
        match self {
            Self::Named(path) => {
                let mut qualified = Vec::with_capacity(path.len() + 1);
                qualified.push(module.to_string());
                qualified.extend(path.iter().cloned());
                Self::Named(qualified)
            }
            Self::Vec(inner) => Self::Vec(Box::new(inner.in_module(module))),
            Self::Map(inner) => Self::Map(Box::new(inner.in_module(module))),
            Self::Option(inner) => Self::Option(Box::new(inner.in_module(module))),
            Self::Nullable(inner) => Self::Nullable(Box::new(inner.in_module(module))),
            other => other.clone(),
        }
    }

    /// Renders the type with fully qualified standard paths.
    #[must_use]
    pub fn to_tokens(&self) -> TokenStream {
        match self {
            Self::String => quote!(::std::string::String),
            Self::Bool => quote!(bool),
            Self::Int64 => quote!(::convexgen_core::Int64),
            Self::Float64 => quote!(::convexgen_core::Float64),
            Self::Bytes => quote!(::convexgen_core::Bytes),
            Self::Any => quote!(::convexgen_core::serde_json::Value),
            Self::Unit => quote!(()),
            Self::Named(path) => {
                let segments = path.iter().map(|segment| ident(segment));
                quote!(#(#segments)::*)
            }
            Self::Vec(inner) => {
                let inner = inner.to_tokens();
                quote!(::std::vec::Vec<#inner>)
            }
            Self::Map(inner) => {
                let inner = inner.to_tokens();
                quote!(::std::collections::BTreeMap<::std::string::String, #inner>)
            }
            Self::Option(inner) => {
                let inner = inner.to_tokens();
                quote!(::std::option::Option<#inner>)
            }
            Self::Nullable(inner) => {
                let inner = inner.to_tokens();
                quote!(::convexgen_core::Nullable<#inner>)
            }
        }
    }
}

/// Result of synthesizing one type node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    /// Type to write at the use site.
    pub type_ref: RustType,
    /// Definition the reference needs, if any.
    pub definition: Option<TypeDef>,
    /// True if the value is a union with `null`, rendered as `Nullable<T>`.
    pub nullable_union: bool,
    /// The non-null type of a nullable union.
    pub inner: Option<RustType>,
}

impl TypeInfo {
    /// A type that needs no definition.
    #[must_use]
    pub const fn plain(type_ref: RustType) -> Self {
        Self {
            type_ref,
            definition: None,
            nullable_union: false,
            inner: None,
        }
    }

    /// A type together with its definition.
    #[must_use]
    pub const fn defined(type_ref: RustType, definition: TypeDef) -> Self {
        Self {
            type_ref,
            definition: Some(definition),
            nullable_union: false,
            inner: None,
        }
    }

    /// Wraps this type as a nullable union.
    #[must_use]
    pub fn into_nullable(self) -> Self {
        Self {
            type_ref: RustType::Nullable(Box::new(self.type_ref.clone())),
            definition: self.definition,
            nullable_union: true,
            inner: Some(self.type_ref),
        }
    }

    /// Returns the generated type name, if the reference is a plain name.
    #[must_use]
    pub fn defined_name(&self) -> Option<&str> {
        match &self.type_ref {
            RustType::Named(path) if path.len() == 1 => Some(&path[0]),
            _ => None,
        }
    }

    /// True if a missing builder value can fall back to `Default`.
    #[must_use]
    pub fn has_natural_default(&self) -> bool {
        match &self.type_ref {
            RustType::Vec(_) | RustType::Map(_) | RustType::Nullable(_) | RustType::Unit => true,
            RustType::Named(_) => matches!(self.definition, Some(TypeDef::Enum(_))),
            _ => false,
        }
    }
}

/// A generated definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDef {
    /// Object type.
    Struct(StructDef),
    /// Enum of literal values.
    Enum(EnumDef),
    /// Union of object or primitive members.
    Union(UnionDef),
}

impl TypeDef {
    /// Returns the defined type name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Struct(def) => &def.name,
            Self::Enum(def) => &def.name,
            Self::Union(def) => &def.name,
        }
    }

    /// Renders the definition and its nested module.
    #[must_use]
    pub fn render(&self) -> TokenStream {
        match self {
            Self::Struct(def) => def.render(),
            Self::Enum(def) => def.render(),
            Self::Union(def) => def.render(),
        }
    }
}

/// A field of a struct or of a struct-like union variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Rust identifier.
    pub ident: String,
    /// Key on the wire.
    pub wire_name: String,
    /// Declared field type, `Option<_>` included.
    pub ty: RustType,
    /// Type a builder setter accepts.
    pub value: RustType,
    /// Whether the field may be omitted.
    pub optional: bool,
    /// Whether the value is a nullable union.
    pub nullable_union: bool,
    /// Non-null type of a nullable union.
    pub inner: Option<RustType>,
    /// Whether a builder may default the field.
    pub has_default: bool,
}

impl FieldDef {
    fn from_info(ident: String, wire_name: &str, optional: bool, info: &TypeInfo) -> Self {
        let ty = if optional {
            RustType::Option(Box::new(info.type_ref.clone()))
        } else {
            info.type_ref.clone()
        };
        Self {
            ident,
            wire_name: wire_name.to_string(),
            ty,
            value: info.type_ref.clone(),
            optional,
            nullable_union: info.nullable_union,
            inner: info.inner.clone(),
            has_default: !optional && info.has_natural_default(),
        }
    }

    /// Qualifies the field's types with the nested module.
    #[must_use]
    pub fn in_module(mut self, module: &str) -> Self {
        self.ty = self.ty.in_module(module);
        self.value = self.value.in_module(module);
        self.inner = self.inner.map(|inner| inner.in_module(module));
        self
    }

    /// Renders the field declaration; `public` adds `pub`.
    #[must_use]
    pub fn render(&self, public: bool) -> TokenStream {
        let name = ident(&self.ident);
        let ty = self.ty.to_tokens();
        let mut args = Vec::new();
        if unraw(&self.ident) != self.wire_name {
            let wire = &self.wire_name;
            args.push(quote!(rename = #wire));
        }
        if self.optional {
            args.push(quote!(default));
            args.push(quote!(skip_serializing_if = "::std::option::Option::is_none"));
            if self.nullable_union {
                args.push(quote!(
                    deserialize_with = "::convexgen_core::nullable::deserialize_some"
                ));
            }
        }
        let attrs = (!args.is_empty()).then(|| quote!(#[serde(#(#args),*)]));
        let vis = public.then(|| quote!(pub));
        quote! {
            #attrs
            #vis #name: #ty
        }
    }
}

/// Names taken in one module.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    used: HashSet<String>,
    owner: Option<String>,
}

impl Scope {
    /// Claims a unique name derived from `name`.
    ///
    /// With an owner set, a type name that is already taken is first retried
    /// as `<Owner><Name>`, so union variants keep readable type names.
    pub fn claim(&mut self, name: &str) -> String {
        let bare = unraw(name);
        let is_type = bare.starts_with(|c: char| c.is_ascii_uppercase());
        if let Some(owner) = self.owner.as_deref().filter(|_| is_type) {
            let qualified = format!("{owner}{bare}");
            if self.used.contains(bare) && !self.used.contains(&qualified) {
                self.used.insert(qualified.clone());
                return qualified;
            }
        }
        dedupe_ident(name, &mut self.used)
    }

    /// Sets the name used to qualify colliding type names.
    pub fn set_owner(&mut self, owner: Option<&str>) {
        self.owner = owner.map(|owner| unraw(owner).to_string());
    }
}

/// Object type definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDef {
    /// Type name.
    pub name: String,
    /// Fields in declaration order.
    pub fields: Vec<FieldDef>,
    /// Definitions used by the fields.
    pub nested: Vec<TypeDef>,
    /// Module holding `nested`.
    pub module: Option<String>,
    /// Builder type name, for argument types.
    pub builder: Option<String>,
}

impl StructDef {
    /// Renders the struct, its builder and its nested module.
    #[must_use]
    pub fn render(&self) -> TokenStream {
        let name = ident(&self.name);
        let fields = self.fields.iter().map(|field| field.render(true));
        let builder = self.render_builder();
        let nested = render_nested(self.module.as_deref(), &self.nested);
        let derives = serde_derives(&quote!());

        quote! {
            #derives
            pub struct #name {
                #(#fields,)*
            }

            #builder
            #nested
        }
    }

    fn render_builder(&self) -> Option<TokenStream> {
        let builder_name = self.builder.as_deref()?;
        let builder = ident(builder_name);
        let name = ident(&self.name);
        let type_label = unraw(&self.name);

        let mut setters_used = HashSet::from(["build".to_string()]);
        let mut slots = Vec::with_capacity(self.fields.len());
        let mut setters = Vec::with_capacity(self.fields.len());
        let mut assigns = Vec::with_capacity(self.fields.len());

        for field in &self.fields {
            let slot = ident(&field.ident);
            let storage = if field.optional {
                field.ty.to_tokens()
            } else {
                RustType::Option(Box::new(field.ty.clone())).to_tokens()
            };
            slots.push(quote!(#slot: #storage));

            let setter = ident(&dedupe_ident(&field.ident, &mut setters_used));
            let doc = format!(" Sets `{}`.", field.wire_name);
            setters.push(match &field.inner {
                Some(inner) if field.nullable_union => {
                    let inner = inner.to_tokens();
                    quote! {
                        #[doc = #doc]
                        #[must_use]
                        pub fn #setter(mut self, value: ::std::option::Option<#inner>) -> Self {
                            self.#slot = ::std::option::Option::Some(::convexgen_core::Nullable(value));
                            self
                        }
                    }
                }
                _ => {
                    let value = field.value.to_tokens();
                    quote! {
                        #[doc = #doc]
                        #[must_use]
                        pub fn #setter(mut self, value: impl ::std::convert::Into<#value>) -> Self {
                            self.#slot = ::std::option::Option::Some(value.into());
                            self
                        }
                    }
                }
            });

            let wire = &field.wire_name;
            assigns.push(if field.optional {
                quote!(#slot: self.#slot)
            } else if field.has_default {
                quote!(#slot: self.#slot.unwrap_or_default())
            } else {
                quote! {
                    #slot: self.#slot.ok_or(
                        ::convexgen_core::BuildError::missing_field(#type_label, #wire),
                    )?
                }
            });
        }

        let build_doc = format!(" Builds a `{type_label}`, failing on a missing required field.");
        Some(quote! {
            impl #name {
                /// Returns a builder with every field unset.
                #[must_use]
                pub fn builder() -> #builder {
                    <#builder as ::std::default::Default>::default()
                }
            }

            #[derive(Debug, Clone, Default)]
            pub struct #builder {
                #(#slots,)*
            }

            impl #builder {
                #(#setters)*

                #[doc = #build_doc]
                pub fn build(self) -> ::std::result::Result<#name, ::convexgen_core::BuildError> {
                    ::std::result::Result::Ok(#name {
                        #(#assigns,)*
                    })
                }
            }
        })
    }
}

/// Renders `pub mod <module> { ... }` around nested definitions.
pub(crate) fn render_nested(module: Option<&str>, nested: &[TypeDef]) -> Option<TokenStream> {
    let module = ident(module?);
    let defs = nested.iter().map(TypeDef::render);
    Some(quote! {
        pub mod #module {
            #(#defs)*
        }
    })
}

/// Derive and serde attributes shared by generated data types.
pub(crate) fn serde_derives(extra: &TokenStream) -> TokenStream {
    quote! {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            #extra
            ::convexgen_core::serde::Serialize,
            ::convexgen_core::serde::Deserialize,
        )]
        #[serde(crate = "::convexgen_core::serde")]
    }
}

/// Maps type nodes to Rust types and definitions.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeSynthesizer {
    builders: bool,
}

impl TypeSynthesizer {
    /// Creates a synthesizer that emits no builders.
    #[must_use]
    pub const fn new() -> Self {
        Self { builders: false }
    }

    /// Creates a synthesizer for argument types, with builders.
    #[must_use]
    pub const fn for_args() -> Self {
        Self { builders: true }
    }

    /// Synthesizes `node` into a fresh module scope.
    #[must_use]
    pub fn synthesize(&self, node: &TypeNode, context: &str) -> TypeInfo {
        self.synthesize_in(node, context, &mut Scope::default())
    }

    /// Synthesizes `node`, claiming definition names in `scope`.
    ///
    /// `context` names the definition, if one is needed.
    pub fn synthesize_in(&self, node: &TypeNode, context: &str, scope: &mut Scope) -> TypeInfo {
        match node {
            TypeNode::Id { .. } | TypeNode::String => TypeInfo::plain(RustType::String),
            TypeNode::Null => TypeInfo::plain(RustType::Unit),
            TypeNode::Int64 => TypeInfo::plain(RustType::Int64),
            TypeNode::Float64 => TypeInfo::plain(RustType::Float64),
            TypeNode::Bool => TypeInfo::plain(RustType::Bool),
            TypeNode::Bytes => TypeInfo::plain(RustType::Bytes),
            TypeNode::Any => TypeInfo::plain(RustType::Any),
            TypeNode::Array { value } => {
                let element = self.synthesize_in(value, context, scope);
                TypeInfo {
                    type_ref: RustType::Vec(Box::new(element.type_ref)),
                    definition: element.definition,
                    nullable_union: false,
                    inner: None,
                }
            }
            TypeNode::Record { values, .. } => {
                let value = self.synthesize_in(&values.field_type, context, scope);
                let value_ref = if values.optional {
                    RustType::Option(Box::new(value.type_ref))
                } else {
                    value.type_ref
                };
                TypeInfo {
                    type_ref: RustType::Map(Box::new(value_ref)),
                    definition: value.definition,
                    nullable_union: false,
                    inner: None,
                }
            }
            TypeNode::Object { value } => self.synthesize_object(value, context, scope),
            TypeNode::Literal { value } => {
                EnumDef::synthesize(std::slice::from_ref(value), context, scope)
            }
            TypeNode::Union { value } => self.synthesize_union(value, context, scope),
        }
    }

    fn synthesize_object(
        &self,
        fields: &IndexMap<String, ObjectField>,
        context: &str,
        scope: &mut Scope,
    ) -> TypeInfo {
        let name = scope.claim(&type_name(context));
        let builder = self
            .builders
            .then(|| scope.claim(&format!("{}Builder", unraw(&name))));

        let mut inner = Scope::default();
        let (fields, nested) = self.synthesize_fields(fields, None, &mut inner);
        let module = (!nested.is_empty()).then(|| scope.claim(&module_name(&name)));
        let fields = match &module {
            Some(module) => fields.into_iter().map(|f| f.in_module(module)).collect(),
            None => fields,
        };

        let def = StructDef {
            name: name.clone(),
            fields,
            nested,
            module,
            builder,
        };
        TypeInfo::defined(RustType::named(name), TypeDef::Struct(def))
    }

    /// Synthesizes object fields, skipping `skip`.
    ///
    /// Definitions the fields need are claimed in `scope`, the scope of the
    /// owner's nested module. Field types are left unqualified.
    pub(crate) fn synthesize_fields(
        &self,
        fields: &IndexMap<String, ObjectField>,
        skip: Option<&str>,
        scope: &mut Scope,
    ) -> (Vec<FieldDef>, Vec<TypeDef>) {
        let mut idents = HashSet::new();
        let mut defs = Vec::with_capacity(fields.len());
        let mut nested = Vec::new();

        for (key, field) in fields {
            if skip == Some(key.as_str()) {
                continue;
            }
            let info = self.synthesize_in(&field.field_type, &capitalize(key), scope);
            let field_ident = dedupe_ident(&field_name(key), &mut idents);
            defs.push(FieldDef::from_info(field_ident, key, field.optional, &info));
            nested.extend(info.definition);
        }
        (defs, nested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::format_tokens;

    fn address() -> TypeNode {
        TypeNode::object([
            ("street", ObjectField::required(TypeNode::String)),
            ("zip", ObjectField::optional(TypeNode::Int64)),
        ])
    }

    fn struct_def(info: &TypeInfo) -> &StructDef {
        match &info.definition {
            Some(TypeDef::Struct(def)) => def,
            other => panic!("expected struct, got {other:?}"),
        }
    }

    #[test]
    fn test_leaf_types() {
        let synth = TypeSynthesizer::new();
        let cases = [
            (TypeNode::id("users"), RustType::String),
            (TypeNode::String, RustType::String),
            (TypeNode::Null, RustType::Unit),
            (TypeNode::Int64, RustType::Int64),
            (TypeNode::Float64, RustType::Float64),
            (TypeNode::Bool, RustType::Bool),
            (TypeNode::Bytes, RustType::Bytes),
            (TypeNode::Any, RustType::Any),
        ];
        for (node, expected) in cases {
            let info = synth.synthesize(&node, "Value");
            assert_eq!(info.type_ref, expected);
            assert!(info.definition.is_none());
        }
    }

    #[test]
    fn test_synthesis_is_deterministic() {
        let node = TypeNode::object([
            ("address", ObjectField::required(address())),
            ("tags", ObjectField::required(TypeNode::array(TypeNode::String))),
        ]);
        let synth = TypeSynthesizer::for_args();
        let first = synth.synthesize(&node, "Args");
        let second = synth.synthesize(&node, "Args");
        assert_eq!(first, second);
        assert_eq!(
            first.definition.as_ref().map(|d| d.render().to_string()),
            second.definition.as_ref().map(|d| d.render().to_string())
        );
    }

    #[test]
    fn test_empty_object_emits_struct() {
        let info = TypeSynthesizer::new().synthesize(&TypeNode::object::<&str>([]), "Output");
        assert_eq!(info.type_ref, RustType::named("Output"));
        let def = struct_def(&info);
        assert!(def.fields.is_empty());

        let code = format_tokens(info.definition.as_ref().map(TypeDef::render).unwrap_or_default())
            .expect("Failed to format");
        assert!(code.contains("pub struct Output {}"), "{code}");
    }

    #[test]
    fn test_nested_object_goes_to_child_module() {
        let node = TypeNode::object([("address", ObjectField::required(address()))]);
        let info = TypeSynthesizer::new().synthesize(&node, "Args");
        let def = struct_def(&info);

        assert_eq!(def.module.as_deref(), Some("args"));
        assert_eq!(
            def.fields[0].ty,
            RustType::Named(vec!["args".into(), "Address".into()])
        );
        assert_eq!(def.nested.len(), 1);
        assert_eq!(def.nested[0].name(), "Address");
    }

    #[test]
    fn test_array_propagates_definition() {
        let info = TypeSynthesizer::new().synthesize(&TypeNode::array(address()), "Output");
        assert_eq!(
            info.type_ref,
            RustType::Vec(Box::new(RustType::named("Output")))
        );
        assert_eq!(struct_def(&info).name, "Output");
    }

    #[test]
    fn test_record_of_values() {
        let info = TypeSynthesizer::new()
            .synthesize(&TypeNode::record(ObjectField::required(TypeNode::Float64)), "Scores");
        assert_eq!(
            info.type_ref,
            RustType::Map(Box::new(RustType::Float64))
        );
    }

    #[test]
    fn test_field_names_and_renames() {
        let node = TypeNode::object([
            ("numItems", ObjectField::required(TypeNode::Int64)),
            ("type", ObjectField::required(TypeNode::String)),
            ("num-items", ObjectField::optional(TypeNode::Bool)),
        ]);
        let info = TypeSynthesizer::new().synthesize(&node, "Args");
        let idents: Vec<&str> = struct_def(&info).fields.iter().map(|f| f.ident.as_str()).collect();
        assert_eq!(idents, ["num_items", "r#type", "num_items_1"]);

        let code = format_tokens(info.definition.as_ref().map(TypeDef::render).unwrap_or_default())
            .expect("Failed to format");
        assert!(code.contains("rename = \"numItems\""), "{code}");
        assert!(!code.contains("rename = \"type\""), "{code}");
    }

    #[test]
    fn test_sibling_type_names_are_deduplicated() {
        let node = TypeNode::object([
            ("item", ObjectField::required(address())),
            ("Item", ObjectField::required(address())),
        ]);
        let info = TypeSynthesizer::new().synthesize(&node, "Args");
        let names: Vec<&str> = struct_def(&info).nested.iter().map(TypeDef::name).collect();
        assert_eq!(names, ["Item", "Item_1"]);
    }

    #[test]
    fn test_optional_field_wraps_option() {
        let info = TypeSynthesizer::new().synthesize(&address(), "Address");
        let zip = &struct_def(&info).fields[1];
        assert!(zip.optional);
        assert_eq!(zip.ty, RustType::Option(Box::new(RustType::Int64)));
        assert_eq!(zip.value, RustType::Int64);
    }

    #[test]
    fn test_builder_defaults() {
        let node = TypeNode::object([
            ("name", ObjectField::required(TypeNode::String)),
            ("tags", ObjectField::required(TypeNode::array(TypeNode::String))),
            (
                "note",
                ObjectField::required(TypeNode::union([TypeNode::String, TypeNode::Null])),
            ),
        ]);
        let info = TypeSynthesizer::for_args().synthesize(&node, "Args");
        let def = struct_def(&info);
        assert_eq!(def.builder.as_deref(), Some("ArgsBuilder"));
        let defaults: Vec<bool> = def.fields.iter().map(|f| f.has_default).collect();
        assert_eq!(defaults, [false, true, true]);

        let code = format_tokens(info.definition.as_ref().map(TypeDef::render).unwrap_or_default())
            .expect("Failed to format");
        assert!(code.contains("pub struct ArgsBuilder"), "{code}");
        assert!(code.contains("pub fn note("), "{code}");
        assert!(code.contains("missing_field(\"Args\", \"name\")"), "{code}");
    }

    #[test]
    fn test_no_builder_for_outputs() {
        let info = TypeSynthesizer::new().synthesize(&address(), "Output");
        assert!(struct_def(&info).builder.is_none());
    }

    #[test]
    fn test_rust_type_tokens() {
        let ty = RustType::Option(Box::new(RustType::Named(vec!["args".into(), "r#type".into()])));
        assert_eq!(
            ty.to_tokens().to_string(),
            quote!(::std::option::Option<args::r#type>).to_string()
        );
    }
}
