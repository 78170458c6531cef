//! Rust code generation modules.

pub mod enums;
pub mod functions;
pub mod types;
pub mod unions;

pub use enums::{EnumDef, EnumMember};
pub use functions::FunctionBinding;
pub use types::{FieldDef, RustType, Scope, StructDef, TypeDef, TypeInfo, TypeSynthesizer};
pub use unions::{UnionDef, UnionStrategy, UnionVariant, VariantShape, classify, detect_discriminator};
