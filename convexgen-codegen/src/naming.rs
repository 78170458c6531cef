//! Naming and identifier sanitization.
//!
//! Schema names (field keys, literal values, path segments) are arbitrary
//! strings. These helpers map them onto valid, collision-free Rust names.

use proc_macro2::{Ident, Span};
use std::collections::HashSet;

/// Keywords that can be written as raw identifiers.
const RAW_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe",
    "unsized", "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be raw identifiers.
const RESERVED: &[&str] = &["self", "Self", "super", "crate", "_"];

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn prefix_digit(name: String) -> String {
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{name}")
    } else {
        name
    }
}

/// Replaces every character outside `[A-Za-z0-9_]` with `_`.
///
/// Empty input becomes `_empty`; a leading digit gets a `_` prefix.
#[must_use]
pub fn sanitize_field(name: &str) -> String {
    if name.is_empty() {
        return "_empty".to_string();
    }
    let sanitized: String = name
        .chars()
        .map(|c| if is_ident_char(c) { c } else { '_' })
        .collect();
    prefix_digit(sanitized)
}

/// Turns a name into a type name.
///
/// Splits on `_` and every non-alphanumeric character, uppercases the first
/// letter of each segment and concatenates them.
#[must_use]
pub fn sanitize_class(name: &str) -> String {
    if name.is_empty() {
        return "Empty".to_string();
    }
    let joined: String = name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|segment| !segment.is_empty())
        .map(capitalize)
        .collect();
    if joined.is_empty() {
        return "Value".to_string();
    }
    prefix_digit(joined)
}

/// Turns a literal value into an enum member name.
///
/// `"in-progress"` becomes `IN_PROGRESS`.
#[must_use]
pub fn literal_to_enum_member(value: &str) -> String {
    let mut cleaned = String::with_capacity(value.len());
    for c in value.chars() {
        let c = if c.is_ascii_alphanumeric() {
            c.to_ascii_uppercase()
        } else {
            '_'
        };
        if c == '_' && cleaned.ends_with('_') {
            continue;
        }
        cleaned.push(c);
    }
    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        return "EMPTY".to_string();
    }
    prefix_digit(trimmed.to_string())
}

/// Returns `name`, or `name_1`, `name_2`, ... if already taken, and marks
/// the result as used.
pub fn dedupe(name: &str, used: &mut HashSet<String>) -> String {
    if used.insert(name.to_string()) {
        return name.to_string();
    }
    let mut index = 1;
    loop {
        let candidate = format!("{name}_{index}");
        if used.insert(candidate.clone()) {
            return candidate;
        }
        index += 1;
    }
}

/// Like [`dedupe`], for identifiers that may carry the `r#` prefix.
///
/// `r#type` and `type` count as the same name; a suffixed name is never a
/// keyword and drops the prefix.
pub fn dedupe_ident(name: &str, used: &mut HashSet<String>) -> String {
    let bare = unraw(name);
    let claimed = dedupe(bare, used);
    if claimed == bare {
        name.to_string()
    } else {
        claimed
    }
}

/// Uppercases the first character.
#[must_use]
pub fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Converts a camel or pascal case name to snake case.
///
/// `numItems` becomes `num_items`, `HTTPServer` becomes `http_server`.
#[must_use]
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() && i > 0 && !out.ends_with('_') {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(char::is_ascii_lowercase);
            if prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_lower)
            {
                out.push('_');
            }
        }
        out.push(c.to_ascii_lowercase());
    }
    out
}

/// Makes a sanitized name usable as a Rust identifier.
///
/// Keywords become raw identifiers (`r#type`); `self`, `Self`, `super`,
/// `crate` and `_` get a trailing underscore.
#[must_use]
pub fn rust_ident(name: &str) -> String {
    if RESERVED.contains(&name) {
        format!("{name}_")
    } else if RAW_KEYWORDS.contains(&name) {
        format!("r#{name}")
    } else {
        name.to_string()
    }
}

/// Type name for a context: `sanitize_class` plus keyword handling.
#[must_use]
pub fn type_name(context: &str) -> String {
    rust_ident(&sanitize_class(context))
}

/// Field name for a wire key: sanitized, snake cased, keyword safe.
#[must_use]
pub fn field_name(key: &str) -> String {
    rust_ident(&to_snake_case(&sanitize_field(key)))
}

/// Module name holding the nested types of `type_name`.
#[must_use]
pub fn module_name(type_name: &str) -> String {
    let snake = to_snake_case(type_name);
    if snake == type_name {
        format!("{snake}_")
    } else {
        rust_ident(&snake)
    }
}

/// Strips the raw identifier prefix.
#[must_use]
pub fn unraw(name: &str) -> &str {
    name.strip_prefix("r#").unwrap_or(name)
}

/// Builds a token identifier, honoring the `r#` prefix.
#[must_use]
pub fn ident(name: &str) -> Ident {
    match name.strip_prefix("r#") {
        Some(raw) => Ident::new_raw(raw, Span::call_site()),
        None => Ident::new(name, Span::call_site()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_field() {
        assert_eq!(sanitize_field("name"), "name");
        assert_eq!(sanitize_field("first-name"), "first_name");
        assert_eq!(sanitize_field("$id"), "_id");
        assert_eq!(sanitize_field("2fa"), "_2fa");
        assert_eq!(sanitize_field(""), "_empty");
    }

    #[test]
    fn test_sanitize_class() {
        assert_eq!(sanitize_class("address"), "Address");
        assert_eq!(sanitize_class("shipping_address"), "ShippingAddress");
        assert_eq!(sanitize_class("in-progress"), "InProgress");
        assert_eq!(sanitize_class("userId"), "UserId");
        assert_eq!(sanitize_class("3d"), "_3d");
        assert_eq!(sanitize_class(""), "Empty");
        assert_eq!(sanitize_class("--"), "Value");
    }

    #[test]
    fn test_literal_to_enum_member() {
        assert_eq!(literal_to_enum_member("active"), "ACTIVE");
        assert_eq!(literal_to_enum_member("in-progress"), "IN_PROGRESS");
        assert_eq!(literal_to_enum_member("a  b"), "A_B");
        assert_eq!(literal_to_enum_member("--x--"), "X");
        assert_eq!(literal_to_enum_member("!!"), "EMPTY");
        assert_eq!(literal_to_enum_member("404"), "_404");
    }

    #[test]
    fn test_dedupe() {
        let mut used = HashSet::new();
        assert_eq!(dedupe("A", &mut used), "A");
        assert_eq!(dedupe("A", &mut used), "A_1");
        assert_eq!(dedupe("A", &mut used), "A_2");
        assert_eq!(dedupe("B", &mut used), "B");
    }

    #[test]
    fn test_dedupe_skips_taken_suffix() {
        let mut used = HashSet::new();
        dedupe("A_1", &mut used);
        dedupe("A", &mut used);
        assert_eq!(dedupe("A", &mut used), "A_2");
    }

    #[test]
    fn test_dedupe_ident_raw() {
        let mut used = HashSet::new();
        assert_eq!(dedupe_ident("r#type", &mut used), "r#type");
        assert_eq!(dedupe_ident("r#type", &mut used), "type_1");
        assert_eq!(dedupe_ident("type", &mut used), "type_2");
    }

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("numItems"), "num_items");
        assert_eq!(to_snake_case("ById"), "by_id");
        assert_eq!(to_snake_case("HTTPServer"), "http_server");
        assert_eq!(to_snake_case("getV2"), "get_v2");
        assert_eq!(to_snake_case("_creationTime"), "_creation_time");
        assert_eq!(to_snake_case("Address_1"), "address_1");
    }

    #[test]
    fn test_rust_ident() {
        assert_eq!(rust_ident("type"), "r#type");
        assert_eq!(rust_ident("gen"), "r#gen");
        assert_eq!(rust_ident("self"), "self_");
        assert_eq!(rust_ident("_"), "__");
        assert_eq!(rust_ident("name"), "name");
    }

    #[test]
    fn test_type_and_field_names() {
        assert_eq!(type_name("self"), "Self_");
        assert_eq!(field_name("numItems"), "num_items");
        assert_eq!(field_name("type"), "r#type");
        assert_eq!(field_name("_id"), "_id");
    }

    #[test]
    fn test_module_name() {
        assert_eq!(module_name("Address"), "address");
        assert_eq!(module_name("Type"), "r#type");
        assert_eq!(module_name("_3d"), "_3d_");
    }

    #[test]
    fn test_ident_raw() {
        assert_eq!(ident("r#type").to_string(), "r#type");
        assert_eq!(ident("name").to_string(), "name");
        assert_eq!(unraw("r#type"), "type");
    }
}
