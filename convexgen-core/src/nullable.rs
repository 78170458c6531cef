//! Explicitly nullable values.
//!
//! A Convex field typed `v.union(T, v.null())` must always be present on the
//! wire, carrying either a value or `null`. [`Nullable`] models that, leaving
//! `Option` to mean "field may be omitted". An optional nullable field is
//! therefore `Option<Nullable<T>>`, decoded with [`deserialize_some`] so that
//! an explicit `null` is kept apart from a missing key.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A value that serializes as `null` when empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Nullable<T>(pub Option<T>);

impl<T> Nullable<T> {
    /// Creates a nullable holding a value.
    #[must_use]
    pub const fn new(value: T) -> Self {
        Self(Some(value))
    }

    /// Creates an explicit `null`.
    #[must_use]
    pub const fn null() -> Self {
        Self(None)
    }

    /// Returns true if this is `null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        self.0.is_none()
    }

    /// Returns a reference to the value, if any.
    #[must_use]
    pub const fn as_ref(&self) -> Option<&T> {
        self.0.as_ref()
    }

    /// Consumes the wrapper.
    #[must_use]
    pub fn into_inner(self) -> Option<T> {
        self.0
    }
}

impl<T> Default for Nullable<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T> From<Option<T>> for Nullable<T> {
    fn from(value: Option<T>) -> Self {
        Self(value)
    }
}

impl<T> From<Nullable<T>> for Option<T> {
    fn from(value: Nullable<T>) -> Self {
        value.0
    }
}

impl<T: Serialize> Serialize for Nullable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.0 {
            Some(value) => value.serialize(serializer),
            None => serializer.serialize_unit(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Nullable<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Self)
    }
}

/// Deserializes a present field into `Some`, even when its value is `null`.
///
/// Pair with `#[serde(default)]` so that a missing field becomes `None`.
///
/// # Errors
/// Returns the deserializer's error if the value does not match `T`.
pub fn deserialize_some<'de, D, T>(deserializer: D) -> Result<Option<Nullable<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Nullable::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Doc {
        name: Nullable<String>,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            deserialize_with = "deserialize_some"
        )]
        nickname: Option<Nullable<String>>,
    }

    #[test]
    fn test_null_is_written_explicitly() {
        let doc = Doc {
            name: Nullable::null(),
            nickname: None,
        };
        let encoded = serde_json::to_value(&doc).expect("Failed to encode");
        assert_eq!(encoded, json!({ "name": null }));
    }

    #[test]
    fn test_missing_and_null_are_distinct() {
        let missing: Doc = serde_json::from_value(json!({ "name": "a" })).expect("Failed to decode");
        assert_eq!(missing.nickname, None);

        let null: Doc = serde_json::from_value(json!({ "name": "a", "nickname": null }))
            .expect("Failed to decode");
        assert_eq!(null.nickname, Some(Nullable::null()));

        let set: Doc = serde_json::from_value(json!({ "name": "a", "nickname": "b" }))
            .expect("Failed to decode");
        assert_eq!(set.nickname, Some(Nullable::new("b".to_string())));
    }

    #[test]
    fn test_default_is_null() {
        let value: Nullable<i64> = Nullable::default();
        assert!(value.is_null());
    }
}
