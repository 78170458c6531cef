//! Wire-encoded value types.
//!
//! Convex JSON cannot carry 64-bit integers, non-finite doubles or raw bytes
//! natively. These wrappers serialize through the boxed object forms:
//!
//! - [`Int64`]: `{"$integer": "<base64 of 8 little-endian bytes>"}`
//! - [`Float64`]: plain JSON number when finite, otherwise
//!   `{"$float": "<base64 of 8 little-endian bytes>"}`
//! - [`Bytes`]: `{"$bytes": "<base64>"}`

use crate::error::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Wire key for boxed 64-bit integers.
pub const INTEGER_KEY: &str = "$integer";
/// Wire key for boxed non-finite doubles.
pub const FLOAT_KEY: &str = "$float";
/// Wire key for byte arrays.
pub const BYTES_KEY: &str = "$bytes";

/// Encodes 8 bytes as base64.
fn encode_word(bytes: [u8; 8]) -> String {
    STANDARD.encode(bytes)
}

/// Decodes a base64 string that must hold exactly 8 bytes.
fn decode_word(key: &'static str, encoded: &str) -> Result<[u8; 8]> {
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|source| Error::Base64 { key, source })?;
    let actual = bytes.len();
    <[u8; 8]>::try_from(bytes).map_err(|_| Error::InvalidLength {
        key,
        expected: 8,
        actual,
    })
}

fn serialize_boxed<S: Serializer>(serializer: S, key: &str, value: &str) -> std::result::Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(1))?;
    map.serialize_entry(key, value)?;
    map.end()
}

/// A 64-bit signed integer (`v.int64()` / `bigint`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Int64(pub i64);

impl Int64 {
    /// Returns the wrapped value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Returns the base64 wire form of the value.
    #[must_use]
    pub fn to_wire(self) -> String {
        encode_word(self.0.to_le_bytes())
    }

    /// Parses the base64 wire form of a value.
    ///
    /// # Errors
    /// Returns `Error` if the input is not base64 or not exactly 8 bytes.
    pub fn from_wire(encoded: &str) -> Result<Self> {
        decode_word(INTEGER_KEY, encoded).map(|bytes| Self(i64::from_le_bytes(bytes)))
    }
}

impl From<i64> for Int64 {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<i32> for Int64 {
    fn from(value: i32) -> Self {
        Self(i64::from(value))
    }
}

impl From<Int64> for i64 {
    fn from(value: Int64) -> Self {
        value.0
    }
}

impl Serialize for Int64 {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serialize_boxed(serializer, INTEGER_KEY, &self.to_wire())
    }
}

// Only the boxed form is accepted; a plain number is a `Float64`.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Int64Repr {
    #[serde(rename = "$integer")]
    integer: String,
}

impl<'de> Deserialize<'de> for Int64 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let repr = Int64Repr::deserialize(deserializer)?;
        Self::from_wire(&repr.integer).map_err(D::Error::custom)
    }
}

/// A 64-bit float (`v.float64()` / `number`).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Float64(pub f64);

impl Float64 {
    /// Returns the wrapped value.
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }

    /// Parses the base64 wire form of a boxed double.
    ///
    /// # Errors
    /// Returns `Error` if the input is not base64 or not exactly 8 bytes.
    pub fn from_wire(encoded: &str) -> Result<Self> {
        decode_word(FLOAT_KEY, encoded).map(|bytes| Self(f64::from_le_bytes(bytes)))
    }
}

impl From<f64> for Float64 {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl From<f32> for Float64 {
    fn from(value: f32) -> Self {
        Self(f64::from(value))
    }
}

impl From<Float64> for f64 {
    fn from(value: Float64) -> Self {
        value.0
    }
}

impl Serialize for Float64 {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if self.0.is_finite() {
            serializer.serialize_f64(self.0)
        } else {
            serialize_boxed(serializer, FLOAT_KEY, &encode_word(self.0.to_le_bytes()))
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Float64Repr {
    Boxed {
        #[serde(rename = "$float")]
        float: String,
    },
    Plain(f64),
}

impl<'de> Deserialize<'de> for Float64 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match Float64Repr::deserialize(deserializer)? {
            Float64Repr::Boxed { float } => Self::from_wire(&float).map_err(D::Error::custom),
            Float64Repr::Plain(value) => Ok(Self(value)),
        }
    }
}

/// A byte array (`v.bytes()`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Bytes(pub Vec<u8>);

impl Bytes {
    /// Returns the bytes as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Consumes the wrapper, returning the bytes.
    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

impl From<&[u8]> for Bytes {
    fn from(value: &[u8]) -> Self {
        Self(value.to_vec())
    }
}

impl Serialize for Bytes {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serialize_boxed(serializer, BYTES_KEY, &STANDARD.encode(&self.0))
    }
}

#[derive(Deserialize)]
struct BytesRepr {
    #[serde(rename = "$bytes")]
    bytes: String,
}

impl<'de> Deserialize<'de> for Bytes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let repr = BytesRepr::deserialize(deserializer)?;
        STANDARD
            .decode(repr.bytes)
            .map(Self)
            .map_err(|source| D::Error::custom(Error::Base64 { key: BYTES_KEY, source }))
    }
}
