//! Dynamically-typed values that can be saved to and loaded from files.
//!
//! This module provides the [`Value`] enum, the payload type accepted by
//! every codec in this crate.
//!
//! # Example
//!
//! ```
//! use stowage::Value;
//!
//! // Create values via From trait
//! let count: Value = 30i64.into();
//! let ratio: Value = 0.5f64.into();
//! let label: Value = "alpha".into();
//! let flag: Value = true.into();
//!
//! // Access typed values
//! assert_eq!(count.as_int(), Some(30));
//! assert_eq!(ratio.as_float(), Some(0.5));
//! assert_eq!(label.as_str(), Some("alpha"));
//! assert_eq!(flag.as_bool(), Some(true));
//!
//! // Complex numbers are first-class
//! let z = Value::complex(1.0, 2.0);
//! assert_eq!(z.as_complex(), Some((1.0, 2.0)));
//! ```
//!
//! # Equality
//!
//! The derived `PartialEq` is strict: two values are equal only when their
//! variants match, so `Value::Int(1) != Value::Int32(1)`. This is the
//! comparison that type-exact round trips must satisfy. Lossy codecs are
//! held to the weaker [`Value::value_eq`], which treats the fixed-width
//! numeric subtypes as equal to their widened counterparts.

use std::collections::BTreeMap;
use std::fmt;

/// A dynamically-typed value.
///
/// This enum covers the full value model handled by the crate's codecs:
/// primitives, complex numbers, byte strings, and nested composites.
///
/// # Supported Types
///
/// | Variant | Rust Type | Notes |
/// |---------|-----------|-------|
/// | `Null` | - | Missing/absent values |
/// | `Bool` | `bool` | Distinct from integers 0/1 |
/// | `Int` | `i64` | The model's generic integer |
/// | `Int32` | `i32` | Narrow fixed-width integer subtype |
/// | `Float` | `f64` | The model's generic float |
/// | `Float32` | `f32` | Narrow fixed-width float subtype |
/// | `Complex` | `f64`, `f64` | Complex number (re, im) |
/// | `String` | `String` | UTF-8 text |
/// | `Bytes` | `Vec<u8>` | Raw byte string |
/// | `Array` | `Vec<Value>` | Heterogeneous sequence |
/// | `Map` | `BTreeMap<String, Value>` | String-keyed composite |
///
/// The narrow subtypes exist so that codecs can express subtype erasure:
/// a codec whose wire format has a single integer width may read an
/// `Int32` back as `Int` while preserving the numeric value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null/missing value
    Null,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 32-bit signed integer (narrow subtype)
    Int32(i32),
    /// 64-bit floating point number
    Float(f64),
    /// 32-bit floating point number (narrow subtype)
    Float32(f32),
    /// Complex number with 64-bit real and imaginary parts
    Complex {
        /// Real part
        re: f64,
        /// Imaginary part
        im: f64,
    },
    /// UTF-8 string
    String(String),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// Array of values
    Array(Vec<Value>),
    /// String-keyed map of values
    Map(BTreeMap<String, Value>),
}

/// The category of a [`Value`], used in error messages and fidelity
/// reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// [`Value::Null`]
    Null,
    /// [`Value::Bool`]
    Bool,
    /// [`Value::Int`]
    Int,
    /// [`Value::Int32`]
    Int32,
    /// [`Value::Float`]
    Float,
    /// [`Value::Float32`]
    Float32,
    /// [`Value::Complex`]
    Complex,
    /// [`Value::String`]
    String,
    /// [`Value::Bytes`]
    Bytes,
    /// [`Value::Array`]
    Array,
    /// [`Value::Map`]
    Map,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Int32 => "int32",
            Self::Float => "float",
            Self::Float32 => "float32",
            Self::Complex => "complex",
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::Array => "array",
            Self::Map => "map",
        };
        f.write_str(name)
    }
}

impl Value {
    /// Returns the kind of this value.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Int32(_) => ValueKind::Int32,
            Self::Float(_) => ValueKind::Float,
            Self::Float32(_) => ValueKind::Float32,
            Self::Complex { .. } => ValueKind::Complex,
            Self::String(_) => ValueKind::String,
            Self::Bytes(_) => ValueKind::Bytes,
            Self::Array(_) => ValueKind::Array,
            Self::Map(_) => ValueKind::Map,
        }
    }

    /// Creates a complex number value.
    #[inline]
    #[must_use]
    pub const fn complex(re: f64, im: f64) -> Self {
        Self::Complex { re, im }
    }

    /// Returns `true` if the value is null.
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the value as a boolean if it is one.
    #[inline]
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the value as a 64-bit integer if it is an integer.
    ///
    /// `Int32` values are widened; the conversion is lossless.
    #[inline]
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Int32(i) => Some(*i as i64),
            _ => None,
        }
    }

    /// Returns the value as a 64-bit float if it is a float.
    ///
    /// `Float32` values are widened; the conversion is lossless.
    #[inline]
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Float32(f) => Some(f64::from(*f)),
            _ => None,
        }
    }

    /// Returns the value as a `(re, im)` pair if it is a complex number.
    #[inline]
    #[must_use]
    pub const fn as_complex(&self) -> Option<(f64, f64)> {
        match self {
            Self::Complex { re, im } => Some((*re, *im)),
            _ => None,
        }
    }

    /// Returns the value as a string slice if it is a string.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as a byte slice if it is a byte string.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the value as a slice of values if it is an array.
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Returns the value as a map reference if it is a map.
    #[inline]
    #[must_use]
    pub const fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Compares two values for equality up to numeric subtype widening.
    ///
    /// The fixed-width subtypes compare equal to their widened generic
    /// counterparts (`Int32(1)` to `Int(1)`, `Float32(x)` to
    /// `Float(f64::from(x))`); arrays and maps are compared element-wise
    /// with the same rule. Booleans never compare equal to integers, and
    /// no cross-family integer/float equivalence is applied.
    ///
    /// This is the round-trip guarantee lossy codecs are held to; see the
    /// per-codec fidelity tables in the [`codec`](crate::codec) module.
    ///
    /// # Example
    ///
    /// ```
    /// use stowage::Value;
    ///
    /// assert!(Value::Int32(7).value_eq(&Value::Int(7)));
    /// assert!(!Value::Bool(true).value_eq(&Value::Int(1)));
    /// assert_ne!(Value::Int32(7), Value::Int(7)); // strict equality differs
    /// ```
    #[must_use]
    pub fn value_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int32(b)) | (Self::Int32(b), Self::Int(a)) => {
                *a == i64::from(*b)
            }
            (Self::Float(a), Self::Float32(b)) | (Self::Float32(b), Self::Float(a)) => {
                *a == f64::from(*b)
            }
            (Self::Array(a), Self::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.value_eq(y))
            }
            (Self::Map(a), Self::Map(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b)
                        .all(|((ka, va), (kb, vb))| ka == kb && va.value_eq(vb))
            }
            _ => self == other,
        }
    }
}

impl From<bool> for Value {
    #[inline]
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    #[inline]
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    #[inline]
    fn from(i: i32) -> Self {
        Self::Int32(i)
    }
}

impl From<f64> for Value {
    #[inline]
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<f32> for Value {
    #[inline]
    fn from(f: f32) -> Self {
        Self::Float32(f)
    }
}

impl From<String> for Value {
    #[inline]
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<Vec<u8>> for Value {
    #[inline]
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}

impl From<Vec<Value>> for Value {
    #[inline]
    fn from(v: Vec<Value>) -> Self {
        Self::Array(v)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    #[inline]
    fn from(m: BTreeMap<String, Value>) -> Self {
        Self::Map(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_type_checks() {
        assert!(Value::Null.is_null());
        assert!(!Value::Bool(true).is_null());
        assert_eq!(Value::Null.kind(), ValueKind::Null);
        assert_eq!(Value::complex(0.0, 1.0).kind(), ValueKind::Complex);
    }

    #[test]
    fn value_conversions() {
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert_eq!(Value::from(42i64).as_int(), Some(42));
        assert_eq!(Value::from(42i32), Value::Int32(42));
        assert_eq!(Value::from(2.5f64).as_float(), Some(2.5));
        assert_eq!(Value::from("hello").as_str(), Some("hello"));
        assert_eq!(Value::from(vec![1u8, 2]).as_bytes(), Some(&[1u8, 2][..]));
    }

    #[test]
    fn narrow_accessors_widen() {
        assert_eq!(Value::Int32(-5).as_int(), Some(-5));
        assert_eq!(Value::Float32(1.5).as_float(), Some(1.5));
    }

    #[test]
    fn strict_equality_separates_subtypes() {
        assert_ne!(Value::Int(1), Value::Int32(1));
        assert_ne!(Value::Float(1.0), Value::Float32(1.0));
        assert_ne!(Value::Bool(true), Value::Int(1));
    }

    #[test]
    fn value_eq_widens_subtypes() {
        assert!(Value::Int32(1).value_eq(&Value::Int(1)));
        assert!(Value::Int(1).value_eq(&Value::Int32(1)));
        assert!(Value::Float32(1.5).value_eq(&Value::Float(1.5)));
        // 1.2f32 widens to the f64 nearest to the f32, not to 1.2f64
        assert!(Value::Float32(1.2).value_eq(&Value::Float(f64::from(1.2f32))));
        assert!(!Value::Float32(1.2).value_eq(&Value::Float(1.2)));
    }

    #[test]
    fn value_eq_rejects_cross_family() {
        assert!(!Value::Bool(false).value_eq(&Value::Int(0)));
        assert!(!Value::Int(1).value_eq(&Value::Float(1.0)));
        assert!(!Value::Null.value_eq(&Value::Int(0)));
    }

    #[test]
    fn value_eq_recurses_through_composites() {
        let narrow = Value::Array(vec![Value::Int32(1), Value::Float32(2.0)]);
        let wide = Value::Array(vec![Value::Int(1), Value::Float(2.0)]);
        assert!(narrow.value_eq(&wide));
        assert_ne!(narrow, wide);

        let mut a = BTreeMap::new();
        a.insert("x".to_owned(), Value::Int32(3));
        let mut b = BTreeMap::new();
        b.insert("x".to_owned(), Value::Int(3));
        assert!(Value::Map(a).value_eq(&Value::Map(b)));
    }

    #[test]
    fn kind_display() {
        assert_eq!(ValueKind::Complex.to_string(), "complex");
        assert_eq!(ValueKind::Int32.to_string(), "int32");
    }
}
