//! The human-readable text codec.
//!
//! Encodes values as standard JSON via [`serde_json`]. JSON's type system
//! is smaller than the value model, so this codec's fidelity is partial by
//! design: it round-trips the JSON-expressible subset exactly and rejects
//! everything else at encode time rather than writing an approximation.
//!
//! # Fidelity
//!
//! | Category | Round trip |
//! |----------|------------|
//! | `Null`, `Bool`, `Int`, finite `Float`, `String` | exact |
//! | `Array`, `Map` | as faithful as their weakest element |
//! | `Int32`, `Float32` | value only — read back as `Int`/`Float` |
//! | `Complex`, `Bytes` | rejected with `EncodeError` |
//! | non-finite `Float` | rejected (standard JSON has no NaN/Infinity) |
//!
//! Integers wider than `i64` in the input document fail decoding with
//! [`DecodeError::OutOfRange`] instead of being read as an approximate
//! float.

use serde_json::{Map as JsonMap, Number, Value as JsonValue};

use super::{Codec, Fidelity, PayloadKind};
use crate::error::{DecodeError, EncodeError};
use crate::types::Value;

/// The codec's logical name.
const NAME: &str = "json";

/// The JSON text codec (`.json`).
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn name(&self) -> &str {
        NAME
    }

    fn extensions(&self) -> &[&str] {
        &["json"]
    }

    fn payload_kind(&self) -> PayloadKind {
        PayloadKind::Text
    }

    fn fidelity(&self, value: &Value) -> Fidelity {
        match value {
            Value::Null | Value::Bool(_) | Value::Int(_) | Value::String(_) => Fidelity::Exact,
            Value::Float(f) => {
                if f.is_finite() {
                    Fidelity::Exact
                } else {
                    Fidelity::Unsupported
                }
            }
            Value::Int32(_) => Fidelity::ValueOnly,
            Value::Float32(f) => {
                if f.is_finite() {
                    Fidelity::ValueOnly
                } else {
                    Fidelity::Unsupported
                }
            }
            Value::Complex { .. } | Value::Bytes(_) => Fidelity::Unsupported,
            Value::Array(arr) => arr
                .iter()
                .fold(Fidelity::Exact, |acc, v| acc.combine(self.fidelity(v))),
            Value::Map(map) => map
                .values()
                .fold(Fidelity::Exact, |acc, v| acc.combine(self.fidelity(v))),
        }
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>, EncodeError> {
        let tree = to_json(value)?;
        serde_json::to_vec(&tree).map_err(|e| EncodeError::codec(NAME, e))
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value, DecodeError> {
        let tree: JsonValue =
            serde_json::from_slice(bytes).map_err(|e| DecodeError::codec(NAME, e))?;
        from_json(tree)
    }
}

/// Convert a value into the JSON tree, rejecting variants outside JSON's
/// type system.
fn to_json(value: &Value) -> Result<JsonValue, EncodeError> {
    match value {
        Value::Null => Ok(JsonValue::Null),
        Value::Bool(b) => Ok(JsonValue::Bool(*b)),
        Value::Int(i) => Ok(JsonValue::Number(Number::from(*i))),
        Value::Int32(i) => Ok(JsonValue::Number(Number::from(i64::from(*i)))),
        Value::Float(f) => finite_number(*f),
        Value::String(s) => Ok(JsonValue::String(s.clone())),
        Value::Float32(f) => finite_number(f64::from(*f)),
        Value::Complex { .. } | Value::Bytes(_) => {
            Err(EncodeError::unsupported(NAME, value.kind()))
        }
        Value::Array(arr) => {
            let elems = arr.iter().map(to_json).collect::<Result<Vec<_>, _>>()?;
            Ok(JsonValue::Array(elems))
        }
        Value::Map(map) => {
            let mut object = JsonMap::with_capacity(map.len());
            for (key, val) in map {
                object.insert(key.clone(), to_json(val)?);
            }
            Ok(JsonValue::Object(object))
        }
    }
}

/// Convert a finite float into a JSON number.
fn finite_number(f: f64) -> Result<JsonValue, EncodeError> {
    Number::from_f64(f)
        .map(JsonValue::Number)
        .ok_or_else(|| EncodeError::invalid_value(NAME, "JSON cannot represent non-finite numbers"))
}

/// Convert a JSON tree back into the value model.
fn from_json(tree: JsonValue) -> Result<Value, DecodeError> {
    match tree {
        JsonValue::Null => Ok(Value::Null),
        JsonValue::Bool(b) => Ok(Value::Bool(b)),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Int(i))
            } else if let Some(u) = n.as_u64() {
                // Integral but wider than i64: refuse rather than round.
                Err(DecodeError::OutOfRange { codec: NAME.to_owned(), value: u })
            } else if let Some(f) = n.as_f64() {
                Ok(Value::Float(f))
            } else {
                Err(DecodeError::malformed(NAME, format!("unrepresentable number {n}")))
            }
        }
        JsonValue::String(s) => Ok(Value::String(s)),
        JsonValue::Array(elems) => {
            let arr = elems.into_iter().map(from_json).collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Array(arr))
        }
        JsonValue::Object(object) => {
            let mut map = std::collections::BTreeMap::new();
            for (key, val) in object {
                map.insert(key, from_json(val)?);
            }
            Ok(Value::Map(map))
        }
    }
}
