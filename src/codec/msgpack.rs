//! The compact binary codec.
//!
//! Encodes values through the MessagePack data model via [`rmpv`]. The
//! format natively covers null, booleans, integers, floats, strings,
//! binary blobs, arrays, and maps; complex numbers ride on a MessagePack
//! extension type.
//!
//! # Format
//!
//! Standard MessagePack, with one extension:
//!
//! - ext type `1`, length 16: a complex number as two big-endian IEEE 754
//!   f64 values, real part first.
//!
//! # Fidelity
//!
//! | Category | Round trip |
//! |----------|------------|
//! | `Null`, `Bool`, `Int`, `Float`, `String`, `Bytes` | exact |
//! | `Complex` | exact (ext type 1) |
//! | `Array`, `Map` | as faithful as their weakest element |
//! | `Int32`, `Float32` | value only — the wire carries no width tag, so |
//! |                    | they are read back as `Int`/`Float` |
//!
//! Unknown extension types and non-string map keys in foreign documents
//! fail decoding rather than being coerced.

use rmpv::Value as MpValue;

use super::{Codec, Fidelity, PayloadKind};
use crate::error::{DecodeError, EncodeError};
use crate::types::Value;

/// The codec's logical name.
const NAME: &str = "msgpack";

/// Extension type tag carrying a complex number.
const COMPLEX_EXT_TYPE: i8 = 1;

/// Payload size of the complex extension: two big-endian f64 values.
const COMPLEX_EXT_LEN: usize = 16;

/// The MessagePack binary codec (`.msgpack`).
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgpackCodec;

impl Codec for MsgpackCodec {
    fn name(&self) -> &str {
        NAME
    }

    fn extensions(&self) -> &[&str] {
        &["msgpack"]
    }

    fn payload_kind(&self) -> PayloadKind {
        PayloadKind::Binary
    }

    fn fidelity(&self, value: &Value) -> Fidelity {
        match value {
            Value::Null
            | Value::Bool(_)
            | Value::Int(_)
            | Value::Float(_)
            | Value::Complex { .. }
            | Value::String(_)
            | Value::Bytes(_) => Fidelity::Exact,
            Value::Int32(_) | Value::Float32(_) => Fidelity::ValueOnly,
            Value::Array(arr) => arr
                .iter()
                .fold(Fidelity::Exact, |acc, v| acc.combine(self.fidelity(v))),
            Value::Map(map) => map
                .values()
                .fold(Fidelity::Exact, |acc, v| acc.combine(self.fidelity(v))),
        }
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>, EncodeError> {
        let tree = to_msgpack(value);
        let mut buf = Vec::new();
        rmpv::encode::write_value(&mut buf, &tree).map_err(|e| EncodeError::codec(NAME, e))?;
        Ok(buf)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value, DecodeError> {
        let mut rd = bytes;
        let tree = rmpv::decode::read_value(&mut rd).map_err(|e| DecodeError::codec(NAME, e))?;
        if !rd.is_empty() {
            return Err(DecodeError::malformed(
                NAME,
                format!("{} trailing bytes after value", rd.len()),
            ));
        }
        from_msgpack(tree)
    }
}

/// Convert a value into the MessagePack tree.
///
/// Every variant is representable: the fixed-width subtypes are carried as
/// their generic MessagePack numbers (this is where the width tag is lost)
/// and complex numbers become ext type 1.
fn to_msgpack(value: &Value) -> MpValue {
    match value {
        Value::Null => MpValue::Nil,
        Value::Bool(b) => MpValue::Boolean(*b),
        Value::Int(i) => MpValue::from(*i),
        Value::Int32(i) => MpValue::from(i64::from(*i)),
        Value::Float(f) => MpValue::F64(*f),
        Value::Float32(f) => MpValue::F32(*f),
        Value::Complex { re, im } => {
            let mut payload = Vec::with_capacity(COMPLEX_EXT_LEN);
            payload.extend_from_slice(&re.to_be_bytes());
            payload.extend_from_slice(&im.to_be_bytes());
            MpValue::Ext(COMPLEX_EXT_TYPE, payload)
        }
        Value::String(s) => MpValue::from(s.as_str()),
        Value::Bytes(b) => MpValue::Binary(b.clone()),
        Value::Array(arr) => MpValue::Array(arr.iter().map(to_msgpack).collect()),
        Value::Map(map) => MpValue::Map(
            map.iter()
                .map(|(k, v)| (MpValue::from(k.as_str()), to_msgpack(v)))
                .collect(),
        ),
    }
}

/// Convert a MessagePack tree back into the value model.
fn from_msgpack(tree: MpValue) -> Result<Value, DecodeError> {
    match tree {
        MpValue::Nil => Ok(Value::Null),
        MpValue::Boolean(b) => Ok(Value::Bool(b)),
        MpValue::Integer(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Int(i))
            } else if let Some(u) = n.as_u64() {
                Err(DecodeError::OutOfRange { codec: NAME.to_owned(), value: u })
            } else {
                Err(DecodeError::malformed(NAME, format!("unrepresentable integer {n:?}")))
            }
        }
        // The wire's f32 widens losslessly; the subtype tag is gone.
        MpValue::F32(f) => Ok(Value::Float(f64::from(f))),
        MpValue::F64(f) => Ok(Value::Float(f)),
        MpValue::String(s) => match s.into_str() {
            Some(s) => Ok(Value::String(s)),
            None => Err(DecodeError::malformed(NAME, "string is not valid UTF-8")),
        },
        MpValue::Binary(b) => Ok(Value::Bytes(b)),
        MpValue::Array(elems) => {
            let arr = elems.into_iter().map(from_msgpack).collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Array(arr))
        }
        MpValue::Map(pairs) => {
            let mut map = std::collections::BTreeMap::new();
            for (key, val) in pairs {
                let MpValue::String(key) = key else {
                    return Err(DecodeError::malformed(NAME, "map key is not a string"));
                };
                let Some(key) = key.into_str() else {
                    return Err(DecodeError::malformed(NAME, "map key is not valid UTF-8"));
                };
                map.insert(key, from_msgpack(val)?);
            }
            Ok(Value::Map(map))
        }
        MpValue::Ext(COMPLEX_EXT_TYPE, payload) => decode_complex(&payload),
        MpValue::Ext(other, _) => {
            Err(DecodeError::malformed(NAME, format!("unknown extension type {other}")))
        }
    }
}

/// Decode the 16-byte complex extension payload.
fn decode_complex(payload: &[u8]) -> Result<Value, DecodeError> {
    if payload.len() != COMPLEX_EXT_LEN {
        return Err(DecodeError::malformed(
            NAME,
            format!("complex extension has {} bytes, expected {COMPLEX_EXT_LEN}", payload.len()),
        ));
    }
    let (re_raw, im_raw) = payload.split_at(8);
    let re = f64::from_be_bytes(re_raw.try_into().map_err(|_| truncated_ext())?);
    let im = f64::from_be_bytes(im_raw.try_into().map_err(|_| truncated_ext())?);
    Ok(Value::Complex { re, im })
}

fn truncated_ext() -> DecodeError {
    DecodeError::malformed(NAME, "truncated complex extension payload")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(value: &Value) -> Value {
        let bytes = MsgpackCodec.encode(value).unwrap();
        MsgpackCodec.decode(&bytes).unwrap()
    }

    #[test]
    fn native_subset_roundtrips_exactly() {
        for value in [
            Value::Null,
            Value::Bool(true),
            Value::Bool(false),
            Value::Int(1),
            Value::Int(i64::MIN),
            Value::Float(1.2),
            Value::String("foo".to_owned()),
            Value::Bytes(vec![0, 1, 255]),
            Value::Array(vec![Value::Int(1), Value::Int(2), Value::Int(3)]),
        ] {
            assert_eq!(roundtrip(&value), value);
        }
    }

    #[test]
    fn complex_roundtrips_via_extension() {
        let z = Value::complex(1.0, 2.0);
        assert_eq!(roundtrip(&z), z);
        assert_eq!(MsgpackCodec.fidelity(&z), Fidelity::Exact);
    }

    #[test]
    fn string_and_bytes_stay_distinct() {
        assert_eq!(roundtrip(&Value::String("ab".to_owned())), Value::String("ab".to_owned()));
        assert_eq!(roundtrip(&Value::Bytes(b"ab".to_vec())), Value::Bytes(b"ab".to_vec()));
    }

    #[test]
    fn narrow_subtypes_collapse_to_generic() {
        assert_eq!(roundtrip(&Value::Int32(1)), Value::Int(1));
        let widened = roundtrip(&Value::Float32(1.2));
        assert_eq!(widened, Value::Float(f64::from(1.2f32)));
        assert!(widened.value_eq(&Value::Float32(1.2)));
    }

    #[test]
    fn nested_composites_roundtrip() {
        let mut map = std::collections::BTreeMap::new();
        map.insert("z".to_owned(), Value::complex(-1.0, 0.25));
        map.insert("data".to_owned(), Value::Array(vec![Value::Bytes(vec![7])]));
        let value = Value::Map(map);
        assert_eq!(roundtrip(&value), value);
    }

    #[test]
    fn unknown_extension_fails_decode() {
        let mut buf = Vec::new();
        rmpv::encode::write_value(&mut buf, &MpValue::Ext(42, vec![0u8; 4])).unwrap();
        assert!(matches!(MsgpackCodec.decode(&buf), Err(DecodeError::Malformed { .. })));
    }

    #[test]
    fn wrong_sized_complex_extension_fails_decode() {
        let mut buf = Vec::new();
        rmpv::encode::write_value(&mut buf, &MpValue::Ext(COMPLEX_EXT_TYPE, vec![0u8; 8]))
            .unwrap();
        assert!(matches!(MsgpackCodec.decode(&buf), Err(DecodeError::Malformed { .. })));
    }

    #[test]
    fn non_string_map_key_fails_decode() {
        let mut buf = Vec::new();
        let tree = MpValue::Map(vec![(MpValue::from(1i64), MpValue::Nil)]);
        rmpv::encode::write_value(&mut buf, &tree).unwrap();
        assert!(matches!(MsgpackCodec.decode(&buf), Err(DecodeError::Malformed { .. })));
    }

    #[test]
    fn huge_unsigned_integers_fail_decode() {
        let mut buf = Vec::new();
        rmpv::encode::write_value(&mut buf, &MpValue::from(u64::MAX)).unwrap();
        assert!(matches!(MsgpackCodec.decode(&buf), Err(DecodeError::OutOfRange { .. })));
    }

    #[test]
    fn trailing_bytes_are_malformed() {
        let mut bytes = MsgpackCodec.encode(&Value::Null).unwrap();
        bytes.push(0xC0);
        assert!(matches!(MsgpackCodec.decode(&bytes), Err(DecodeError::Malformed { .. })));
    }

    #[test]
    fn truncated_payload_fails_decode() {
        let mut bytes = MsgpackCodec.encode(&Value::String("hello world".to_owned())).unwrap();
        bytes.truncate(bytes.len() - 3);
        assert!(matches!(MsgpackCodec.decode(&bytes), Err(DecodeError::Codec { .. })));
    }

    #[test]
    fn fidelity_table() {
        assert_eq!(MsgpackCodec.fidelity(&Value::Bytes(vec![])), Fidelity::Exact);
        assert_eq!(MsgpackCodec.fidelity(&Value::Int32(1)), Fidelity::ValueOnly);
        assert_eq!(
            MsgpackCodec.fidelity(&Value::Array(vec![Value::Float32(0.5)])),
            Fidelity::ValueOnly
        );
    }
}
