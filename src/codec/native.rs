//! The universal exact-fidelity codec.
//!
//! This codec's wire format is a compact tagged binary encoding whose type
//! system is exactly the [`Value`] model, so every variant round-trips with
//! full type identity — including complex numbers and the fixed-width
//! numeric subtypes that other codecs widen.
//!
//! # Format
//!
//! Each value is encoded with a 1-byte type tag followed by the payload:
//!
//! - `Null`: `0x00`
//! - `Bool`: `0x01` + `0x00` (false) or `0x01` (true)
//! - `Int`: `0x02` + 8 bytes (big-endian i64)
//! - `Int32`: `0x03` + 4 bytes (big-endian i32)
//! - `Float`: `0x04` + 8 bytes (IEEE 754 f64, big-endian)
//! - `Float32`: `0x05` + 4 bytes (IEEE 754 f32, big-endian)
//! - `Complex`: `0x06` + 8 bytes (re) + 8 bytes (im)
//! - `String`: `0x07` + 4 bytes length + UTF-8 bytes
//! - `Bytes`: `0x08` + 4 bytes length + raw bytes
//! - `Array`: `0x09` + 4 bytes length (count) + encoded values
//! - `Map`: `0x0A` + 4 bytes length (count) + (4-byte key length + key
//!   bytes + encoded value) pairs, keys in ascending order
//!
//! All lengths are big-endian `u32`.
//!
//! # Fidelity
//!
//! | Category | Round trip |
//! |----------|------------|
//! | every variant | exact |

use std::collections::BTreeMap;

use super::{Codec, Fidelity, PayloadKind};
use crate::error::{DecodeError, EncodeError};
use crate::types::Value;

/// The codec's logical name.
const NAME: &str = "native";

/// Type tags for value variants.
mod tags {
    pub const NULL: u8 = 0x00;
    pub const BOOL: u8 = 0x01;
    pub const INT: u8 = 0x02;
    pub const INT32: u8 = 0x03;
    pub const FLOAT: u8 = 0x04;
    pub const FLOAT32: u8 = 0x05;
    pub const COMPLEX: u8 = 0x06;
    pub const STRING: u8 = 0x07;
    pub const BYTES: u8 = 0x08;
    pub const ARRAY: u8 = 0x09;
    pub const MAP: u8 = 0x0A;
}

/// The universal tagged-binary codec (`.p`, `.pickle`).
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeCodec;

impl Codec for NativeCodec {
    fn name(&self) -> &str {
        NAME
    }

    fn extensions(&self) -> &[&str] {
        &["p", "pickle"]
    }

    fn payload_kind(&self) -> PayloadKind {
        PayloadKind::Binary
    }

    fn fidelity(&self, _value: &Value) -> Fidelity {
        Fidelity::Exact
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>, EncodeError> {
        let mut buf = Vec::new();
        encode_value(value, &mut buf)?;
        Ok(buf)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value, DecodeError> {
        let (value, consumed) = decode_value(bytes)?;
        if consumed != bytes.len() {
            return Err(DecodeError::malformed(
                NAME,
                format!("{} trailing bytes after value", bytes.len() - consumed),
            ));
        }
        Ok(value)
    }
}

/// Encode a value, appending to `buf`.
fn encode_value(value: &Value, buf: &mut Vec<u8>) -> Result<(), EncodeError> {
    match value {
        Value::Null => buf.push(tags::NULL),
        Value::Bool(b) => {
            buf.push(tags::BOOL);
            buf.push(u8::from(*b));
        }
        Value::Int(i) => {
            buf.push(tags::INT);
            buf.extend_from_slice(&i.to_be_bytes());
        }
        Value::Int32(i) => {
            buf.push(tags::INT32);
            buf.extend_from_slice(&i.to_be_bytes());
        }
        Value::Float(f) => {
            buf.push(tags::FLOAT);
            buf.extend_from_slice(&f.to_be_bytes());
        }
        Value::Float32(f) => {
            buf.push(tags::FLOAT32);
            buf.extend_from_slice(&f.to_be_bytes());
        }
        Value::Complex { re, im } => {
            buf.push(tags::COMPLEX);
            buf.extend_from_slice(&re.to_be_bytes());
            buf.extend_from_slice(&im.to_be_bytes());
        }
        Value::String(s) => {
            buf.push(tags::STRING);
            encode_len(s.len(), "string", buf)?;
            buf.extend_from_slice(s.as_bytes());
        }
        Value::Bytes(b) => {
            buf.push(tags::BYTES);
            encode_len(b.len(), "bytes", buf)?;
            buf.extend_from_slice(b);
        }
        Value::Array(arr) => {
            buf.push(tags::ARRAY);
            encode_len(arr.len(), "array", buf)?;
            for val in arr {
                encode_value(val, buf)?;
            }
        }
        Value::Map(map) => {
            buf.push(tags::MAP);
            encode_len(map.len(), "map", buf)?;
            for (key, val) in map {
                encode_len(key.len(), "map key", buf)?;
                buf.extend_from_slice(key.as_bytes());
                encode_value(val, buf)?;
            }
        }
    }
    Ok(())
}

/// Encode a length as big-endian `u32`.
fn encode_len(len: usize, what: &str, buf: &mut Vec<u8>) -> Result<(), EncodeError> {
    let len = u32::try_from(len)
        .map_err(|_| EncodeError::invalid_value(NAME, format!("{what} too long")))?;
    buf.extend_from_slice(&len.to_be_bytes());
    Ok(())
}

/// Decode a value and return the number of bytes consumed.
fn decode_value(bytes: &[u8]) -> Result<(Value, usize), DecodeError> {
    let Some((&tag, rest)) = bytes.split_first() else {
        return Err(truncated());
    };

    match tag {
        tags::NULL => Ok((Value::Null, 1)),
        tags::BOOL => match rest.first() {
            Some(0) => Ok((Value::Bool(false), 2)),
            Some(1) => Ok((Value::Bool(true), 2)),
            Some(b) => Err(DecodeError::malformed(NAME, format!("invalid bool byte {b:#04x}"))),
            None => Err(truncated()),
        },
        tags::INT => {
            let raw = read_fixed::<8>(rest)?;
            Ok((Value::Int(i64::from_be_bytes(raw)), 9))
        }
        tags::INT32 => {
            let raw = read_fixed::<4>(rest)?;
            Ok((Value::Int32(i32::from_be_bytes(raw)), 5))
        }
        tags::FLOAT => {
            let raw = read_fixed::<8>(rest)?;
            Ok((Value::Float(f64::from_be_bytes(raw)), 9))
        }
        tags::FLOAT32 => {
            let raw = read_fixed::<4>(rest)?;
            Ok((Value::Float32(f32::from_be_bytes(raw)), 5))
        }
        tags::COMPLEX => {
            if rest.len() < 16 {
                return Err(truncated());
            }
            let re_raw = read_fixed::<8>(rest)?;
            let im_raw = read_fixed::<8>(&rest[8..])?;
            let value = Value::Complex {
                re: f64::from_be_bytes(re_raw),
                im: f64::from_be_bytes(im_raw),
            };
            Ok((value, 17))
        }
        tags::STRING => {
            let (len, rest) = decode_len(rest)?;
            if rest.len() < len {
                return Err(truncated());
            }
            let s = String::from_utf8(rest[..len].to_vec())
                .map_err(|e| DecodeError::malformed(NAME, format!("invalid UTF-8: {e}")))?;
            Ok((Value::String(s), 5 + len))
        }
        tags::BYTES => {
            let (len, rest) = decode_len(rest)?;
            if rest.len() < len {
                return Err(truncated());
            }
            Ok((Value::Bytes(rest[..len].to_vec()), 5 + len))
        }
        tags::ARRAY => {
            let (count, mut rest) = decode_len(rest)?;
            let mut consumed = 5;
            let mut arr = Vec::with_capacity(count.min(1024));
            for _ in 0..count {
                let (val, used) = decode_value(rest)?;
                rest = &rest[used..];
                consumed += used;
                arr.push(val);
            }
            Ok((Value::Array(arr), consumed))
        }
        tags::MAP => {
            let (count, mut rest) = decode_len(rest)?;
            let mut consumed = 5;
            let mut map = BTreeMap::new();
            for _ in 0..count {
                let (key_len, after_len) = decode_len(rest)?;
                if after_len.len() < key_len {
                    return Err(truncated());
                }
                let key = String::from_utf8(after_len[..key_len].to_vec()).map_err(|e| {
                    DecodeError::malformed(NAME, format!("invalid UTF-8 in map key: {e}"))
                })?;
                rest = &after_len[key_len..];
                consumed += 4 + key_len;

                let (val, used) = decode_value(rest)?;
                rest = &rest[used..];
                consumed += used;
                map.insert(key, val);
            }
            Ok((Value::Map(map), consumed))
        }
        other => Err(DecodeError::malformed(NAME, format!("unknown type tag {other:#04x}"))),
    }
}

/// Decode a big-endian `u32` length prefix, returning the remaining input.
fn decode_len(bytes: &[u8]) -> Result<(usize, &[u8]), DecodeError> {
    let raw = read_fixed::<4>(bytes)?;
    let len = usize::try_from(u32::from_be_bytes(raw))
        .map_err(|_| DecodeError::malformed(NAME, "length exceeds platform capacity"))?;
    Ok((len, &bytes[4..]))
}

/// Read a fixed-size prefix from the input.
fn read_fixed<const N: usize>(bytes: &[u8]) -> Result<[u8; N], DecodeError> {
    bytes
        .get(..N)
        .and_then(|slice| <[u8; N]>::try_from(slice).ok())
        .ok_or_else(truncated)
}

fn truncated() -> DecodeError {
    DecodeError::malformed(NAME, "unexpected end of input")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(value: Value) -> Value {
        let bytes = NativeCodec.encode(&value).unwrap();
        NativeCodec.decode(&bytes).unwrap()
    }

    #[test]
    fn primitives_roundtrip_exactly() {
        for value in [
            Value::Null,
            Value::Bool(true),
            Value::Bool(false),
            Value::Int(i64::MIN),
            Value::Int32(-7),
            Value::Float(1.2),
            Value::Float32(1.2),
            Value::complex(1.0, 2.0),
            Value::String("föö".to_owned()),
            Value::Bytes(vec![0, 255, 1]),
        ] {
            assert_eq!(roundtrip(value.clone()), value);
        }
    }

    #[test]
    fn subtypes_survive_with_type_identity() {
        assert_eq!(roundtrip(Value::Int32(1)), Value::Int32(1));
        assert_ne!(roundtrip(Value::Int32(1)), Value::Int(1));
        assert_eq!(roundtrip(Value::Float32(1.5)), Value::Float32(1.5));
    }

    #[test]
    fn nested_composites_roundtrip() {
        let mut map = BTreeMap::new();
        map.insert("z".to_owned(), Value::complex(0.5, -0.5));
        map.insert(
            "seq".to_owned(),
            Value::Array(vec![Value::Int(1), Value::Array(vec![Value::Null])]),
        );
        let value = Value::Map(map);
        assert_eq!(roundtrip(value.clone()), value);
    }

    #[test]
    fn empty_input_is_malformed() {
        assert!(matches!(NativeCodec.decode(&[]), Err(DecodeError::Malformed { .. })));
    }

    #[test]
    fn truncated_payload_is_malformed() {
        let mut bytes = NativeCodec.encode(&Value::Int(42)).unwrap();
        bytes.pop();
        assert!(matches!(NativeCodec.decode(&bytes), Err(DecodeError::Malformed { .. })));
    }

    #[test]
    fn trailing_bytes_are_malformed() {
        let mut bytes = NativeCodec.encode(&Value::Null).unwrap();
        bytes.push(0x00);
        assert!(matches!(NativeCodec.decode(&bytes), Err(DecodeError::Malformed { .. })));
    }

    #[test]
    fn unknown_tag_is_malformed() {
        assert!(matches!(NativeCodec.decode(&[0x7F]), Err(DecodeError::Malformed { .. })));
    }

    #[test]
    fn invalid_bool_byte_is_malformed() {
        assert!(matches!(
            NativeCodec.decode(&[tags::BOOL, 0x02]),
            Err(DecodeError::Malformed { .. })
        ));
    }

    #[test]
    fn fidelity_is_always_exact() {
        assert_eq!(NativeCodec.fidelity(&Value::complex(1.0, 2.0)), Fidelity::Exact);
        assert_eq!(NativeCodec.fidelity(&Value::Int32(1)), Fidelity::Exact);
    }
}
