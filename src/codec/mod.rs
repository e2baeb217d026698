//! Codec abstraction and built-in codecs.
//!
//! A codec pairs a byte-level `encode`/`decode` strategy with a logical
//! name, a set of claimed filename extensions, and a per-value fidelity
//! contract. Codecs are stateless and shared behind `Arc<dyn Codec>`; the
//! [`CodecRegistry`] resolves them by name or by extension.
//!
//! # Built-in codecs
//!
//! | Codec | Name | Extensions | Payload |
//! |-------|------|------------|---------|
//! | [`NativeCodec`] | `native` | `.p`, `.pickle` | binary |
//! | [`JsonCodec`] | `json` | `.json` | text |
//! | [`MsgpackCodec`] | `msgpack` | `.msgpack` | binary |
//!
//! # Fidelity
//!
//! Wire formats have different native type systems, so each codec reports,
//! per value, how faithfully a save→load round trip preserves it:
//!
//! - [`Fidelity::Exact`] - the value and its variant survive unchanged.
//! - [`Fidelity::ValueOnly`] - the numeric value survives but a
//!   fixed-width subtype is widened to the codec's generic numeric type.
//! - [`Fidelity::Unsupported`] - the codec rejects the value with an
//!   [`EncodeError`](crate::error::EncodeError).
//!
//! The classification is load-bearing: the property tests assert that the
//! reported fidelity agrees with the observed round-trip behavior for
//! every generated value.
//!
//! # Example
//!
//! ```
//! use stowage::{Codec, Fidelity, JsonCodec, NativeCodec, Value};
//!
//! let z = Value::complex(1.0, 2.0);
//! assert_eq!(NativeCodec.fidelity(&z), Fidelity::Exact);
//! assert_eq!(JsonCodec.fidelity(&z), Fidelity::Unsupported);
//!
//! let bytes = NativeCodec.encode(&z).unwrap();
//! assert_eq!(NativeCodec.decode(&bytes).unwrap(), z);
//! ```

mod json;
mod msgpack;
mod native;
mod registry;


pub use json::JsonCodec;
pub use msgpack::MsgpackCodec;
pub use native::NativeCodec;
pub use registry::CodecRegistry;

use crate::error::{DecodeError, EncodeError};
use crate::types::Value;

/// How faithfully a codec round-trips a particular value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fidelity {
    /// The value and its variant survive a round trip exactly.
    Exact,
    /// The numeric value survives but the variant may be widened; the
    /// round trip satisfies [`Value::value_eq`] rather than strict
    /// equality.
    ValueOnly,
    /// The codec rejects the value at encode time.
    Unsupported,
}

impl Fidelity {
    /// Combines the fidelity of a composite with one of its elements,
    /// keeping the weaker guarantee.
    #[must_use]
    pub fn combine(self, other: Self) -> Self {
        match (self, other) {
            (Self::Unsupported, _) | (_, Self::Unsupported) => Self::Unsupported,
            (Self::ValueOnly, _) | (_, Self::ValueOnly) => Self::ValueOnly,
            (Self::Exact, Self::Exact) => Self::Exact,
        }
    }
}

/// Whether a codec's payload is text or raw bytes.
///
/// Rust's filesystem API draws no text/binary distinction, so this is
/// metadata rather than an I/O mode switch: codecs reporting
/// [`PayloadKind::Text`] guarantee that `encode` produces valid UTF-8,
/// which callers handing payloads to text-oriented sinks may rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    /// The encoded payload is valid UTF-8 text.
    Text,
    /// The encoded payload is raw bytes.
    Binary,
}

/// A serialization strategy bound to a logical name and a set of filename
/// extensions.
///
/// Implementations are stateless and cheap to share; the registry hands
/// them out as `Arc<dyn Codec>`. Each implementation encodes and decodes
/// with an exhaustive match over [`Value`] variants, making the supported
/// subset of the value model explicit in the code.
pub trait Codec: Send + Sync {
    /// The logical identifier used for explicit codec selection.
    fn name(&self) -> &str;

    /// The filename extensions this codec claims, without leading dots.
    ///
    /// Must be non-empty; the registry rejects codecs with no extensions
    /// and extensions already claimed by another codec.
    fn extensions(&self) -> &[&str];

    /// Whether the encoded payload is text or raw bytes.
    fn payload_kind(&self) -> PayloadKind;

    /// Reports how faithfully this codec round-trips `value`.
    ///
    /// The answer recurses through arrays and maps, so a composite is only
    /// [`Fidelity::Exact`] when every element is.
    fn fidelity(&self, value: &Value) -> Fidelity;

    /// Encodes `value` into this codec's wire format.
    ///
    /// # Errors
    ///
    /// Returns an error if the value lies outside the codec's native type
    /// system or violates a limit of the wire format.
    fn encode(&self, value: &Value) -> Result<Vec<u8>, EncodeError>;

    /// Decodes a complete payload in this codec's wire format.
    ///
    /// The payload must contain exactly one value; trailing bytes are a
    /// decode error.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is malformed, truncated, or
    /// contains data outside the value model.
    fn decode(&self, bytes: &[u8]) -> Result<Value, DecodeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fidelity_combine_keeps_weakest() {
        assert_eq!(Fidelity::Exact.combine(Fidelity::Exact), Fidelity::Exact);
        assert_eq!(Fidelity::Exact.combine(Fidelity::ValueOnly), Fidelity::ValueOnly);
        assert_eq!(Fidelity::ValueOnly.combine(Fidelity::Unsupported), Fidelity::Unsupported);
        assert_eq!(Fidelity::Unsupported.combine(Fidelity::Exact), Fidelity::Unsupported);
    }
}
