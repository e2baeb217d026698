//! Stowage
//!
//! This crate saves dynamically-typed values to files and loads them back,
//! dispatching between serialization formats by filename extension or by an
//! explicit codec choice.
//!
//! # Overview
//!
//! Three pieces compose linearly:
//!
//! - **Values**: the [`Value`] enum — a closed sum type over null, booleans,
//!   integers (wide and 32-bit), floats (wide and 32-bit), complex numbers,
//!   strings, byte strings, arrays, and string-keyed maps.
//! - **Codecs**: the [`Codec`] trait pairs byte-level `encode`/`decode` with
//!   a logical name, a set of claimed file extensions, and a per-value
//!   [`Fidelity`] contract. Built-ins: [`NativeCodec`] (`.p`, `.pickle`),
//!   [`JsonCodec`] (`.json`), and [`MsgpackCodec`] (`.msgpack`), looked up
//!   through a [`CodecRegistry`].
//! - **Store**: the [`Store`] facade resolves a codec (explicit selector
//!   wins, otherwise the extension decides) and performs the whole-file
//!   read or write around it.
//!
//! # Fidelity
//!
//! Codecs have different native type systems, so a save→load round trip
//! preserves different subsets of the value model. The native codec keeps
//! every variant exactly; JSON widens the fixed-width numeric subtypes and
//! rejects complex numbers and byte strings; MessagePack keeps complex
//! numbers through an extension type but collapses numeric subtypes. Each
//! codec reports this per value via [`Codec::fidelity`] — see the codec
//! module docs for the full tables.
//!
//! # Example
//!
//! ```no_run
//! use stowage::{load, save, Value};
//!
//! # fn main() -> stowage::StoreResult<()> {
//! // Extension picks the codec: .json -> JsonCodec
//! save(&Value::from(vec![Value::from(1i64), Value::from(2i64)]), "data.json")?;
//! let restored = load("data.json")?;
//! assert_eq!(restored.as_array().map(<[Value]>::len), Some(2));
//!
//! // Complex numbers need a codec whose model includes them
//! save(&Value::complex(1.0, 2.0), "state.p")?;
//! assert_eq!(load("state.p")?, Value::complex(1.0, 2.0));
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`types`] - The [`Value`] model and [`ValueKind`] discriminant
//! - [`codec`] - The [`Codec`] trait, built-in codecs, and [`CodecRegistry`]
//! - [`store`] - The [`Store`] facade and free `save`/`load` functions
//! - [`error`] - Error types ([`StoreError`] and friends)

// Deny unwrap in library code to ensure proper error handling
#![deny(clippy::unwrap_used)]

pub mod codec;
pub mod error;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use codec::{
    Codec, CodecRegistry, Fidelity, JsonCodec, MsgpackCodec, NativeCodec, PayloadKind,
};
pub use error::{
    DecodeError, EncodeError, RegistryError, ResolveError, StoreError, StoreResult,
};
pub use store::{load, load_with, save, save_with, CodecSelector, Store};
pub use types::{Value, ValueKind};
