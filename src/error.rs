//! Error types for codec registration, resolution, encoding, decoding, and
//! the store facade.

use std::io;

use thiserror::Error;

use crate::types::ValueKind;

/// Errors that can occur while building a codec registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A codec with the same logical name is already registered.
    #[error("codec `{0}` is already registered")]
    DuplicateName(String),

    /// Two codecs claim the same filename extension.
    #[error("extension `.{extension}` is claimed by both `{existing}` and `{incoming}`")]
    DuplicateExtension {
        /// The contested extension (without the leading dot).
        extension: String,
        /// The codec that already owns the extension.
        existing: String,
        /// The codec whose registration was rejected.
        incoming: String,
    },

    /// A codec declares no filename extensions at all.
    #[error("codec `{0}` declares no filename extensions")]
    NoExtensions(String),
}

/// Errors that can occur while resolving a codec by name or by filename.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// An explicit codec name did not match any registered codec.
    #[error("unknown codec `{name}`")]
    UnknownCodec {
        /// The name that was looked up.
        name: String,
    },

    /// The filename's extension matched no registered codec.
    #[error("unrecognized extension `.{extension}` in `{path}`")]
    UnrecognizedExtension {
        /// The extension that was extracted (without the leading dot).
        extension: String,
        /// The path the extension came from.
        path: String,
    },

    /// The filename carries no extension to infer a codec from.
    #[error("`{path}` has no extension to infer a codec from; pass one explicitly")]
    MissingExtension {
        /// The offending path.
        path: String,
    },
}

impl ResolveError {
    /// Creates an unknown-codec error.
    pub fn unknown_codec(name: impl Into<String>) -> Self {
        Self::UnknownCodec { name: name.into() }
    }
}

/// Errors raised by a codec's encode routine.
///
/// Encoding is deterministic, so these are never retried; they surface to
/// the caller with the value category or the underlying cause attached.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The value category lies outside the codec's native type system.
    #[error("codec `{codec}` cannot encode {kind} values")]
    UnsupportedType {
        /// The codec that rejected the value.
        codec: String,
        /// The kind of value that was rejected.
        kind: ValueKind,
    },

    /// The value is representable in principle but violates a limit of the
    /// wire format (e.g. a non-finite number in JSON, an oversized string).
    #[error("codec `{codec}` cannot encode value: {message}")]
    InvalidValue {
        /// The codec that rejected the value.
        codec: String,
        /// A description of the violation.
        message: String,
    },

    /// The underlying serializer failed.
    #[error("codec `{codec}` failed to encode value")]
    Codec {
        /// The codec whose serializer failed.
        codec: String,
        /// The serializer's own error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl EncodeError {
    /// Creates an unsupported-type error.
    pub fn unsupported(codec: impl Into<String>, kind: ValueKind) -> Self {
        Self::UnsupportedType { codec: codec.into(), kind }
    }

    /// Creates an invalid-value error.
    pub fn invalid_value(codec: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue { codec: codec.into(), message: message.into() }
    }

    /// Wraps an underlying serializer error.
    pub fn codec(
        codec: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Codec { codec: codec.into(), source: Box::new(source) }
    }
}

/// Errors raised by a codec's decode routine.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The payload does not conform to the codec's wire format.
    #[error("codec `{codec}` failed to decode payload: {message}")]
    Malformed {
        /// The codec that rejected the payload.
        codec: String,
        /// A description of the malformation.
        message: String,
    },

    /// The payload contains a number that does not fit the value model.
    #[error("codec `{codec}` read integer {value} which exceeds the value model")]
    OutOfRange {
        /// The codec that read the number.
        codec: String,
        /// The out-of-range magnitude.
        value: u64,
    },

    /// The underlying deserializer failed.
    #[error("codec `{codec}` failed to decode payload")]
    Codec {
        /// The codec whose deserializer failed.
        codec: String,
        /// The deserializer's own error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl DecodeError {
    /// Creates a malformed-payload error.
    pub fn malformed(codec: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Malformed { codec: codec.into(), message: message.into() }
    }

    /// Wraps an underlying deserializer error.
    pub fn codec(
        codec: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Codec { codec: codec.into(), source: Box::new(source) }
    }
}

/// Errors that can occur during a save or load operation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Codec resolution failed.
    #[error("codec resolution failed: {0}")]
    Resolve(#[from] ResolveError),

    /// The resolved codec could not encode the value.
    #[error("encode failed: {0}")]
    Encode(#[from] EncodeError),

    /// The resolved codec could not decode the file contents.
    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),

    /// An I/O error occurred while reading or writing the target file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A specialized `Result` type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
