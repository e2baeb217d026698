//! Save/load facade over the codec registry.
//!
//! A [`Store`] owns a [`CodecRegistry`] and wraps whole-file I/O around a
//! resolved codec: an explicit [`CodecSelector`] beats inference from the
//! target filename's extension. The free functions [`save`], [`save_with`],
//! [`load`], and [`load_with`] operate on a process-wide default store
//! (built lazily on first use, with the built-in codecs); construct a
//! `Store` with [`Store::with_registry`] to use an isolated registry.
//!
//! Both operations are synchronous and blocking: one open, one full-buffer
//! read or write, one close. Concurrent saves to the same path are
//! last-writer-wins; no atomic-rename guarantee is made.
//!
//! # Example
//!
//! ```no_run
//! use stowage::{CodecSelector, Store, Value};
//!
//! # fn main() -> stowage::StoreResult<()> {
//! let store = Store::new();
//!
//! // Extension picks the codec
//! store.save(&Value::Int(1), "one.msgpack")?;
//!
//! // An explicit name overrides the extension
//! store.save_with(&Value::Int(2), "two.dat", "json")?;
//! assert_eq!(store.load_with("two.dat", "json")?, Value::Int(2));
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;
use tracing::debug;

use crate::codec::{Codec, CodecRegistry};
use crate::error::{ResolveError, StoreResult};
use crate::types::Value;

/// The process-wide default store, built on first use and immutable after.
static DEFAULT_STORE: Lazy<Store> = Lazy::new(Store::new);

/// An explicit codec choice, by logical name or by resolved handle.
#[derive(Clone)]
pub enum CodecSelector {
    /// Look the codec up by its logical name in the store's registry.
    Name(String),
    /// Use this codec directly, bypassing the registry.
    Handle(Arc<dyn Codec>),
}

impl From<&str> for CodecSelector {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

impl From<String> for CodecSelector {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<Arc<dyn Codec>> for CodecSelector {
    fn from(codec: Arc<dyn Codec>) -> Self {
        Self::Handle(codec)
    }
}

impl fmt::Debug for CodecSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.debug_tuple("Name").field(name).finish(),
            Self::Handle(codec) => f.debug_tuple("Handle").field(&codec.name()).finish(),
        }
    }
}

/// Save/load entry points bound to a codec registry.
pub struct Store {
    registry: CodecRegistry,
}

impl Store {
    /// Creates a store with the built-in codecs.
    #[must_use]
    pub fn new() -> Self {
        Self { registry: CodecRegistry::with_builtins() }
    }

    /// Creates a store over a caller-built registry.
    #[must_use]
    pub const fn with_registry(registry: CodecRegistry) -> Self {
        Self { registry }
    }

    /// The registry this store resolves codecs from.
    #[must_use]
    pub const fn registry(&self) -> &CodecRegistry {
        &self.registry
    }

    /// Encodes `value` and writes it to `path`, truncating any existing
    /// content. The codec is inferred from the path's extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the extension matches no registered codec, if
    /// the codec cannot encode the value, or if writing fails. On an
    /// encode error the file is not touched; on a write error its contents
    /// are undefined.
    pub fn save<P: AsRef<Path>>(&self, value: &Value, path: P) -> StoreResult<()> {
        self.save_impl(value, path.as_ref(), None)
    }

    /// Like [`Store::save`], with an explicit codec name or handle
    /// overriding extension inference.
    ///
    /// # Errors
    ///
    /// As [`Store::save`], except resolution fails only for an unknown
    /// codec name.
    pub fn save_with<P, S>(&self, value: &Value, path: P, codec: S) -> StoreResult<()>
    where
        P: AsRef<Path>,
        S: Into<CodecSelector>,
    {
        self.save_impl(value, path.as_ref(), Some(codec.into()))
    }

    /// Reads `path` in full and decodes it. The codec is inferred from the
    /// path's extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the extension matches no registered codec, if
    /// reading fails, or if the contents do not decode under the resolved
    /// codec.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> StoreResult<Value> {
        self.load_impl(path.as_ref(), None)
    }

    /// Like [`Store::load`], with an explicit codec name or handle
    /// overriding extension inference.
    ///
    /// # Errors
    ///
    /// As [`Store::load`], except resolution fails only for an unknown
    /// codec name.
    pub fn load_with<P, S>(&self, path: P, codec: S) -> StoreResult<Value>
    where
        P: AsRef<Path>,
        S: Into<CodecSelector>,
    {
        self.load_impl(path.as_ref(), Some(codec.into()))
    }

    /// Explicit selector wins; otherwise the extension decides.
    fn resolve(
        &self,
        path: &Path,
        selector: Option<&CodecSelector>,
    ) -> Result<Arc<dyn Codec>, ResolveError> {
        match selector {
            Some(CodecSelector::Name(name)) => self.registry.get(name),
            Some(CodecSelector::Handle(codec)) => Ok(Arc::clone(codec)),
            None => self.registry.for_path(path),
        }
    }

    fn save_impl(
        &self,
        value: &Value,
        path: &Path,
        selector: Option<CodecSelector>,
    ) -> StoreResult<()> {
        let codec = self.resolve(path, selector.as_ref())?;
        let bytes = codec.encode(value)?;
        debug!(codec = codec.name(), path = %path.display(), bytes = bytes.len(), "save");
        fs::write(path, bytes)?;
        Ok(())
    }

    fn load_impl(&self, path: &Path, selector: Option<CodecSelector>) -> StoreResult<Value> {
        let codec = self.resolve(path, selector.as_ref())?;
        let bytes = fs::read(path)?;
        debug!(codec = codec.name(), path = %path.display(), bytes = bytes.len(), "load");
        Ok(codec.decode(&bytes)?)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store").field("registry", &self.registry).finish()
    }
}

/// Saves `value` to `path` with the default store, inferring the codec
/// from the path's extension.
///
/// # Errors
///
/// See [`Store::save`].
pub fn save<P: AsRef<Path>>(value: &Value, path: P) -> StoreResult<()> {
    DEFAULT_STORE.save(value, path)
}

/// Saves `value` to `path` with the default store and an explicit codec.
///
/// # Errors
///
/// See [`Store::save_with`].
pub fn save_with<P, S>(value: &Value, path: P, codec: S) -> StoreResult<()>
where
    P: AsRef<Path>,
    S: Into<CodecSelector>,
{
    DEFAULT_STORE.save_with(value, path, codec)
}

/// Loads a value from `path` with the default store, inferring the codec
/// from the path's extension.
///
/// # Errors
///
/// See [`Store::load`].
pub fn load<P: AsRef<Path>>(path: P) -> StoreResult<Value> {
    DEFAULT_STORE.load(path)
}

/// Loads a value from `path` with the default store and an explicit codec.
///
/// # Errors
///
/// See [`Store::load_with`].
pub fn load_with<P, S>(path: P, codec: S) -> StoreResult<Value>
where
    P: AsRef<Path>,
    S: Into<CodecSelector>,
{
    DEFAULT_STORE.load_with(path, codec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_from_impls() {
        assert!(matches!(CodecSelector::from("json"), CodecSelector::Name(n) if n == "json"));
        assert!(matches!(
            CodecSelector::from("json".to_owned()),
            CodecSelector::Name(n) if n == "json"
        ));
        let handle: Arc<dyn Codec> = Arc::new(crate::codec::JsonCodec);
        assert!(matches!(CodecSelector::from(handle), CodecSelector::Handle(_)));
    }

    #[test]
    fn selector_debug_uses_codec_name() {
        let handle: Arc<dyn Codec> = Arc::new(crate::codec::NativeCodec);
        let rendered = format!("{:?}", CodecSelector::from(handle));
        assert!(rendered.contains("native"));
    }
}
