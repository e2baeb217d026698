//! Codec registry: logical names and filename extensions to codec handles.
//!
//! The registry is an explicit, constructed-once object — there is no
//! hidden module-level extension map. Lookups are pure reads, so a shared
//! registry needs no locking once built. [`CodecRegistry::with_builtins`]
//! preloads the three built-in codecs; [`CodecRegistry::empty`] starts
//! from nothing for isolated test registries and custom codec stacks.
//!
//! # Example
//!
//! ```
//! use stowage::{Codec, CodecRegistry};
//!
//! let registry = CodecRegistry::with_builtins();
//! assert_eq!(registry.get("json").unwrap().name(), "json");
//! assert_eq!(registry.for_path("data.pickle".as_ref()).unwrap().name(), "native");
//! assert!(registry.for_path("data.xml".as_ref()).is_err());
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use super::{Codec, JsonCodec, MsgpackCodec, NativeCodec};
use crate::error::{RegistryError, ResolveError};

/// Maps logical codec names and filename extensions to codec handles.
///
/// Invariants, enforced at registration:
/// - every codec name is unique,
/// - every codec claims at least one extension,
/// - no two codecs claim the same extension.
pub struct CodecRegistry {
    codecs: Vec<Arc<dyn Codec>>,
    by_name: HashMap<String, usize>,
    by_extension: HashMap<String, usize>,
}

impl CodecRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn empty() -> Self {
        Self { codecs: Vec::new(), by_name: HashMap::new(), by_extension: HashMap::new() }
    }

    /// Creates a registry preloaded with the built-in codecs
    /// ([`NativeCodec`], [`JsonCodec`], [`MsgpackCodec`]).
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        // The builtin name/extension sets are disjoint by construction.
        registry.register(Arc::new(NativeCodec)).expect("builtin codec registration");
        registry.register(Arc::new(JsonCodec)).expect("builtin codec registration");
        registry.register(Arc::new(MsgpackCodec)).expect("builtin codec registration");
        registry
    }

    /// Registers a codec, claiming its name and all of its extensions.
    ///
    /// # Errors
    ///
    /// Returns an error if the codec's name is already registered, if it
    /// declares no extensions, or if any of its extensions is already
    /// claimed by another codec. On error the registry is unchanged.
    pub fn register(&mut self, codec: Arc<dyn Codec>) -> Result<(), RegistryError> {
        let name = codec.name().to_owned();
        if self.by_name.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }
        let extensions = codec.extensions();
        if extensions.is_empty() {
            return Err(RegistryError::NoExtensions(name));
        }
        for ext in extensions {
            if let Some(&idx) = self.by_extension.get(*ext) {
                return Err(RegistryError::DuplicateExtension {
                    extension: (*ext).to_owned(),
                    existing: self.codecs[idx].name().to_owned(),
                    incoming: name,
                });
            }
        }

        let idx = self.codecs.len();
        for ext in extensions {
            self.by_extension.insert((*ext).to_owned(), idx);
        }
        self.by_name.insert(name, idx);
        self.codecs.push(codec);
        Ok(())
    }

    /// Resolves a codec by its logical name.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::UnknownCodec`] if no codec carries `name`.
    pub fn get(&self, name: &str) -> Result<Arc<dyn Codec>, ResolveError> {
        self.by_name
            .get(name)
            .map(|&idx| Arc::clone(&self.codecs[idx]))
            .ok_or_else(|| ResolveError::unknown_codec(name))
    }

    /// Resolves a codec from a path's filename extension.
    ///
    /// The extension is the suffix after the last `.` of the final path
    /// component (`Path::extension` semantics) and is matched
    /// case-sensitively against the registered claims.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::MissingExtension`] when the path has no
    /// extension and [`ResolveError::UnrecognizedExtension`] when the
    /// extension matches no registered codec.
    pub fn for_path(&self, path: &Path) -> Result<Arc<dyn Codec>, ResolveError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| ResolveError::MissingExtension {
                path: path.display().to_string(),
            })?;
        self.by_extension
            .get(extension)
            .map(|&idx| Arc::clone(&self.codecs[idx]))
            .ok_or_else(|| ResolveError::UnrecognizedExtension {
                extension: extension.to_owned(),
                path: path.display().to_string(),
            })
    }

    /// Iterates over all registered codecs in registration order.
    pub fn codecs(&self) -> impl Iterator<Item = &Arc<dyn Codec>> {
        self.codecs.iter()
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl std::fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecRegistry")
            .field("codecs", &self.codecs.iter().map(|c| c.name()).collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{Fidelity, PayloadKind};
    use crate::error::{DecodeError, EncodeError};
    use crate::types::Value;

    /// A minimal codec for registry tests.
    struct FakeCodec {
        name: &'static str,
        extensions: &'static [&'static str],
    }

    impl Codec for FakeCodec {
        fn name(&self) -> &str {
            self.name
        }

        fn extensions(&self) -> &[&str] {
            self.extensions
        }

        fn payload_kind(&self) -> PayloadKind {
            PayloadKind::Binary
        }

        fn fidelity(&self, _value: &Value) -> Fidelity {
            Fidelity::Exact
        }

        fn encode(&self, _value: &Value) -> Result<Vec<u8>, EncodeError> {
            Ok(Vec::new())
        }

        fn decode(&self, _bytes: &[u8]) -> Result<Value, DecodeError> {
            Ok(Value::Null)
        }
    }

    #[test]
    fn builtins_are_resolvable_by_name() {
        let registry = CodecRegistry::with_builtins();
        for name in ["native", "json", "msgpack"] {
            assert_eq!(registry.get(name).unwrap().name(), name);
        }
        assert_eq!(registry.codecs().count(), 3);
    }

    #[test]
    fn builtins_are_resolvable_by_extension() {
        let registry = CodecRegistry::with_builtins();
        for (file, codec) in [
            ("a.p", "native"),
            ("a.pickle", "native"),
            ("a.json", "json"),
            ("a.msgpack", "msgpack"),
            ("dir/with.dots/a.b.json", "json"),
        ] {
            assert_eq!(registry.for_path(file.as_ref()).unwrap().name(), codec, "{file}");
        }
    }

    #[test]
    fn unknown_name_fails() {
        let registry = CodecRegistry::with_builtins();
        assert!(matches!(
            registry.get("yaml"),
            Err(ResolveError::UnknownCodec { name }) if name == "yaml"
        ));
    }

    #[test]
    fn unrecognized_extension_fails() {
        let registry = CodecRegistry::with_builtins();
        assert!(matches!(
            registry.for_path("a.unknownext".as_ref()),
            Err(ResolveError::UnrecognizedExtension { extension, .. }) if extension == "unknownext"
        ));
    }

    #[test]
    fn missing_extension_fails() {
        let registry = CodecRegistry::with_builtins();
        assert!(matches!(
            registry.for_path("noext".as_ref()),
            Err(ResolveError::MissingExtension { .. })
        ));
    }

    #[test]
    fn extension_match_is_case_sensitive() {
        let registry = CodecRegistry::with_builtins();
        assert!(registry.for_path("a.JSON".as_ref()).is_err());
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let mut registry = CodecRegistry::with_builtins();
        let err = registry
            .register(Arc::new(FakeCodec { name: "json", extensions: &["j5"] }))
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateName(name) if name == "json"));
    }

    #[test]
    fn duplicate_extension_is_rejected() {
        let mut registry = CodecRegistry::with_builtins();
        let err = registry
            .register(Arc::new(FakeCodec { name: "other", extensions: &["json"] }))
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::DuplicateExtension { extension, existing, incoming }
                if extension == "json" && existing == "json" && incoming == "other"
        ));
        // Registration failed, so the name stays free.
        assert!(registry.get("other").is_err());
    }

    #[test]
    fn empty_extension_set_is_rejected() {
        let mut registry = CodecRegistry::empty();
        let err =
            registry.register(Arc::new(FakeCodec { name: "bare", extensions: &[] })).unwrap_err();
        assert!(matches!(err, RegistryError::NoExtensions(name) if name == "bare"));
    }

    #[test]
    fn isolated_registry_sees_only_its_codecs() {
        let mut registry = CodecRegistry::empty();
        registry
            .register(Arc::new(FakeCodec { name: "fake", extensions: &["fk"] }))
            .unwrap();
        assert!(registry.get("json").is_err());
        assert_eq!(registry.for_path("a.fk".as_ref()).unwrap().name(), "fake");
    }
}
