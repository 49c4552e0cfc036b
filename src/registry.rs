//! Signature registry and tag index.
//!
//! The registry owns every compiled [`Signature`] in load order and keeps a
//! tag index from each tag to the ids of the signatures carrying it. It is
//! append-only: signatures are never removed or changed once added.
//!
//! Every load is atomic. Definitions are parsed and compiled first; only if
//! all of them succeed are they appended and indexed. A failed load leaves
//! both the signature list and the tag index exactly as they were.
//!
//! # Examples
//!
//! ```rust
//! use sigolyze::Registry;
//!
//! let mut registry = Registry::new();
//! registry.load_str(r#"{
//!     "name": "S1",
//!     "patterns": [{"name": "P1", "value": "Value1", "is_regex": false}],
//!     "tags": ["tag1"]
//! }"#)?;
//!
//! assert_eq!(registry.len(), 1);
//! assert_eq!(registry.signatures_by_tags(&["tag1"])[0].name(), "S1");
//! assert!(registry.signatures_by_tags(&["other"]).is_empty());
//! # Ok::<(), sigolyze::SigolyzeError>(())
//! ```

use std::collections::{BTreeSet, HashMap};
use std::io::Read;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::RegexConfig;
use crate::error::{Result, SigolyzeError};
use crate::loader::{self, SourceFormat, INLINE_ORIGIN, STREAM_ORIGIN};
use crate::signature::{Signature, SignatureDefinition};

/// Position of a signature in registry load order.
pub type SignatureId = usize;

/// Append-only store of compiled signatures.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    signatures: Vec<Signature>,
    tag_index: HashMap<String, Vec<SignatureId>>,
    config: RegexConfig,
}

impl Registry {
    /// Create an empty registry with default regex limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry that compiles regexes with `config`.
    pub fn with_config(config: RegexConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &RegexConfig {
        &self.config
    }

    // Loading

    /// Parse and register one JSON signature definition.
    pub fn load(&mut self, raw: &[u8]) -> Result<SignatureId> {
        self.load_one(raw, SourceFormat::Json, INLINE_ORIGIN)
    }

    /// Parse and register one JSON signature definition held in a string.
    pub fn load_str(&mut self, raw: &str) -> Result<SignatureId> {
        self.load(raw.as_bytes())
    }

    /// Compile and register an already parsed definition.
    pub fn load_definition(&mut self, definition: SignatureDefinition) -> Result<SignatureId> {
        let name = definition.name.clone();
        let signature = Signature::from_definition(definition, &self.config).map_err(|e| {
            warn!(signature = %name, error = %e, "rejected signature");
            e
        })?;
        Ok(self.insert(signature))
    }

    /// Parse and register a JSON document holding one definition or an
    /// array of definitions. Nothing is registered unless all of them build.
    pub fn load_bundle(&mut self, raw: &[u8]) -> Result<Vec<SignatureId>> {
        self.load_many(raw, SourceFormat::Json, INLINE_ORIGIN)
    }

    /// Read a signature file and register every definition in it.
    ///
    /// `.yaml`/`.yml` files are read as YAML, everything else as JSON.
    pub fn load_from_path(&mut self, path: impl AsRef<Path>) -> Result<Vec<SignatureId>> {
        let path = path.as_ref();
        let definitions = loader::load_path(path).map_err(|e| {
            warn!(path = %path.display(), error = %e, "failed to load signature file");
            e
        })?;
        let ids = self.commit(definitions)?;
        debug!(path = %path.display(), loaded = ids.len(), "loaded signature file");
        Ok(ids)
    }

    /// Read a stream to its end and register every definition in it.
    pub fn load_from_reader<R: Read>(
        &mut self,
        reader: R,
        format: SourceFormat,
    ) -> Result<Vec<SignatureId>> {
        let raw = loader::read_stream(reader).map_err(|e| {
            warn!(origin = STREAM_ORIGIN, error = %e, "failed to read signature stream");
            e
        })?;
        self.load_many(&raw, format, STREAM_ORIGIN)
    }

    /// Register every signature file directly inside `dir`.
    ///
    /// Files are read in path order. The whole directory loads atomically:
    /// if any file fails to read, parse or compile, nothing is registered.
    pub fn load_from_dir(&mut self, dir: impl AsRef<Path>) -> Result<Vec<SignatureId>> {
        let dir = dir.as_ref();
        let warn_rejected = |e: SigolyzeError| {
            warn!(dir = %dir.display(), error = %e, "failed to load signature directory");
            e
        };

        let mut definitions = Vec::new();
        for path in loader::signature_files(dir).map_err(warn_rejected)? {
            definitions.extend(loader::load_path(&path).map_err(warn_rejected)?);
        }

        let ids = self.commit(definitions)?;
        info!(dir = %dir.display(), loaded = ids.len(), "loaded signature directory");
        Ok(ids)
    }

    fn load_one(&mut self, raw: &[u8], format: SourceFormat, origin: &str) -> Result<SignatureId> {
        let definition = loader::parse_definition(raw, format, origin).map_err(|e| {
            warn!(origin, error = %e, "rejected signature definition");
            e
        })?;
        self.load_definition(definition)
    }

    fn load_many(
        &mut self,
        raw: &[u8],
        format: SourceFormat,
        origin: &str,
    ) -> Result<Vec<SignatureId>> {
        let definitions = loader::parse_definitions(raw, format, origin).map_err(|e| {
            warn!(origin, error = %e, "rejected signature document");
            e
        })?;
        self.commit(definitions)
    }

    /// Build every definition, then register them all or none.
    fn commit(&mut self, definitions: Vec<SignatureDefinition>) -> Result<Vec<SignatureId>> {
        let signatures = definitions
            .into_iter()
            .map(|definition| Signature::from_definition(definition, &self.config))
            .collect::<Result<Vec<_>>>()
            .map_err(|e| {
                warn!(error = %e, "rejected signature batch");
                e
            })?;

        Ok(signatures
            .into_iter()
            .map(|signature| self.insert(signature))
            .collect())
    }

    fn insert(&mut self, signature: Signature) -> SignatureId {
        let id = self.signatures.len();
        // Tags are already unique per signature, so each id lands once per tag
        for tag in signature.tags() {
            self.tag_index.entry(tag.clone()).or_default().push(id);
        }
        debug!(signature = %signature.name(), id, "registered signature");
        self.signatures.push(signature);
        id
    }

    // Queries

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    pub fn get(&self, id: SignatureId) -> Option<&Signature> {
        self.signatures.get(id)
    }

    /// All signatures in load order.
    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Signature> {
        self.signatures.iter()
    }

    /// Every indexed tag, in no particular order.
    pub fn tags(&self) -> impl Iterator<Item = &str> + '_ {
        self.tag_index.keys().map(String::as_str)
    }

    pub fn tag_count(&self) -> usize {
        self.tag_index.len()
    }

    /// Ids of the signatures carrying any of `tags`, deduplicated, ascending.
    pub fn signature_ids_by_tags<S: AsRef<str>>(&self, tags: &[S]) -> Vec<SignatureId> {
        let ids: BTreeSet<SignatureId> = tags
            .iter()
            .filter_map(|tag| self.tag_index.get(tag.as_ref()))
            .flatten()
            .copied()
            .collect();
        ids.into_iter().collect()
    }

    /// Signatures carrying any of `tags`, deduplicated, in load order.
    ///
    /// Unknown tags contribute nothing; an empty tag list yields nothing.
    pub fn signatures_by_tags<S: AsRef<str>>(&self, tags: &[S]) -> Vec<&Signature> {
        self.signature_ids_by_tags(tags)
            .into_iter()
            .map(|id| &self.signatures[id])
            .collect()
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a Signature;
    type IntoIter = std::slice::Iter<'a, Signature>;

    fn into_iter(self) -> Self::IntoIter {
        self.signatures.iter()
    }
}
