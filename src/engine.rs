//! Primary match engine.
//!
//! [`SignatureEngine`] owns a [`Registry`] and answers which signatures
//! match an input. Loading needs `&mut self` and matching needs `&self`, so
//! the borrow checker keeps loads from overlapping with queries. A loaded
//! engine can be shared across threads (for example behind an `Arc`) and
//! queried concurrently without locking.
//!
//! # Examples
//!
//! ```rust
//! use sigolyze::SignatureEngine;
//!
//! let mut engine = SignatureEngine::new();
//! engine.load_str(r#"{
//!     "name": "S1",
//!     "patterns": [
//!         {"name": "P1", "value": "Value1", "is_regex": false},
//!         {"name": "P2", "value": "Value2", "is_regex": false}
//!     ],
//!     "tags": ["tag1"]
//! }"#)?;
//!
//! assert_eq!(engine.matched_names("xValue1y"), vec!["S1"]);
//! assert!(engine.match_all("nothing").is_empty());
//! assert_eq!(engine.match_by_tags("Value2", &["tag1"]).len(), 1);
//! assert!(engine.match_by_tags("Value2", &["other"]).is_empty());
//! # Ok::<(), sigolyze::SigolyzeError>(())
//! ```

use std::io::Read;
use std::path::Path;

use rayon::prelude::*;
use tracing::trace;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::loader::SourceFormat;
use crate::registry::{Registry, SignatureId};
use crate::signature::{Signature, SignatureDefinition};

/// Signature matching engine.
#[derive(Debug, Clone, Default)]
pub struct SignatureEngine {
    registry: Registry,
    config: EngineConfig,
}

impl SignatureEngine {
    /// Create an empty engine with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty engine with custom configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            registry: Registry::with_config(config.regex.clone()),
            config,
        }
    }

    /// Wrap an existing registry.
    ///
    /// Signatures already in the registry keep the regex limits they were
    /// built with; `config.regex` is not applied to them.
    pub fn from_registry(registry: Registry, config: EngineConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn into_registry(self) -> Registry {
        self.registry
    }

    // Build phase

    /// See [`Registry::load`].
    pub fn load(&mut self, raw: &[u8]) -> Result<SignatureId> {
        self.registry.load(raw)
    }

    /// See [`Registry::load_str`].
    pub fn load_str(&mut self, raw: &str) -> Result<SignatureId> {
        self.registry.load_str(raw)
    }

    /// See [`Registry::load_definition`].
    pub fn load_definition(&mut self, definition: SignatureDefinition) -> Result<SignatureId> {
        self.registry.load_definition(definition)
    }

    /// See [`Registry::load_bundle`].
    pub fn load_bundle(&mut self, raw: &[u8]) -> Result<Vec<SignatureId>> {
        self.registry.load_bundle(raw)
    }

    /// See [`Registry::load_from_path`].
    pub fn load_from_path(&mut self, path: impl AsRef<Path>) -> Result<Vec<SignatureId>> {
        self.registry.load_from_path(path)
    }

    /// See [`Registry::load_from_reader`].
    pub fn load_from_reader<R: Read>(
        &mut self,
        reader: R,
        format: SourceFormat,
    ) -> Result<Vec<SignatureId>> {
        self.registry.load_from_reader(reader, format)
    }

    /// See [`Registry::load_from_dir`].
    pub fn load_from_dir(&mut self, dir: impl AsRef<Path>) -> Result<Vec<SignatureId>> {
        self.registry.load_from_dir(dir)
    }

    // Query phase

    /// Every signature matching `data`, in registry order.
    ///
    /// A signature matches when any of its literals occurs in `data` or any
    /// of its regexes matches `data`. Each signature appears at most once.
    pub fn match_all(&self, data: impl AsRef<[u8]>) -> Vec<&Signature> {
        let candidates: Vec<&Signature> = self.registry.iter().collect();
        self.evaluate(candidates, data.as_ref())
    }

    /// Like [`match_all`](Self::match_all), restricted to signatures
    /// carrying at least one of `tags`.
    pub fn match_by_tags<S: AsRef<str>>(
        &self,
        data: impl AsRef<[u8]>,
        tags: &[S],
    ) -> Vec<&Signature> {
        let candidates = self.registry.signatures_by_tags(tags);
        self.evaluate(candidates, data.as_ref())
    }

    /// Run [`match_all`](Self::match_all) over each input.
    ///
    /// Results line up with `inputs`.
    pub fn match_batch<D>(&self, inputs: &[D]) -> Vec<Vec<&Signature>>
    where
        D: AsRef<[u8]> + Sync,
    {
        if self.config.parallel.parallel_batch(inputs.len()) {
            inputs.par_iter().map(|data| self.match_all(data)).collect()
        } else {
            inputs.iter().map(|data| self.match_all(data)).collect()
        }
    }

    /// Names of the signatures matching `data`, in registry order.
    pub fn matched_names(&self, data: impl AsRef<[u8]>) -> Vec<&str> {
        self.match_all(data)
            .into_iter()
            .map(Signature::name)
            .collect()
    }

    fn evaluate<'a>(&self, candidates: Vec<&'a Signature>, data: &[u8]) -> Vec<&'a Signature> {
        let total = candidates.len();
        let matched: Vec<&Signature> = if self.config.parallel.parallel_signatures(total) {
            candidates
                .into_par_iter()
                .filter(|signature| signature.is_match(data))
                .collect()
        } else {
            candidates
                .into_iter()
                .filter(|signature| signature.is_match(data))
                .collect()
        };

        trace!(candidates = total, matched = matched.len(), "evaluated signatures");
        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::Pattern;

    const EXAMPLE: &str = r#"{
        "name": "S1",
        "patterns": [
            {"name": "P1", "value": "Value1", "is_regex": false},
            {"name": "P2", "value": "Value2", "is_regex": false}
        ],
        "tags": ["tag1"]
    }"#;

    fn engine_with(config: EngineConfig) -> SignatureEngine {
        let mut engine = SignatureEngine::with_config(config);
        for i in 0..300 {
            let definition = SignatureDefinition::new(format!("sig{i}"))
                .with_pattern(Pattern::literal("lit", format!("needle{i}x")))
                .with_tag(if i % 2 == 0 { "even" } else { "odd" });
            engine.load_definition(definition).unwrap();
        }
        engine
    }

    #[test]
    fn test_example_signature() {
        let mut engine = SignatureEngine::new();
        engine.load_str(EXAMPLE).unwrap();

        assert_eq!(engine.matched_names("xValue1y"), vec!["S1"]);
        assert!(engine.match_all("nothing").is_empty());
        assert_eq!(
            engine
                .match_by_tags("Value2", &["tag1"])
                .into_iter()
                .map(Signature::name)
                .collect::<Vec<_>>(),
            vec!["S1"]
        );
        assert!(engine.match_by_tags("Value2", &["other"]).is_empty());
    }

    #[test]
    fn test_literal_and_regex_both_matching_reports_once() {
        let mut engine = SignatureEngine::new();
        engine
            .load_definition(
                SignatureDefinition::new("both")
                    .with_pattern(Pattern::literal("lit", "Value1"))
                    .with_pattern(Pattern::regex("re1", "Val.e1"))
                    .with_pattern(Pattern::regex("re2", "[0-9]")),
            )
            .unwrap();

        assert_eq!(engine.match_all("Value1").len(), 1);
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let sequential = engine_with(EngineConfig::development());
        let parallel = engine_with(
            EngineConfig::new()
                .with_parallel_matching(true)
                .with_min_signatures_for_parallelism(1),
        );

        let data = "needle7x needle150x needle299x needle1000x";
        let expected = sequential.matched_names(data);
        assert_eq!(expected, vec!["sig7", "sig150", "sig299"]);
        assert_eq!(parallel.matched_names(data), expected);

        let odd: Vec<&str> = parallel
            .match_by_tags(data, &["odd"])
            .into_iter()
            .map(Signature::name)
            .collect();
        assert_eq!(odd, vec!["sig7", "sig299"]);
    }

    #[test]
    fn test_match_batch_lines_up_with_inputs() {
        let engine = engine_with(EngineConfig::new().with_min_batch_size_for_parallelism(2));
        let inputs = ["needle1x", "nothing", "needle2x needle3x"];
        let results = engine.match_batch(&inputs);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].len(), 1);
        assert!(results[1].is_empty());
        let names: Vec<&str> = results[2].iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["sig2", "sig3"]);
    }

    #[test]
    fn test_empty_engine_matches_nothing() {
        let engine = SignatureEngine::new();
        assert!(engine.match_all("anything").is_empty());
        assert!(engine.match_by_tags("anything", &["t"]).is_empty());
        assert!(engine.match_batch::<&str>(&[]).is_empty());
    }

    #[test]
    fn test_engine_config_reaches_registry() {
        let engine = SignatureEngine::with_config(EngineConfig::new().with_regex_nest_limit(7));
        assert_eq!(engine.registry().config().nest_limit, 7);
        assert_eq!(engine.config().regex.nest_limit, 7);
    }

    #[test]
    fn test_engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SignatureEngine>();
    }

    #[test]
    fn test_from_registry_round_trip() {
        let mut registry = Registry::new();
        registry.load_str(EXAMPLE).unwrap();
        let engine = SignatureEngine::from_registry(registry, EngineConfig::default());
        assert_eq!(engine.matched_names("Value2"), vec!["S1"]);
        assert_eq!(engine.into_registry().len(), 1);
    }
}
