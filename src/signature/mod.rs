//! Signatures: named bundles of patterns, tags and metadata.
//!
//! A [`SignatureDefinition`] is the parsed, uncompiled form read from a
//! signature source. [`Signature::build`] turns it into a [`Signature`] by
//! splitting its patterns into a literal pool, compiled into one
//! [`Automaton`], and a regex pool, compiled into a [`RegexBank`]. Either
//! both compile or no signature is produced.
//!
//! # Examples
//!
//! ```rust
//! use sigolyze::{MetaInfo, Pattern, Signature};
//!
//! let signature = Signature::build(
//!     "S1",
//!     vec![
//!         Pattern::literal("P1", "Value1"),
//!         Pattern::regex("P2", r"regex[0-9]"),
//!     ],
//!     vec!["tag1".to_string()],
//!     vec![MetaInfo::new("author", ["someone"])],
//! )?;
//!
//! assert!(signature.is_match("xValue1y"));
//! assert!(signature.is_match("regex5"));
//! assert!(!signature.is_match("nothing"));
//! # Ok::<(), sigolyze::SigolyzeError>(())
//! ```

pub mod pattern;
pub mod regex_bank;

pub use pattern::{MetaInfo, Pattern, PatternSet};
pub use regex_bank::{CompiledRegex, RegexBank};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::automaton::Automaton;
use crate::config::RegexConfig;
use crate::error::Result;

/// Uncompiled signature as it appears in a signature source.
///
/// Every field except `name` may be absent and defaults to empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureDefinition {
    pub name: String,
    #[serde(default)]
    pub patterns: Vec<Pattern>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub meta: Vec<MetaInfo>,
}

impl SignatureDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            patterns: Vec::new(),
            tags: Vec::new(),
            meta: Vec::new(),
        }
    }

    pub fn with_pattern(mut self, pattern: Pattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_meta(mut self, meta: MetaInfo) -> Self {
        self.meta.push(meta);
        self
    }
}

/// A compiled, immutable signature.
///
/// The automaton and regex bank are derived from the pattern set at build
/// time and there is no way to change the patterns afterwards.
#[derive(Debug, Clone)]
pub struct Signature {
    name: String,
    patterns: PatternSet,
    tags: Vec<String>,
    meta: Vec<MetaInfo>,
    automaton: Automaton,
    regexes: RegexBank,
}

impl Signature {
    /// Build a signature using default regex limits.
    pub fn build(
        name: impl Into<String>,
        patterns: Vec<Pattern>,
        tags: Vec<String>,
        meta: Vec<MetaInfo>,
    ) -> Result<Self> {
        let definition = SignatureDefinition {
            name: name.into(),
            patterns,
            tags,
            meta,
        };
        Self::from_definition(definition, &RegexConfig::default())
    }

    /// Build a signature from a parsed definition.
    ///
    /// Fails with [`SigolyzeError::PatternCompile`](crate::SigolyzeError::PatternCompile)
    /// if any regex pattern does not compile.
    pub fn from_definition(definition: SignatureDefinition, config: &RegexConfig) -> Result<Self> {
        let SignatureDefinition {
            name,
            patterns,
            tags,
            meta,
        } = definition;

        let patterns = PatternSet::new(patterns);
        let regexes = RegexBank::compile(&name, patterns.regexes(), config)?;
        let automaton = Automaton::new(patterns.literals().map(|p| p.value.as_bytes()));

        let mut unique_tags: Vec<String> = Vec::with_capacity(tags.len());
        for tag in tags {
            if !unique_tags.contains(&tag) {
                unique_tags.push(tag);
            }
        }

        debug!(
            signature = %name,
            literals = patterns.literal_count(),
            regexes = regexes.len(),
            states = automaton.state_count(),
            "built signature"
        );

        Ok(Self {
            name,
            patterns,
            tags: unique_tags,
            meta,
            automaton,
            regexes,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Patterns in definition order.
    pub fn patterns(&self) -> &[Pattern] {
        self.patterns.as_slice()
    }

    pub fn pattern_set(&self) -> &PatternSet {
        &self.patterns
    }

    /// Tags, deduplicated, in first-occurrence order.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn meta(&self) -> &[MetaInfo] {
        &self.meta
    }

    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    pub fn regex_bank(&self) -> &RegexBank {
        &self.regexes
    }

    /// Returns true if any literal occurs in `data` or any regex matches it.
    ///
    /// A signature without patterns never matches.
    pub fn is_match(&self, data: impl AsRef<[u8]>) -> bool {
        let data = data.as_ref();
        self.automaton.exists_match(data) || self.regexes.is_match(data)
    }

    /// Every pattern that fires on `data`, in definition order.
    pub fn matching_patterns(&self, data: impl AsRef<[u8]>) -> Vec<&Pattern> {
        let data = data.as_ref();

        let mut positions: Vec<usize> = self
            .automaton
            .scan(data)
            .into_iter()
            .filter_map(|nth| self.patterns.literal_position(nth))
            .chain(
                self.regexes
                    .matching(data)
                    .into_iter()
                    .filter_map(|nth| self.patterns.regex_position(nth)),
            )
            .collect();
        positions.sort_unstable();

        positions
            .into_iter()
            .map(|i| &self.patterns.as_slice()[i])
            .collect()
    }

    /// Reconstruct the definition this signature was built from.
    pub fn definition(&self) -> SignatureDefinition {
        SignatureDefinition {
            name: self.name.clone(),
            patterns: self.patterns.as_slice().to_vec(),
            tags: self.tags.clone(),
            meta: self.meta.clone(),
        }
    }
}
