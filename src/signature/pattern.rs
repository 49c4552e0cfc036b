//! Pattern and metadata definitions.

use serde::{Deserialize, Serialize};

/// A single literal string or regex source belonging to a signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pattern {
    #[serde(default)]
    pub name: String,
    /// Required: a missing value would otherwise become an empty literal,
    /// which matches every input.
    pub value: String,
    #[serde(default)]
    pub is_regex: bool,
}

impl Pattern {
    pub fn new(name: impl Into<String>, value: impl Into<String>, is_regex: bool) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            is_regex,
        }
    }

    /// Create a literal pattern.
    pub fn literal(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, value, false)
    }

    /// Create a regex pattern.
    pub fn regex(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, value, true)
    }
}

/// Descriptive metadata attached to a signature. Never consulted by matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub info: Vec<String>,
}

impl MetaInfo {
    pub fn new<I, S>(name: impl Into<String>, info: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            info: info.into_iter().map(Into::into).collect(),
        }
    }
}

/// Ordered patterns of one signature with their literal/regex partition.
///
/// The original order is kept for diagnostics; the partition is computed
/// once so the literal pool and the regex pool can be compiled separately.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternSet {
    patterns: Vec<Pattern>,
    literal_indices: Vec<usize>,
    regex_indices: Vec<usize>,
}

impl PatternSet {
    pub fn new(patterns: Vec<Pattern>) -> Self {
        let (regex_indices, literal_indices): (Vec<usize>, Vec<usize>) =
            (0..patterns.len()).partition(|&i| patterns[i].is_regex);

        Self {
            patterns,
            literal_indices,
            regex_indices,
        }
    }

    /// All patterns in definition order.
    pub fn as_slice(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Literal patterns in definition order.
    pub fn literals(&self) -> impl ExactSizeIterator<Item = &Pattern> + '_ {
        self.literal_indices.iter().map(|&i| &self.patterns[i])
    }

    /// Regex patterns in definition order.
    pub fn regexes(&self) -> impl ExactSizeIterator<Item = &Pattern> + '_ {
        self.regex_indices.iter().map(|&i| &self.patterns[i])
    }

    pub fn literal_count(&self) -> usize {
        self.literal_indices.len()
    }

    pub fn regex_count(&self) -> usize {
        self.regex_indices.len()
    }

    /// Position in the full set of the n-th literal pattern.
    pub(crate) fn literal_position(&self, nth: usize) -> Option<usize> {
        self.literal_indices.get(nth).copied()
    }

    /// Position in the full set of the n-th regex pattern.
    pub(crate) fn regex_position(&self, nth: usize) -> Option<usize> {
        self.regex_indices.get(nth).copied()
    }

    pub fn into_inner(self) -> Vec<Pattern> {
        self.patterns
    }
}

impl From<Vec<Pattern>> for PatternSet {
    fn from(patterns: Vec<Pattern>) -> Self {
        Self::new(patterns)
    }
}
