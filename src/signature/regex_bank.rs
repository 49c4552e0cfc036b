//! Compiled regex patterns of a signature.

use std::fmt;

use regex::bytes::{Regex, RegexBuilder};

use crate::config::RegexConfig;
use crate::error::{Result, SigolyzeError};
use crate::signature::Pattern;

/// A regex pattern compiled once at load time.
///
/// Matching uses find-any semantics: the pattern matches if it matches
/// anywhere in the input, unless the source itself anchors.
#[derive(Clone)]
pub struct CompiledRegex {
    pattern_name: String,
    regex: Regex,
}

impl CompiledRegex {
    /// Compile `pattern.value` for the signature named `signature`.
    pub fn compile(signature: &str, pattern: &Pattern, config: &RegexConfig) -> Result<Self> {
        let regex = RegexBuilder::new(&pattern.value)
            .size_limit(config.size_limit)
            .dfa_size_limit(config.dfa_size_limit)
            .nest_limit(config.nest_limit)
            .build()
            .map_err(|source| SigolyzeError::PatternCompile {
                signature: signature.to_string(),
                pattern: pattern.name.clone(),
                regex: pattern.value.clone(),
                source,
            })?;

        Ok(Self {
            pattern_name: pattern.name.clone(),
            regex,
        })
    }

    pub fn pattern_name(&self) -> &str {
        &self.pattern_name
    }

    /// The regex source this matcher was compiled from.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    #[inline]
    pub fn is_match(&self, haystack: &[u8]) -> bool {
        self.regex.is_match(haystack)
    }
}

impl fmt::Debug for CompiledRegex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledRegex")
            .field("pattern_name", &self.pattern_name)
            .field("source", &self.regex.as_str())
            .finish()
    }
}

/// Ordered collection of a signature's compiled regexes.
#[derive(Debug, Clone, Default)]
pub struct RegexBank {
    regexes: Vec<CompiledRegex>,
}

impl RegexBank {
    /// Compile every pattern, failing on the first invalid source.
    pub fn compile<'a, I>(signature: &str, patterns: I, config: &RegexConfig) -> Result<Self>
    where
        I: IntoIterator<Item = &'a Pattern>,
    {
        let regexes = patterns
            .into_iter()
            .map(|pattern| CompiledRegex::compile(signature, pattern, config))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { regexes })
    }

    pub fn len(&self) -> usize {
        self.regexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regexes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CompiledRegex> {
        self.regexes.iter()
    }

    /// Returns true if any regex matches. An empty bank never matches.
    pub fn is_match(&self, haystack: impl AsRef<[u8]>) -> bool {
        let haystack = haystack.as_ref();
        self.regexes.iter().any(|regex| regex.is_match(haystack))
    }

    /// Positions, within the bank, of every regex that matches.
    pub fn matching(&self, haystack: impl AsRef<[u8]>) -> Vec<usize> {
        let haystack = haystack.as_ref();
        self.regexes
            .iter()
            .enumerate()
            .filter(|(_, regex)| regex.is_match(haystack))
            .map(|(i, _)| i)
            .collect()
    }
}

impl<'a> IntoIterator for &'a RegexBank {
    type Item = &'a CompiledRegex;
    type IntoIter = std::slice::Iter<'a, CompiledRegex>;

    fn into_iter(self) -> Self::IntoIter {
        self.regexes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(patterns: &[Pattern]) -> Result<RegexBank> {
        RegexBank::compile("test_signature", patterns, &RegexConfig::default())
    }

    #[test]
    fn test_compile_and_match() {
        let bank = compile(&[Pattern::regex("digits", r"regex[0-9]")]).unwrap();
        assert_eq!(bank.len(), 1);
        assert!(bank.is_match("some regex7 here"));
        assert!(!bank.is_match("regexA"));
    }

    #[test]
    fn test_find_any_semantics_not_anchored() {
        let bank = compile(&[Pattern::regex("p", "Value1")]).unwrap();
        assert!(bank.is_match("xxValue1yy"));

        let anchored = compile(&[Pattern::regex("p", "^Value1$")]).unwrap();
        assert!(!anchored.is_match("xxValue1yy"));
        assert!(anchored.is_match("Value1"));
    }

    #[test]
    fn test_empty_bank_never_matches() {
        let bank = compile(&[]).unwrap();
        assert!(bank.is_empty());
        assert!(!bank.is_match("anything"));
        assert!(bank.matching("anything").is_empty());
    }

    #[test]
    fn test_invalid_regex_reports_signature_and_pattern() {
        let err = compile(&[
            Pattern::regex("ok", "a+"),
            Pattern::regex("broken", "(unclosed"),
        ])
        .unwrap_err();

        match err {
            SigolyzeError::PatternCompile {
                signature,
                pattern,
                regex,
                ..
            } => {
                assert_eq!(signature, "test_signature");
                assert_eq!(pattern, "broken");
                assert_eq!(regex, "(unclosed");
            }
            other => panic!("Expected PatternCompile, got {other:?}"),
        }
    }

    #[test]
    fn test_size_limit_is_enforced() {
        let config = RegexConfig {
            size_limit: 16,
            ..Default::default()
        };
        let result = RegexBank::compile("tiny", &[Pattern::regex("big", r"\w{100}")], &config);
        assert!(result.unwrap_err().is_pattern_compile());
    }

    #[test]
    fn test_matching_positions() {
        let bank = compile(&[
            Pattern::regex("a", "a+"),
            Pattern::regex("b", "b+"),
            Pattern::regex("c", "c+"),
        ])
        .unwrap();
        assert_eq!(bank.matching("aacc"), vec![0, 2]);

        let names: Vec<&str> = bank.iter().map(|r| r.pattern_name()).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(bank.iter().next().unwrap().as_str(), "a+");
    }

    #[test]
    fn test_binary_haystack() {
        let bank = compile(&[Pattern::regex("bytes", r"(?-u)\xde\xad")]).unwrap();
        assert!(bank.is_match([0x00u8, 0xde, 0xad, 0x00]));
    }
}
