//! Multi-pattern exact matching automaton.
//!
//! This module implements the Aho-Corasick automaton used for the literal
//! patterns of a signature. One automaton is built per signature and answers
//! "does any literal occur in this input" in a single pass, regardless of how
//! many literals the signature carries.
//!
//! # Layout
//!
//! - **Symbols** are bytes. Text inputs are matched over their UTF-8 bytes.
//! - **Root** transitions are materialized into a dense 256-entry table, so
//!   the root never falls back and the transition function is total.
//! - **Other states** keep a sparse, byte-sorted transition list. Undefined
//!   transitions are resolved at match time by walking fail links, which
//!   always terminates at the root.
//! - **Outputs** are merged along fail links during construction, so a
//!   state's output list alone names every pattern ending at that position.
//!
//! # Examples
//!
//! ```rust
//! use sigolyze::Automaton;
//!
//! let automaton = Automaton::new(["he", "she", "his", "hers"]);
//! assert!(automaton.exists_match("ushers"));
//! assert_eq!(automaton.scan("ushers"), vec![0, 1, 3]);
//! assert!(!automaton.exists_match("hi"));
//! ```

pub mod builder;

pub use builder::AutomatonBuilder;

/// Index of a state in the automaton. State 0 is the root.
pub type StateId = usize;

/// Index of a literal pattern, in the order it was added to the builder.
pub type PatternId = usize;

pub(crate) const ROOT: StateId = 0;

#[derive(Debug, Clone, Default)]
pub(crate) struct State {
    /// Defined transitions, sorted by byte.
    pub(crate) trans: Vec<(u8, StateId)>,
    /// Deepest proper suffix of this state's prefix that is also a trie state.
    pub(crate) fail: StateId,
    /// Patterns ending here, including those inherited through fail links.
    pub(crate) output: Vec<PatternId>,
    /// Length of the prefix this state represents.
    pub(crate) depth: usize,
}

impl State {
    pub(crate) fn with_depth(depth: usize) -> Self {
        Self {
            depth,
            ..Default::default()
        }
    }

    #[inline]
    pub(crate) fn goto(&self, byte: u8) -> Option<StateId> {
        self.trans
            .binary_search_by_key(&byte, |&(b, _)| b)
            .ok()
            .map(|i| self.trans[i].1)
    }
}

/// Compiled Aho-Corasick automaton over byte strings.
///
/// Immutable once built; safe to share across threads and query
/// concurrently.
#[derive(Debug, Clone)]
pub struct Automaton {
    pub(crate) states: Vec<State>,
    pub(crate) root_table: Box<[StateId; 256]>,
    pub(crate) pattern_lens: Vec<usize>,
}

/// Size and shape of a compiled automaton.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutomatonStats {
    /// Number of literal patterns, duplicates included
    pub pattern_count: usize,
    /// Number of states, root included
    pub state_count: usize,
    /// Number of explicit (trie) transitions
    pub transition_count: usize,
    /// Estimated heap usage in bytes
    pub memory_usage: usize,
}

impl Automaton {
    /// Build an automaton from a sequence of literal patterns.
    ///
    /// Pattern ids are assigned in iteration order starting at 0.
    pub fn new<I, P>(patterns: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[u8]>,
    {
        let mut builder = AutomatonBuilder::new();
        for pattern in patterns {
            builder.add(pattern);
        }
        builder.build()
    }

    /// Number of literal patterns compiled into this automaton.
    pub fn pattern_count(&self) -> usize {
        self.pattern_lens.len()
    }

    /// Number of states, root included.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Byte length of the pattern with the given id.
    pub fn pattern_len(&self, pattern: PatternId) -> Option<usize> {
        self.pattern_lens.get(pattern).copied()
    }

    /// Returns true when no pattern was compiled. Such an automaton never matches.
    pub fn is_empty(&self) -> bool {
        self.pattern_lens.is_empty()
    }

    /// Follow the closed goto function from `state` on `byte`.
    #[inline]
    fn next_state(&self, mut state: StateId, byte: u8) -> StateId {
        loop {
            if state == ROOT {
                return self.root_table[byte as usize];
            }
            let current = &self.states[state];
            if let Some(next) = current.goto(byte) {
                return next;
            }
            state = current.fail;
        }
    }

    /// Returns true if any pattern occurs in `haystack`.
    ///
    /// Stops at the first state with a non-empty output.
    pub fn exists_match(&self, haystack: impl AsRef<[u8]>) -> bool {
        if self.is_empty() {
            return false;
        }
        // Empty patterns live in the root's output
        if !self.states[ROOT].output.is_empty() {
            return true;
        }

        let mut state = ROOT;
        for &byte in haystack.as_ref() {
            state = self.next_state(state, byte);
            if !self.states[state].output.is_empty() {
                return true;
            }
        }
        false
    }

    /// Returns the ids of every pattern occurring in `haystack`, ascending.
    pub fn scan(&self, haystack: impl AsRef<[u8]>) -> Vec<PatternId> {
        let total = self.pattern_count();
        let mut seen = vec![false; total];
        let mut found = Vec::new();

        self.collect_output(ROOT, &mut seen, &mut found);

        let mut state = ROOT;
        for &byte in haystack.as_ref() {
            if found.len() == total {
                break;
            }
            state = self.next_state(state, byte);
            self.collect_output(state, &mut seen, &mut found);
        }

        found.sort_unstable();
        found
    }

    fn collect_output(&self, state: StateId, seen: &mut [bool], found: &mut Vec<PatternId>) {
        for &pattern in &self.states[state].output {
            if !seen[pattern] {
                seen[pattern] = true;
                found.push(pattern);
            }
        }
    }

    /// Report the automaton's size and shape.
    pub fn stats(&self) -> AutomatonStats {
        let transition_count = self.states.iter().map(|s| s.trans.len()).sum();
        let output_count: usize = self.states.iter().map(|s| s.output.len()).sum();

        let memory_usage = self.states.len() * std::mem::size_of::<State>()
            + transition_count * std::mem::size_of::<(u8, StateId)>()
            + output_count * std::mem::size_of::<PatternId>()
            + std::mem::size_of::<[StateId; 256]>()
            + self.pattern_lens.len() * std::mem::size_of::<usize>();

        AutomatonStats {
            pattern_count: self.pattern_count(),
            state_count: self.state_count(),
            transition_count,
            memory_usage,
        }
    }
}

impl Default for Automaton {
    fn default() -> Self {
        AutomatonBuilder::new().build()
    }
}
