//! Construction of the Aho-Corasick automaton.
//!
//! Construction runs in two phases:
//!
//! 1. **Trie phase** - every pattern is inserted byte by byte from the root,
//!    reusing states for shared prefixes. The pattern id is recorded in the
//!    output of its terminal state; an empty pattern terminates at the root.
//! 2. **Failure-link phase** - a breadth-first walk computes each state's
//!    fail link and appends the fail target's (already complete) output to
//!    the state's own output.
//!
//! The root's transitions are then closed into a dense table. Every other
//! undefined transition is resolved lazily through fail links.

use std::collections::VecDeque;

use super::{Automaton, PatternId, State, StateId, ROOT};

/// Incremental builder for an [`Automaton`].
///
/// # Examples
///
/// ```rust
/// use sigolyze::AutomatonBuilder;
///
/// let mut builder = AutomatonBuilder::new();
/// let first = builder.add("Value1");
/// let second = builder.add("Value2");
/// assert_eq!((first, second), (0, 1));
///
/// let automaton = builder.build();
/// assert_eq!(automaton.scan("Value2 Value1"), vec![0, 1]);
/// ```
#[derive(Debug, Clone)]
pub struct AutomatonBuilder {
    states: Vec<State>,
    pattern_lens: Vec<usize>,
}

impl AutomatonBuilder {
    /// Create a builder holding only the root state.
    pub fn new() -> Self {
        Self {
            states: vec![State::with_depth(0)],
            pattern_lens: Vec::new(),
        }
    }

    /// Number of patterns added so far.
    pub fn pattern_count(&self) -> usize {
        self.pattern_lens.len()
    }

    /// Insert a literal pattern into the trie and return its id.
    pub fn add(&mut self, pattern: impl AsRef<[u8]>) -> PatternId {
        let pattern = pattern.as_ref();
        let id = self.pattern_lens.len();

        let mut state = ROOT;
        for &byte in pattern {
            state = match self.states[state].goto(byte) {
                Some(next) => next,
                None => self.insert_transition(state, byte),
            };
        }

        self.states[state].output.push(id);
        self.pattern_lens.push(pattern.len());
        id
    }

    /// Add every pattern from an iterator.
    pub fn extend<I, P>(&mut self, patterns: I) -> &mut Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[u8]>,
    {
        for pattern in patterns {
            self.add(pattern);
        }
        self
    }

    fn insert_transition(&mut self, from: StateId, byte: u8) -> StateId {
        let next = self.states.len();
        let depth = self.states[from].depth + 1;
        self.states.push(State::with_depth(depth));

        let trans = &mut self.states[from].trans;
        let position = trans.partition_point(|&(b, _)| b < byte);
        trans.insert(position, (byte, next));
        next
    }

    /// Compute fail links and output sets and freeze the automaton.
    pub fn build(self) -> Automaton {
        let AutomatonBuilder {
            mut states,
            pattern_lens,
        } = self;

        let mut root_table = Box::new([ROOT; 256]);
        for &(byte, next) in &states[ROOT].trans {
            root_table[byte as usize] = next;
        }

        let mut queue = VecDeque::with_capacity(states.len());

        // Depth-1 states fail to the root and inherit its (empty-pattern) output
        let root_output = states[ROOT].output.clone();
        let root_children: Vec<StateId> = states[ROOT].trans.iter().map(|&(_, s)| s).collect();
        for child in root_children {
            states[child].fail = ROOT;
            states[child].output.extend_from_slice(&root_output);
            queue.push_back(child);
        }

        while let Some(state) = queue.pop_front() {
            for i in 0..states[state].trans.len() {
                let (byte, child) = states[state].trans[i];

                let mut fallback = states[state].fail;
                let target = loop {
                    if fallback == ROOT {
                        break root_table[byte as usize];
                    }
                    if let Some(next) = states[fallback].goto(byte) {
                        break next;
                    }
                    fallback = states[fallback].fail;
                };

                states[child].fail = target;
                if !states[target].output.is_empty() {
                    let inherited = states[target].output.clone();
                    states[child].output.extend(inherited);
                }
                queue.push_back(child);
            }
        }

        Automaton {
            states,
            root_table,
            pattern_lens,
        }
    }
}

impl Default for AutomatonBuilder {
    fn default() -> Self {
        Self::new()
    }
}
