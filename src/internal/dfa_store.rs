//! Lazy, thread-safe NFA-to-DFA subset construction.
//!
//! Unlike [`super::dfa`]'s (now unused) eager whole-automaton construction
//! followed by a Hopcroft minimization pass, this store never builds the
//! full DFA up front: states are interned the first time they are reached,
//! and successor transitions are memoized per `(state, anchor context,
//! character)` the first time they are queried. Multiple matcher threads
//! share one store behind `RwLock`s; a state, once interned, never moves or
//! is invalidated, so readers only ever block on the rare cache miss.

use std::sync::{Arc, RwLock};

use log::trace;
use rustc_hash::FxHashMap;

use super::{
    ids::DfaStateIDBase, prefilter::StartCharPredicate, AnchorContext, CharClassID,
    CharacterClassRegistry, DfaStateID, MultiPatternNfa, PatternID, StateID,
};
use crate::{Config, Result};

/// A single subset-construction state: the set of NFA states it represents,
/// and the patterns that accept in this state (more than one pattern can
/// share an accepting configuration, since every pattern is matched
/// independently).
#[derive(Debug)]
struct DfaNode {
    nfa_states: Vec<StateID>,
    accepting: Vec<PatternID>,
}

/// Thread-safe, on-the-fly NFA-to-DFA subset construction over a shared
/// multi-pattern NFA.
#[derive(Debug)]
pub(crate) struct DfaStore {
    multi_pattern_nfa: MultiPatternNfa,
    char_class_registry: CharacterClassRegistry,
    match_char_class: Arc<dyn Fn(CharClassID, char) -> bool + Send + Sync>,
    nodes: RwLock<Vec<DfaNode>>,
    index: RwLock<FxHashMap<Vec<StateID>, DfaStateID>>,
    successors: RwLock<FxHashMap<(DfaStateID, u8, char), Option<DfaStateID>>>,
}

impl DfaStore {
    pub(crate) fn new(patterns: &[(String, PatternID, bool)], config: &Config) -> Result<Self> {
        let mut char_class_registry = CharacterClassRegistry::new();
        let multi_pattern_nfa = MultiPatternNfa::try_from_patterns(
            patterns,
            &mut char_class_registry,
            config.max_nfa_nodes_per_pattern(),
            config.multiline(),
        )?;
        let match_char_class: Arc<dyn Fn(CharClassID, char) -> bool + Send + Sync> = Arc::from(
            char_class_registry.create_match_char_class(config.dot_matches_newline())?,
        );
        Ok(Self {
            multi_pattern_nfa,
            char_class_registry,
            match_char_class,
            nodes: RwLock::new(Vec::new()),
            index: RwLock::new(FxHashMap::default()),
            successors: RwLock::new(FxHashMap::default()),
        })
    }

    /// The entry DFA state reached by the epsilon closure of every
    /// pattern's start state, under the anchor context at the cursor where
    /// matching begins.
    pub(crate) fn start(&self, ctx: AnchorContext) -> DfaStateID {
        let closure = self.multi_pattern_nfa.epsilon_closure(StateID::new(0), ctx);
        self.intern(closure)
    }

    /// The patterns accepted in `state`, if any.
    pub(crate) fn accepting_patterns(&self, state: DfaStateID) -> Vec<PatternID> {
        self.nodes.read().unwrap()[state.as_usize()]
            .accepting
            .clone()
    }

    /// The set of character classes reachable in one step from `pattern_id`'s
    /// start state, packaged as a predicate — the backing computation for
    /// `start_chars(p)` (§4.3). Computed assuming the most permissive anchor
    /// context (start of text and of line both hold), since a start
    /// character is legal for `p` if any anchor-compatible opening accepts
    /// it.
    pub(crate) fn start_char_predicate(&self, pattern_id: PatternID) -> Option<StartCharPredicate> {
        let index = self
            .multi_pattern_nfa
            .patterns()
            .iter()
            .position(|(_, id)| *id == pattern_id)?;
        let nfa = &self.multi_pattern_nfa.nfas[index];
        let ctx = AnchorContext {
            start_of_text: true,
            start_of_line: true,
            end_of_text: false,
            end_of_line: false,
        };
        let closure = nfa.epsilon_closure(nfa.start_state(), ctx);
        let mut char_classes = Vec::new();
        for state in &closure {
            for transition in nfa.states()[state.as_usize()].transitions() {
                if !char_classes.contains(&transition.char_class()) {
                    char_classes.push(transition.char_class());
                }
            }
        }
        let match_char_class = Arc::clone(&self.match_char_class);
        Some(Arc::new(move |c: char| {
            char_classes.iter().any(|&cc| match_char_class(cc, c))
        }))
    }

    /// True if `state` represents no live NFA states at all (every spawned
    /// thread has died).
    pub(crate) fn is_dead(&self, state: DfaStateID) -> bool {
        self.nodes.read().unwrap()[state.as_usize()]
            .nfa_states
            .is_empty()
    }

    /// The DFA state reached from `from` by consuming `c`, under the anchor
    /// context that holds at the cursor position immediately after `c`.
    /// Returns `None` if there is no live successor (the whole state is
    /// dead and can be dropped by the driver).
    pub(crate) fn successor(
        &self,
        from: DfaStateID,
        c: char,
        ctx_after: AnchorContext,
    ) -> Option<DfaStateID> {
        let key = (from, ctx_after.bits(), c);
        if let Some(cached) = self.successors.read().unwrap().get(&key) {
            return *cached;
        }

        let nfa_states = self.nodes.read().unwrap()[from.as_usize()].nfa_states.clone();
        let mut moved = super::buffer_pool::move_scratch();
        for idx in 0..self.char_class_registry.len() {
            let char_class = CharClassID::new(idx as _);
            if (self.match_char_class)(char_class, c) {
                for state in self.multi_pattern_nfa.move_set(&nfa_states, char_class) {
                    if !moved.contains(&state) {
                        moved.as_mut_vec().push(state);
                    }
                }
            }
        }

        let target = if moved.is_empty() {
            None
        } else {
            let closure = self
                .multi_pattern_nfa
                .epsilon_closure_set(moved.iter().copied(), ctx_after);
            if closure.is_empty() {
                None
            } else {
                Some(self.intern(closure))
            }
        };

        self.successors.write().unwrap().insert(key, target);
        target
    }

    fn intern(&self, mut nfa_states: Vec<StateID>) -> DfaStateID {
        nfa_states.sort_unstable();
        nfa_states.dedup();
        if let Some(id) = self.index.read().unwrap().get(&nfa_states) {
            return *id;
        }
        let mut index = self.index.write().unwrap();
        if let Some(id) = index.get(&nfa_states) {
            return *id;
        }
        let mut nodes = self.nodes.write().unwrap();
        let id = DfaStateID::new(nodes.len() as DfaStateIDBase);
        trace!(
            "Constructing DFA state {} from {} NFA states",
            id,
            nfa_states.len()
        );
        let accepting = nfa_states
            .iter()
            .filter_map(|s| self.multi_pattern_nfa.accepting_pattern(*s))
            .fold(Vec::new(), |mut acc, p| {
                if !acc.contains(&p) {
                    acc.push(p);
                }
                acc
            });
        nodes.push(DfaNode {
            nfa_states: nfa_states.clone(),
            accepting,
        });
        index.insert(nfa_states, id);
        id
    }

    /// The number of interned DFA states. Exposed for diagnostics.
    #[allow(dead_code)]
    pub(crate) fn node_count(&self) -> usize {
        self.nodes.read().unwrap().len()
    }

    /// The shared multi-pattern NFA this store is built over. Exposed for
    /// diagnostics (`dot` rendering).
    #[cfg(feature = "dot_writer")]
    pub(crate) fn multi_pattern_nfa(&self) -> &MultiPatternNfa {
        &self.multi_pattern_nfa
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::internal::ids::PatternID;

    fn store(patterns: &[(&str, usize)]) -> DfaStore {
        let patterns: Vec<(String, PatternID, bool)> = patterns
            .iter()
            .map(|(p, id)| (p.to_string(), PatternID::new(*id), false))
            .collect();
        DfaStore::new(&patterns, &Config::default()).unwrap()
    }

    #[test]
    fn literal_pattern_accepts_after_its_length() {
        let store = store(&[("ab", 0)]);
        let start = store.start(AnchorContext::at(&crate::CharBuffer::new("ab"), 0));
        assert!(store.accepting_patterns(start).is_empty());
        let after_a = store
            .successor(
                start,
                'a',
                AnchorContext::at(&crate::CharBuffer::new("ab"), 1),
            )
            .unwrap();
        assert!(store.accepting_patterns(after_a).is_empty());
        let after_b = store
            .successor(
                after_a,
                'b',
                AnchorContext::at(&crate::CharBuffer::new("ab"), 2),
            )
            .unwrap();
        assert_eq!(store.accepting_patterns(after_b), vec![PatternID::new(0)]);
    }

    #[test]
    fn dead_transition_returns_none() {
        let store = store(&[("a", 0)]);
        let buf = crate::CharBuffer::new("a");
        let start = store.start(AnchorContext::at(&buf, 0));
        assert!(store.successor(start, 'b', AnchorContext::at(&buf, 1)).is_none());
    }

    #[test]
    fn two_patterns_can_accept_at_the_same_state() {
        let store = store(&[("a+", 0), ("a+b?", 1)]);
        let buf = crate::CharBuffer::new("a");
        let start = store.start(AnchorContext::at(&buf, 0));
        let after_a = store.successor(start, 'a', AnchorContext::at(&buf, 1)).unwrap();
        let accepting = store.accepting_patterns(after_a);
        assert!(accepting.contains(&PatternID::new(0)));
        assert!(accepting.contains(&PatternID::new(1)));
    }

    #[test]
    fn anchored_pattern_only_accepts_at_start_of_text() {
        let store = store(&[("^a", 0)]);
        let buf = crate::CharBuffer::new("ba");
        // Starting the closure mid-buffer must not satisfy `^`.
        let mid_start = store.start(AnchorContext::at(&buf, 1));
        let after_a = store.successor(mid_start, 'a', AnchorContext::at(&buf, 2));
        assert!(after_a.is_none() || store.accepting_patterns(after_a.unwrap()).is_empty());

        let true_start = store.start(AnchorContext::at(&buf, 0));
        let after_b = store.successor(true_start, 'b', AnchorContext::at(&buf, 1));
        assert!(after_b.is_none());
    }

    #[test]
    fn multiline_start_anchor_matches_after_embedded_newline() {
        let patterns = vec![("^b".to_string(), PatternID::new(0), false)];
        let mut config = Config::default();
        config.set("multiline", crate::ConfigValue::Bool(true)).unwrap();
        let store = DfaStore::new(&patterns, &config).unwrap();
        let buf = crate::CharBuffer::new("a\nb");
        // `^` must hold right after the embedded `\n`, not just at position 0.
        let mid_start = store.start(AnchorContext::at(&buf, 2));
        let after_b = store
            .successor(mid_start, 'b', AnchorContext::at(&buf, 3))
            .unwrap();
        assert_eq!(store.accepting_patterns(after_b), vec![PatternID::new(0)]);
    }

    #[test]
    fn without_multiline_start_anchor_ignores_embedded_newlines() {
        let patterns = vec![("^b".to_string(), PatternID::new(0), false)];
        let store = DfaStore::new(&patterns, &Config::default()).unwrap();
        let buf = crate::CharBuffer::new("a\nb");
        let mid_start = store.start(AnchorContext::at(&buf, 2));
        let after_b = store.successor(mid_start, 'b', AnchorContext::at(&buf, 3));
        assert!(after_b.is_none() || store.accepting_patterns(after_b.unwrap()).is_empty());
    }

    #[test]
    fn dot_matches_newline_when_configured() {
        let patterns = vec![("a.b".to_string(), PatternID::new(0), false)];
        let mut config = Config::default();
        config
            .set("dot_matches_newline", crate::ConfigValue::Bool(true))
            .unwrap();
        let store = DfaStore::new(&patterns, &config).unwrap();
        let buf = crate::CharBuffer::new("a\nb");
        let start = store.start(AnchorContext::at(&buf, 0));
        let after_a = store.successor(start, 'a', AnchorContext::at(&buf, 1)).unwrap();
        let after_nl = store
            .successor(after_a, '\n', AnchorContext::at(&buf, 2))
            .unwrap();
        let after_b = store
            .successor(after_nl, 'b', AnchorContext::at(&buf, 3))
            .unwrap();
        assert_eq!(store.accepting_patterns(after_b), vec![PatternID::new(0)]);
    }

    #[test]
    fn dot_excludes_newline_without_configuration() {
        let patterns = vec![("a.b".to_string(), PatternID::new(0), false)];
        let store = DfaStore::new(&patterns, &Config::default()).unwrap();
        let buf = crate::CharBuffer::new("a\nb");
        let start = store.start(AnchorContext::at(&buf, 0));
        let after_a = store.successor(start, 'a', AnchorContext::at(&buf, 1)).unwrap();
        assert!(store
            .successor(after_a, '\n', AnchorContext::at(&buf, 2))
            .is_none());
    }

    #[test]
    fn case_insensitive_pattern_accepts_either_case() {
        let patterns = vec![("FOO".to_string(), PatternID::new(0), true)];
        let store = DfaStore::new(&patterns, &Config::default()).unwrap();
        for word in ["foo", "FOO", "Foo", "fOO"] {
            let buf = crate::CharBuffer::new(word);
            let mut state = store.start(AnchorContext::at(&buf, 0));
            for (i, c) in word.chars().enumerate() {
                state = store
                    .successor(state, c, AnchorContext::at(&buf, i + 1))
                    .unwrap_or_else(|| panic!("expected a transition for {word:?}"));
            }
            assert_eq!(store.accepting_patterns(state), vec![PatternID::new(0)]);
        }
    }
}
