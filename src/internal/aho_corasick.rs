//! Aho-Corasick literal prefilter, built from every registered pattern's
//! [`super::literal_hint::LiteralHint`].
//!
//! Structurally this is the classical goto/fail/output construction, but
//! completed into a fully deterministic transition table at build time (the
//! fail-chain is resolved once per node instead of walked at query time), so
//! the driver can step it in lockstep with the input cursor in O(1) per
//! character, mirroring how the regex DFA advances.

use rustc_hash::FxHashMap;

use super::PatternID;
use crate::internal::literal_hint::LiteralHint;

/// A literal occurrence reported when the automaton reaches an output node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Candidate {
    pub(crate) pattern_id: PatternID,
    pub(crate) literal_len: usize,
    pub(crate) literal_offset_in_match: usize,
    /// Set only for a case-insensitive hint whose upper/lower forms have
    /// different lengths: the trie holds just the lowercase spelling, so the
    /// driver must re-check the actual matched slice (lowercased) against
    /// this before trusting the candidate.
    pub(crate) guard: Option<String>,
}

impl Candidate {
    /// The position, relative to the end-exclusive index where this literal
    /// was found, at which the pattern's own match must have begun.
    pub(crate) fn spawn_index(&self, end_exclusive: usize) -> Option<usize> {
        end_exclusive.checked_sub(self.literal_len + self.literal_offset_in_match)
    }
}

#[derive(Debug, Default)]
struct Node {
    goto: FxHashMap<char, usize>,
    output: Vec<Candidate>,
}

/// A deterministic multi-pattern literal matcher.
#[derive(Debug)]
pub(crate) struct AhoCorasick {
    nodes: Vec<Node>,
}

impl AhoCorasick {
    /// Build the automaton from every pattern that has a literal hint of at
    /// least `min_length` characters.
    ///
    /// A case-insensitive hint whose upper/lower forms are equal length gets
    /// both forms inserted verbatim (no runtime check needed); otherwise only
    /// the lowercase form is inserted, with a `guard` recorded so the driver
    /// can re-verify the actual matched slice before trusting the candidate.
    pub(crate) fn build(hints: &[(PatternID, LiteralHint, bool)], min_length: usize) -> Self {
        let mut nodes = vec![Node::default()];
        for (pattern_id, hint, case_insensitive) in hints {
            if hint.literal.chars().count() < min_length {
                continue;
            }
            if !case_insensitive {
                Self::insert(
                    &mut nodes,
                    &hint.literal,
                    Candidate {
                        pattern_id: *pattern_id,
                        literal_len: hint.literal.chars().count(),
                        literal_offset_in_match: hint.offset,
                        guard: None,
                    },
                );
                continue;
            }

            let lower: String = hint.literal.chars().flat_map(|c| c.to_lowercase()).collect();
            let upper: String = hint.literal.chars().flat_map(|c| c.to_uppercase()).collect();
            let n = hint.literal.chars().count();
            if lower.chars().count() == n && upper.chars().count() == n {
                Self::insert(
                    &mut nodes,
                    &lower,
                    Candidate {
                        pattern_id: *pattern_id,
                        literal_len: n,
                        literal_offset_in_match: hint.offset,
                        guard: None,
                    },
                );
                if upper != lower {
                    Self::insert(
                        &mut nodes,
                        &upper,
                        Candidate {
                            pattern_id: *pattern_id,
                            literal_len: n,
                            literal_offset_in_match: hint.offset,
                            guard: None,
                        },
                    );
                }
            } else {
                Self::insert(
                    &mut nodes,
                    &lower,
                    Candidate {
                        pattern_id: *pattern_id,
                        literal_len: lower.chars().count(),
                        literal_offset_in_match: hint.offset,
                        guard: Some(lower.clone()),
                    },
                );
            }
        }

        let mut automaton = AhoCorasick { nodes };
        automaton.complete_with_fail_links();
        automaton
    }

    fn insert(nodes: &mut Vec<Node>, literal: &str, candidate: Candidate) {
        let mut state = 0usize;
        for c in literal.chars() {
            state = *nodes[state].goto.entry(c).or_insert_with(|| {
                nodes.push(Node::default());
                nodes.len() - 1
            });
        }
        nodes[state].output.push(candidate);
    }

    /// Root state, the automaton's idle state.
    pub(crate) fn start(&self) -> usize {
        0
    }

    /// Advance one character, returning the new state.
    #[inline]
    pub(crate) fn step(&self, state: usize, c: char) -> usize {
        *self.nodes[state].goto.get(&c).unwrap_or(&0)
    }

    /// The literal occurrences ending at `state`.
    pub(crate) fn outputs(&self, state: usize) -> &[Candidate] {
        &self.nodes[state].output
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.nodes.len() == 1 && self.nodes[0].output.is_empty()
    }

    /// Classical BFS fail-link computation, folded directly into a complete
    /// `goto` table so querying never has to walk a fail chain.
    fn complete_with_fail_links(&mut self) {
        let mut fail = vec![0usize; self.nodes.len()];
        let mut queue = std::collections::VecDeque::new();

        let root_edges: Vec<(char, usize)> = self.nodes[0]
            .goto
            .iter()
            .map(|(&c, &s)| (c, s))
            .collect();
        for (_, child) in &root_edges {
            fail[*child] = 0;
            queue.push_back(*child);
        }

        while let Some(state) = queue.pop_front() {
            let edges: Vec<(char, usize)> = self.nodes[state]
                .goto
                .iter()
                .map(|(&c, &s)| (c, s))
                .collect();
            for (c, child) in edges {
                let mut fallback = fail[state];
                let resolved = loop {
                    if let Some(&next) = self.nodes[fallback].goto.get(&c) {
                        if next != child {
                            break next;
                        }
                    }
                    if fallback == 0 {
                        break 0;
                    }
                    fallback = fail[fallback];
                };
                fail[child] = resolved;
                let inherited = self.nodes[resolved].output.clone();
                self.nodes[child].output.extend(inherited);
                queue.push_back(child);
            }
        }

        // Complete goto so every (state, char) has an entry pointing either
        // to a real child or to the resolved fail target, eliminating the
        // need to consult `fail` at query time.
        let mut order = Vec::new();
        let mut visited = vec![false; self.nodes.len()];
        let mut bfs = std::collections::VecDeque::new();
        bfs.push_back(0usize);
        visited[0] = true;
        while let Some(state) = bfs.pop_front() {
            order.push(state);
            let children: Vec<usize> = self.nodes[state].goto.values().copied().collect();
            for child in children {
                if !visited[child] {
                    visited[child] = true;
                    bfs.push_back(child);
                }
            }
        }
        for state in order {
            if state == 0 {
                continue;
            }
            let parent_fail = fail[state];
            let all_chars: Vec<char> = self.nodes[parent_fail]
                .goto
                .keys()
                .copied()
                .collect();
            for c in all_chars {
                self.nodes[state]
                    .goto
                    .entry(c)
                    .or_insert_with(|| self.nodes[parent_fail].goto[&c]);
            }
        }
    }
}
