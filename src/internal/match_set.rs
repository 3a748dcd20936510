//! The match driver: the Spawn / Advance / Terminal-accounting / Commit /
//! Sweep loop described in §4.4.
//!
//! The buffer is random-access rather than streamed, which is what makes
//! "delayed spawn" for the Aho-Corasick prefilter tractable: when the AC
//! automaton reports a literal occurrence whose implied start index is
//! already behind the driver's cursor, the driver replays the pattern's own
//! DFA over the characters it missed instead of needing to have spawned it
//! earlier.

use log::trace;
use rustc_hash::FxHashSet;

use super::{
    aho_corasick::AhoCorasick, dfa_store::DfaStore, prefilter::FirstCharIndex, AnchorContext,
    DfaStateID, PatternID,
};
use crate::{config::PrefilterMode, CharBuffer, Pattern, Result};

/// Everything the driver needs to consult per character: the lazy DFA store
/// and the two optional prefilters.
pub(crate) struct Automaton {
    pub(crate) dfa_store: DfaStore,
    pub(crate) first_char_index: FirstCharIndex,
    pub(crate) ac: Option<AhoCorasick>,
}

struct ActiveMatch {
    pattern_id: PatternID,
    start: usize,
    state: DfaStateID,
    best_end: Option<usize>,
}

/// A committed match, ready for the caller to invoke its pattern's action.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Committed {
    pub(crate) pattern_id: PatternID,
    pub(crate) start: usize,
    pub(crate) end_inclusive: usize,
}

/// Drive `automaton` over `buf`, calling `on_commit` for each finalized match
/// in non-decreasing end-index order (ties broken by pattern id), and
/// polling `is_cancelled` between input positions.
pub(crate) fn run(
    automaton: &Automaton,
    patterns: &[Pattern],
    mode: PrefilterMode,
    buf: &CharBuffer<'_>,
    is_cancelled: &mut dyn FnMut() -> bool,
    on_commit: &mut dyn FnMut(Committed),
) -> Result<()> {
    let dfa = &automaton.dfa_store;
    let patterns_with_hint: FxHashSet<PatternID> = patterns
        .iter()
        .enumerate()
        .filter(|(_, p)| p.literal_hint().is_some())
        .map(|(i, _)| PatternID::new(i as _))
        .collect();

    let mut active: Vec<ActiveMatch> = Vec::new();
    let mut ac_state = automaton.ac.as_ref().map(|ac| ac.start());
    // Accumulated across the whole scan and emitted in one final sorted
    // pass: a match retired mid-scan by a failing transition and one still
    // alive at EOF are not independently ordered batches, only the full set
    // is (§5's non-decreasing-end-index guarantee).
    let mut committed_all: Vec<Committed> = Vec::new();

    for i in 0..buf.len() {
        let c = buf.char_at(i).expect("i < buf.len()");
        let ctx_spawn = AnchorContext::at(buf, i);
        let ctx_after = AnchorContext::at(buf, i + 1);

        // Step 1: Spawn.
        let mut to_spawn: Vec<PatternID> = match mode {
            PrefilterMode::None => (0..patterns.len()).map(|i| PatternID::new(i as _)).collect(),
            PrefilterMode::FirstChar => automaton.first_char_index.candidates(c),
            PrefilterMode::Aho | PrefilterMode::Both => {
                // Hint-less patterns always ride the first-character filter;
                // AC prefiltering is an optimization, never a gate (P5).
                automaton
                    .first_char_index
                    .candidates(c)
                    .into_iter()
                    .filter(|p| !patterns_with_hint.contains(p))
                    .collect()
            }
        };
        for pattern_id in to_spawn.drain(..) {
            if !active
                .iter()
                .any(|m| m.pattern_id == pattern_id && m.start == i)
            {
                active.push(ActiveMatch {
                    pattern_id,
                    start: i,
                    state: dfa.start(ctx_spawn),
                    best_end: None,
                });
            }
        }

        // AC-driven spawns: the automaton only learns of a literal once its
        // last character has been read, which can be well behind `i`'s
        // start-candidate set above.
        if let (Some(ac), Some(state)) = (&automaton.ac, ac_state.as_mut()) {
            *state = ac.step(*state, c);
            for candidate in ac.outputs(*state) {
                let Some(spawn_index) = candidate.spawn_index(i + 1) else {
                    continue;
                };
                if spawn_index > i {
                    continue;
                }
                if let Some(guard) = &candidate.guard {
                    let literal_start = spawn_index + candidate.literal_offset_in_match;
                    let literal_end = literal_start + candidate.literal_len;
                    if literal_end > i + 1 {
                        continue;
                    }
                    let actual = buf.slice(literal_start, literal_end);
                    let matches_ci = actual
                        .chars()
                        .flat_map(|ch| ch.to_lowercase())
                        .eq(guard.chars());
                    if !matches_ci {
                        continue;
                    }
                }
                if active
                    .iter()
                    .any(|m| m.pattern_id == candidate.pattern_id && m.start == spawn_index)
                {
                    continue;
                }
                if let Some((state, best_end)) =
                    replay(dfa, candidate.pattern_id, spawn_index, i, buf)
                {
                    active.push(ActiveMatch {
                        pattern_id: candidate.pattern_id,
                        start: spawn_index,
                        state,
                        best_end,
                    });
                }
            }
        }

        // Step 2: Advance every live match (including ones just spawned) by
        // consuming `c`. Step 3: Terminal accounting is folded in below.
        // Step 4/5: Commit + Sweep happen as matches die or at buffer end,
        // but emission is deferred until the whole scan (or a cancellation)
        // is known, so mid-scan retirements never jump ahead of matches
        // still alive at that point.
        active.retain_mut(|m| match dfa.successor(m.state, c, ctx_after) {
            Some(next) => {
                m.state = next;
                if dfa.accepting_patterns(next).contains(&m.pattern_id) {
                    m.best_end = Some(i);
                }
                true
            }
            None => {
                if let Some(end_inclusive) = m.best_end {
                    committed_all.push(Committed {
                        pattern_id: m.pattern_id,
                        start: m.start,
                        end_inclusive,
                    });
                }
                false
            }
        });

        if is_cancelled() {
            trace!("Cancelled at position {}", i);
            committed_all.extend(active.iter().filter_map(|m| {
                m.best_end.map(|end| Committed {
                    pattern_id: m.pattern_id,
                    start: m.start,
                    end_inclusive: end,
                })
            }));
            emit_sorted(committed_all, on_commit);
            return Err(crate::MatcherError::cancelled());
        }
    }

    committed_all.extend(active.into_iter().filter_map(|m| {
        m.best_end.map(|end| Committed {
            pattern_id: m.pattern_id,
            start: m.start,
            end_inclusive: end,
        })
    }));
    emit_sorted(committed_all, on_commit);
    Ok(())
}

fn emit_sorted(mut committed: Vec<Committed>, on_commit: &mut dyn FnMut(Committed)) {
    committed.sort_by_key(|m| (m.end_inclusive, m.pattern_id));
    for committed in committed {
        trace!(
            "Committing match: pattern {} at {}..={}",
            committed.pattern_id,
            committed.start,
            committed.end_inclusive
        );
        on_commit(committed);
    }
}

/// Replay a pattern's DFA over `buf[start..upto_exclusive)`, used to catch a
/// match up to the driver's current cursor when AC reports its literal late.
/// Returns the resulting state and the best (longest) terminal end index
/// reached during the replay, if any.
fn replay(
    dfa: &DfaStore,
    pattern_id: PatternID,
    start: usize,
    upto_exclusive: usize,
    buf: &CharBuffer<'_>,
) -> Option<(DfaStateID, Option<usize>)> {
    let mut state = dfa.start(AnchorContext::at(buf, start));
    let mut best_end = None;
    for pos in start..upto_exclusive {
        let c = buf.char_at(pos)?;
        let ctx_after = AnchorContext::at(buf, pos + 1);
        state = dfa.successor(state, c, ctx_after)?;
        if dfa.accepting_patterns(state).contains(&pattern_id) {
            best_end = Some(pos);
        }
    }
    Some((state, best_end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::internal::literal_hint::LiteralHint;
    use crate::internal::PatternID as InternalPatternID;
    use crate::Config;

    fn build(sources: &[&str]) -> (Automaton, Vec<Pattern>) {
        let config = Config::default();
        let internal_patterns: Vec<(String, InternalPatternID, bool)> = sources
            .iter()
            .enumerate()
            .map(|(i, s)| (s.to_string(), InternalPatternID::new(i), false))
            .collect();
        let dfa_store = DfaStore::new(&internal_patterns, &config).unwrap();
        let mut predicates = Vec::new();
        for i in 0..sources.len() {
            let id = InternalPatternID::new(i);
            if let Some(p) = dfa_store.start_char_predicate(id) {
                predicates.push((id, p));
            }
        }
        let first_char_index = FirstCharIndex::build(predicates);
        let patterns: Vec<Pattern> = sources
            .iter()
            .enumerate()
            .map(|(i, s)| Pattern::new(InternalPatternID::new(i), s.to_string(), false, None))
            .collect();
        (
            Automaton {
                dfa_store,
                first_char_index,
                ac: None,
            },
            patterns,
        )
    }

    fn collect(
        automaton: &Automaton,
        patterns: &[Pattern],
        mode: PrefilterMode,
        text: &str,
    ) -> Vec<(usize, usize, usize)> {
        let buf = CharBuffer::new(text);
        let mut out = Vec::new();
        run(automaton, patterns, mode, &buf, &mut || false, &mut |m| {
            out.push((m.pattern_id.as_usize(), m.start, m.end_inclusive));
        })
        .unwrap();
        out
    }

    #[test]
    fn single_pattern_reports_leftmost_longest() {
        let (automaton, patterns) = build(&["a+"]);
        let matches = collect(&automaton, &patterns, PrefilterMode::FirstChar, "xaaab");
        assert_eq!(matches, vec![(0, 1, 3)]);
    }

    #[test]
    fn two_patterns_match_independently_with_overlap() {
        let (automaton, patterns) = build(&["a+", "a+b"]);
        let matches = collect(&automaton, &patterns, PrefilterMode::FirstChar, "aab");
        assert!(matches.contains(&(0, 0, 1)));
        assert!(matches.contains(&(1, 0, 2)));
    }

    #[test]
    fn disabling_prefilter_yields_the_same_matches() {
        let (automaton, patterns) = build(&["a+", "b+"]);
        let text = "aabbb";
        let with_filter = collect(&automaton, &patterns, PrefilterMode::FirstChar, text);
        let without_filter = collect(&automaton, &patterns, PrefilterMode::None, text);
        let mut a = with_filter;
        let mut b = without_filter;
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }

    #[test]
    fn case_insensitive_pattern_matches_both_cases() {
        let config = Config::default();
        let sources = vec![("FOO".to_string(), InternalPatternID::new(0), true)];
        let dfa_store = DfaStore::new(&sources, &config).unwrap();
        let predicates = match dfa_store.start_char_predicate(InternalPatternID::new(0)) {
            Some(p) => vec![(InternalPatternID::new(0), p)],
            None => Vec::new(),
        };
        let first_char_index = FirstCharIndex::build(predicates);
        let automaton = Automaton {
            dfa_store,
            first_char_index,
            ac: None,
        };
        let patterns = vec![Pattern::new(
            InternalPatternID::new(0),
            "FOO".to_string(),
            true,
            None,
        )];
        let matches = collect(&automaton, &patterns, PrefilterMode::FirstChar, "Foo fOO");
        assert_eq!(matches, vec![(0, 0, 2), (0, 4, 6)]);
    }

    #[test]
    fn anchored_pattern_only_matches_at_buffer_start() {
        let (automaton, patterns) = build(&["^a"]);
        let matches = collect(&automaton, &patterns, PrefilterMode::FirstChar, "ba");
        assert!(matches.is_empty());
        let matches = collect(&automaton, &patterns, PrefilterMode::FirstChar, "ab");
        assert_eq!(matches, vec![(0, 0, 0)]);
    }

    #[test]
    fn aho_corasick_prefilter_spawns_match_behind_the_cursor() {
        let config = Config::default();
        let sources = vec![("hello".to_string(), InternalPatternID::new(0), false)];
        let dfa_store = DfaStore::new(&sources, &config).unwrap();
        let first_char_index = FirstCharIndex::build(Vec::new());
        let hints = vec![(
            InternalPatternID::new(0),
            LiteralHint {
                literal: "hello".to_string(),
                offset: 0,
                anchored_start: false,
            },
            false,
        )];
        let ac = AhoCorasick::build(&hints, 1);
        let automaton = Automaton {
            dfa_store,
            first_char_index,
            ac: Some(ac),
        };
        let patterns = vec![Pattern::new(
            InternalPatternID::new(0),
            "hello".to_string(),
            false,
            Some(LiteralHint {
                literal: "hello".to_string(),
                offset: 0,
                anchored_start: false,
            }),
        )];
        let matches = collect(&automaton, &patterns, PrefilterMode::Aho, "xx hello yy");
        assert_eq!(matches, vec![(0, 3, 7)]);
    }

    #[test]
    fn commits_are_emitted_in_non_decreasing_end_index_order_globally() {
        // "a.*bz" (id 0) idles in its `.`-loop to EOF (flushed last,
        // end_inclusive=2); "xy" (id 1) dies via a failing transition well
        // before EOF (end_inclusive=14). The emission order must still
        // follow end_inclusive, not which one died first.
        let (automaton, patterns) = build(&["a.*bz", "xy"]);
        let matches = collect(
            &automaton,
            &patterns,
            PrefilterMode::FirstChar,
            "abzqqqqqqqqqqxyZ",
        );
        assert_eq!(matches, vec![(0, 0, 2), (1, 13, 14)]);
    }

    #[test]
    fn case_insensitive_length_mismatch_guard_allows_the_genuine_ac_spawn() {
        let config = Config::default();
        let sources = vec![("straße".to_string(), InternalPatternID::new(0), true)];
        let dfa_store = DfaStore::new(&sources, &config).unwrap();
        let first_char_index = FirstCharIndex::build(Vec::new());
        let literal_hint = LiteralHint {
            literal: "straße".to_string(),
            offset: 0,
            anchored_start: false,
        };
        let hints = vec![(InternalPatternID::new(0), literal_hint.clone(), true)];
        let ac = AhoCorasick::build(&hints, 1);
        let automaton = Automaton {
            dfa_store,
            first_char_index,
            ac: Some(ac),
        };
        let patterns = vec![Pattern::new(
            InternalPatternID::new(0),
            "straße".to_string(),
            true,
            Some(literal_hint),
        )];
        // The AC trie only ever steps on an exact character match against its
        // lowercase entry, so a genuine occurrence must still pass the guard.
        let matches = collect(&automaton, &patterns, PrefilterMode::Aho, "die straße");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].0, 0);
    }
}
