//! The pattern registry: the append-only (modulo `add`/`remove`) store behind
//! [`crate::Matcher`], and the lazily (re)built automaton over it.
//!
//! Grounded on the validate-then-commit idiom of the reference scanner's
//! `ScannerBuilder::build` (§6's registration contract), but restructured for
//! incremental registration: each `add`/`remove` invalidates a cached
//! automaton instead of building one eagerly, and is rejected outright while
//! a match is in progress.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use log::debug;

use crate::config::{ConfigValue, PrefilterMode};
use crate::internal::{
    aho_corasick::AhoCorasick, dfa_store::DfaStore, literal_hint, match_set, parse_regex_syntax,
    prefilter::FirstCharIndex, CharacterClassRegistry, Nfa, PatternID as InternalPatternID,
};
use crate::{Action, CharBuffer, Config, MatcherError, Pattern, PatternId, Result};

struct ActiveGuard<'a>(&'a AtomicUsize);

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

pub(crate) struct Registry {
    config: RwLock<Config>,
    entries: RwLock<Vec<(Pattern, Action)>>,
    automaton: RwLock<Option<Arc<match_set::Automaton>>>,
    in_progress: AtomicUsize,
    next_id: AtomicUsize,
}

impl Registry {
    pub(crate) fn new(config: Config) -> Self {
        Self {
            config: RwLock::new(config),
            entries: RwLock::new(Vec::new()),
            automaton: RwLock::new(None),
            in_progress: AtomicUsize::new(0),
            next_id: AtomicUsize::new(0),
        }
    }

    fn reject_if_in_progress(&self, what: &str) -> Result<()> {
        if self.in_progress.load(Ordering::SeqCst) > 0 {
            return Err(MatcherError::precondition(format!(
                "cannot {what} while a match is in progress"
            )));
        }
        Ok(())
    }

    pub(crate) fn config(&self) -> Config {
        self.config.read().unwrap().clone()
    }

    /// Register a pattern. Validated by compiling it on its own before any
    /// shared state is touched, so a rejected pattern leaves the registry
    /// byte-for-byte unchanged (§4.1's atomic-rejection requirement).
    pub(crate) fn add(&self, source: &str, action: Action, case_insensitive: bool) -> Result<PatternId> {
        self.reject_if_in_progress("add a pattern")?;

        let ast = parse_regex_syntax(source)?;
        // Extract the literal hint before case-folding: folding rewrites a
        // case-varying literal into a `ClassBracketed` union that
        // `literal_hint::extract` doesn't recognize.
        let hint = literal_hint::extract(&ast);
        let ast = if case_insensitive {
            crate::internal::fold_case(ast)
        } else {
            ast
        };

        let config = self.config.read().unwrap().clone();
        let mut scratch_registry = CharacterClassRegistry::new();
        Nfa::try_from_ast(
            ast,
            &mut scratch_registry,
            config.max_nfa_nodes_per_pattern(),
            config.multiline(),
        )?;

        let internal_id = InternalPatternID::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let pattern = Pattern::new(internal_id, source.to_string(), case_insensitive, hint);
        let public_id = pattern.id();

        self.entries.write().unwrap().push((pattern, action));
        *self.automaton.write().unwrap() = None;
        debug!("Registered pattern {}: {}", public_id, source);
        Ok(public_id)
    }

    /// Remove a registered pattern. `PreconditionError` if no pattern with
    /// `id` is registered, or if a match is currently in progress.
    pub(crate) fn remove(&self, id: PatternId) -> Result<()> {
        self.reject_if_in_progress("remove a pattern")?;

        let mut entries = self.entries.write().unwrap();
        let before = entries.len();
        entries.retain(|(p, _)| p.id() != id);
        if entries.len() == before {
            return Err(MatcherError::precondition(format!(
                "no pattern registered with id {id}"
            )));
        }
        drop(entries);
        *self.automaton.write().unwrap() = None;
        Ok(())
    }

    pub(crate) fn configure_prefilter(&self, mode: PrefilterMode, literal_min_length: usize) -> Result<()> {
        self.reject_if_in_progress("reconfigure the prefilter")?;

        let mut config = self.config.write().unwrap();
        config.set("prefilter", ConfigValue::Prefilter(mode))?;
        config.set(
            "literal_min_length",
            ConfigValue::Int(literal_min_length as i64),
        )?;
        drop(config);
        *self.automaton.write().unwrap() = None;
        Ok(())
    }

    pub(crate) fn set_config(&self, option: &str, value: ConfigValue) -> Result<()> {
        self.reject_if_in_progress("change configuration")?;
        self.config.write().unwrap().set(option, value)?;
        *self.automaton.write().unwrap() = None;
        Ok(())
    }

    fn ensure_automaton(&self) -> Result<Arc<match_set::Automaton>> {
        if let Some(automaton) = self.automaton.read().unwrap().as_ref() {
            return Ok(Arc::clone(automaton));
        }
        let mut slot = self.automaton.write().unwrap();
        if let Some(automaton) = slot.as_ref() {
            return Ok(Arc::clone(automaton));
        }

        let config = self.config.read().unwrap().clone();
        let entries = self.entries.read().unwrap();
        let sources: Vec<(String, InternalPatternID, bool)> = entries
            .iter()
            .enumerate()
            .map(|(i, (p, _))| {
                (
                    p.source().to_string(),
                    InternalPatternID::new(i),
                    p.case_insensitive(),
                )
            })
            .collect();
        let dfa_store = DfaStore::new(&sources, &config)?;

        let mut predicates = Vec::new();
        for i in 0..entries.len() {
            let id = InternalPatternID::new(i);
            if let Some(predicate) = dfa_store.start_char_predicate(id) {
                predicates.push((id, predicate));
            }
        }
        let first_char_index = FirstCharIndex::build(predicates);

        let ac = if config.prefilter().uses_aho_corasick() {
            let hints: Vec<_> = entries
                .iter()
                .enumerate()
                .filter_map(|(i, (p, _))| {
                    p.literal_hint()
                        .cloned()
                        .map(|h| (InternalPatternID::new(i), h, p.case_insensitive()))
                })
                .collect();
            Some(AhoCorasick::build(&hints, config.literal_min_length()))
        } else {
            None
        };

        debug!(
            "Rebuilt automaton for {} registered pattern(s), aho_corasick={}",
            entries.len(),
            ac.is_some()
        );
        let automaton = Arc::new(match_set::Automaton {
            dfa_store,
            first_char_index,
            ac,
        });
        *slot = Some(Arc::clone(&automaton));
        Ok(automaton)
    }

    /// Drive every registered pattern's action over `text` to completion (or
    /// cancellation). Concurrent calls on independent buffers are safe: the
    /// automaton is read-only once built and shared behind an `Arc`.
    pub(crate) fn match_buffer(
        &self,
        text: &str,
        mut is_cancelled: impl FnMut() -> bool,
    ) -> Result<()> {
        self.in_progress.fetch_add(1, Ordering::SeqCst);
        let _guard = ActiveGuard(&self.in_progress);

        let automaton = self.ensure_automaton()?;
        let mode = self.config.read().unwrap().prefilter();
        let entries = self.entries.read().unwrap();
        let patterns: Vec<Pattern> = entries.iter().map(|(p, _)| p.clone()).collect();
        let buf = CharBuffer::new(text);

        match_set::run(
            &automaton,
            &patterns,
            mode,
            &buf,
            &mut is_cancelled,
            &mut |committed| {
                let (_, action) = &entries[committed.pattern_id.as_usize()];
                let matched = buf.slice(committed.start, committed.end_inclusive + 1);
                action.call(matched, committed.start, committed.end_inclusive);
            },
        )
    }

    /// Logs every registered pattern's compiled NFA as graphviz dot output.
    #[cfg(feature = "dot_writer")]
    pub(crate) fn log_patterns_as_dot(&self) -> Result<()> {
        use std::io::Read;

        let automaton = self.ensure_automaton()?;
        let mpn = automaton.dfa_store.multi_pattern_nfa();
        for (idx, (source, pattern_id)) in mpn.patterns().iter().enumerate() {
            let nfa = &mpn.nfas[idx];
            let mut cursor = std::io::Cursor::new(Vec::new());
            crate::internal::dot::nfa_render(nfa, *pattern_id, &mut cursor);
            let mut dot_format = String::new();
            cursor.set_position(0);
            cursor
                .read_to_string(&mut dot_format)
                .map_err(|e| MatcherError::internal(e.to_string()))?;
            debug!(
                "Compiled NFA for pattern {} ({}):\n{}",
                pattern_id, source, dot_format
            );
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn pattern_count(&self) -> usize {
        self.entries.read().unwrap().len()
    }
}
