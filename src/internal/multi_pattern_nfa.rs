//! The multi-pattern NFA shared by every registered pattern.
//!
//! Unlike a tokenizer's NFA, which has a single accepting state per mode,
//! this one keeps one accepting state *per pattern* so the driver can report
//! leftmost-longest matches independently for every pattern instead of
//! picking a single winner.

use super::{nfa::EpsilonTransition, AnchorContext, CharClassID, Nfa, PatternID, StateID};
use crate::Result;

#[derive(Debug, Clone, Default)]
pub(crate) struct MultiPatternNfa {
    pub(crate) patterns: Vec<(String, PatternID)>,
    /// Epsilon transitions from the shared state 0 to each pattern's NFA
    /// start state.
    pub(crate) start_transitions: Vec<EpsilonTransition>,
    pub(crate) nfas: Vec<Nfa>,
}

impl MultiPatternNfa {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_pattern(&mut self, pattern: String, pattern_id: PatternID) {
        self.patterns.push((pattern, pattern_id));
    }

    fn add_nfa(&mut self, nfa: Nfa) {
        self.nfas.push(nfa);
    }

    pub(crate) fn try_from_patterns(
        patterns: &[(String, PatternID, bool)],
        character_class_registry: &mut super::CharacterClassRegistry,
        max_nfa_nodes_per_pattern: usize,
        multiline: bool,
    ) -> Result<Self> {
        let mut multi_pattern_nfa = Self::new();
        let mut next_state = 1;
        for (pattern, pattern_id, case_insensitive) in patterns {
            let ast = super::parse_regex_syntax(pattern)?;
            let ast = if *case_insensitive {
                super::fold_case(ast)
            } else {
                ast
            };
            let mut nfa = Nfa::try_from_ast(
                ast,
                character_class_registry,
                max_nfa_nodes_per_pattern,
                multiline,
            )?;
            nfa.set_source(pattern);
            let (s, _e) = nfa.shift_ids(next_state);
            next_state = nfa
                .states()
                .iter()
                .map(|state| state.id().as_usize())
                .max()
                .map_or(next_state, |m| m + 1);

            multi_pattern_nfa
                .start_transitions
                .push(EpsilonTransition { target_state: s });

            multi_pattern_nfa.add_pattern(pattern.clone(), *pattern_id);
            multi_pattern_nfa.add_nfa(nfa);
        }
        Ok(multi_pattern_nfa)
    }

    pub(crate) fn patterns(&self) -> &[(String, PatternID)] {
        &self.patterns
    }

    pub(crate) fn start_transitions(&self) -> &[EpsilonTransition] {
        &self.start_transitions
    }

    /// The pattern accepted by reaching `state`, if `state` is the end state
    /// of one of the registered patterns' NFAs.
    pub(crate) fn accepting_pattern(&self, state: StateID) -> Option<PatternID> {
        self.nfas
            .iter()
            .position(|nfa| nfa.end_state() == state)
            .map(|idx| self.patterns[idx].1)
    }

    pub(crate) fn is_accepting_state(&self, state: StateID) -> bool {
        self.nfas.iter().any(|nfa| nfa.end_state() == state)
    }

    /// The ε-closure of `state` under anchor context `ctx`.
    ///
    /// State `0` is the shared entry state: its closure is the union of the
    /// closures of every pattern's own start state.
    pub(crate) fn epsilon_closure(&self, state: StateID, ctx: AnchorContext) -> Vec<StateID> {
        if state == StateID::new(0) {
            let mut result = Vec::new();
            for nfa in &self.nfas {
                let start_state = nfa.start_state();
                for s in nfa.epsilon_closure(start_state, ctx) {
                    if !result.contains(&s) {
                        result.push(s);
                    }
                }
            }
            result.sort_unstable();
            result
        } else {
            self.nfas
                .iter()
                .find(|nfa| nfa.contains_state(state))
                .map(|nfa| nfa.epsilon_closure(state, ctx))
                .unwrap_or_default()
        }
    }

    /// The ε-closure of a set of states, unioned.
    pub(crate) fn epsilon_closure_set<I>(&self, states: I, ctx: AnchorContext) -> Vec<StateID>
    where
        I: IntoIterator<Item = StateID>,
    {
        let mut states: Vec<StateID> = states.into_iter().collect();
        if states.contains(&StateID::new(0)) {
            for nfa in &self.nfas {
                let start_state = nfa.start_state();
                if !states.contains(&start_state) {
                    states.push(start_state);
                }
            }
        }
        let mut result = Vec::new();
        for state in states {
            for s in self.epsilon_closure(state, ctx) {
                if !result.contains(&s) {
                    result.push(s);
                }
            }
        }
        result.sort_unstable();
        result
    }

    /// `move(T, a)`: the states reachable from `T` by matching character
    /// class `a`, combined across every pattern's NFA.
    pub(crate) fn move_set(&self, states: &[StateID], char_class: CharClassID) -> Vec<StateID> {
        let mut result = Vec::new();
        for nfa in &self.nfas {
            let states_of_nfa: Vec<_> = states
                .iter()
                .filter(|s| nfa.contains_state(**s))
                .cloned()
                .collect();
            for state in nfa.move_set(&states_of_nfa, char_class) {
                if !result.contains(&state) {
                    result.push(state);
                }
            }
        }
        result.sort_unstable();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::internal::character_class_registry::CharacterClassRegistry;

    fn ctx() -> AnchorContext {
        AnchorContext::default()
    }

    #[test]
    fn epsilon_closure_of_single_pattern() {
        let mut registry = CharacterClassRegistry::new();
        let multi_pattern_nfa = MultiPatternNfa::try_from_patterns(
            &[("a|b".to_string(), PatternID::new(0), false)],
            &mut registry,
            usize::MAX,
            false,
        )
        .unwrap();
        let closure = multi_pattern_nfa.epsilon_closure(StateID::new(0), ctx());
        assert!(closure.contains(&multi_pattern_nfa.nfas[0].start_state()));
    }

    #[test]
    fn move_set_across_multiple_patterns() {
        let mut registry = CharacterClassRegistry::new();
        let multi_pattern_nfa = MultiPatternNfa::try_from_patterns(
            &[
                ("a+".to_string(), PatternID::new(0), false),
                ("b+".to_string(), PatternID::new(1), false),
            ],
            &mut registry,
            usize::MAX,
            false,
        )
        .unwrap();
        assert_eq!(multi_pattern_nfa.patterns().len(), 2);
        assert_eq!(multi_pattern_nfa.start_transitions().len(), 2);
        assert_eq!(multi_pattern_nfa.nfas.len(), 2);
    }

    #[test]
    fn accepting_pattern_is_reported_per_nfa() {
        let mut registry = CharacterClassRegistry::new();
        let multi_pattern_nfa = MultiPatternNfa::try_from_patterns(
            &[
                ("a".to_string(), PatternID::new(7), false),
                ("b".to_string(), PatternID::new(9), false),
            ],
            &mut registry,
            usize::MAX,
            false,
        )
        .unwrap();
        let end0 = multi_pattern_nfa.nfas[0].end_state();
        let end1 = multi_pattern_nfa.nfas[1].end_state();
        assert_eq!(
            multi_pattern_nfa.accepting_pattern(end0),
            Some(PatternID::new(7))
        );
        assert_eq!(
            multi_pattern_nfa.accepting_pattern(end1),
            Some(PatternID::new(9))
        );
    }
}
