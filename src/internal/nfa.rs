//! Thompson-construction NFA for a single pattern.
//!
//! Supports single characters, character classes, `.`, concatenation,
//! alternation, `?`/`*`/`+`, bounded repetition `{n,m}`, `^`/`$` anchors and
//! `\Q...\E` literal blocks (the latter is expanded before parsing, see
//! [`crate::internal::parser`]).

use regex_syntax::ast::{
    Ast, AssertionKind, FlagsItemKind, GroupKind, RepetitionKind, RepetitionRange,
};

use crate::{MatcherError, Result};

use super::{ids::StateIDBase, CharClassID, CharacterClassRegistry, ComparableAst, StateID};

macro_rules! unsupported {
    ($feature:expr) => {
        MatcherError::unsupported_feature($feature.to_string())
    };
}

/// The kind of zero-width assertion carried by an [`AnchorTransition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AnchorKind {
    /// `^` without `multiline`: only the very start of the buffer.
    StartText,
    /// `^` with `multiline`: start of buffer or right after a `\n`.
    StartLine,
    /// `$` without `multiline`: only the very end of the buffer.
    EndText,
    /// `$` with `multiline`: end of buffer or right before a `\n`.
    EndLine,
}

impl AnchorKind {
    /// Whether this assertion holds for a cursor positioned at `pos` in `buf`.
    pub(crate) fn holds(self, buf: &crate::CharBuffer<'_>, pos: usize) -> bool {
        match self {
            AnchorKind::StartText => pos == 0,
            AnchorKind::StartLine => buf.at_line_start(pos),
            AnchorKind::EndText => pos == buf.len(),
            AnchorKind::EndLine => buf.at_line_end(pos),
        }
    }
}

/// A zero-width, context-gated edge: traversable only when the anchor
/// condition holds for the current cursor position. Closed over separately
/// from unconditional ε-edges so subset construction can gate on buffer
/// context without widening every ordinary transition.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AnchorTransition {
    pub(crate) kind: AnchorKind,
    pub(crate) target_state: StateID,
}

#[derive(Debug, Clone)]
pub(crate) struct Nfa {
    /// The regex source this NFA was compiled from, kept for diagnostics only.
    pub(crate) source: String,
    pub(crate) states: Vec<NfaState>,
    pub(crate) start_state: StateID,
    pub(crate) end_state: StateID,
}

impl Default for Nfa {
    fn default() -> Self {
        Self::new()
    }
}

impl Nfa {
    pub(crate) fn new() -> Self {
        Self {
            source: String::new(),
            states: vec![NfaState::default()],
            start_state: StateID::default(),
            end_state: StateID::default(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.start_state == StateID::default()
            && self.end_state == StateID::default()
            && self.states.len() == 1
            && self.states[0].is_empty()
    }

    pub(crate) fn start_state(&self) -> StateID {
        self.start_state
    }

    pub(crate) fn end_state(&self) -> StateID {
        self.end_state
    }

    pub(crate) fn states(&self) -> &[NfaState] {
        &self.states
    }

    pub(crate) fn set_source(&mut self, source: &str) {
        self.source = source.to_string();
    }

    pub(crate) fn add_state(&mut self, state: NfaState) {
        self.states.push(state);
    }

    pub(crate) fn set_start_state(&mut self, state: StateID) {
        self.start_state = state;
    }

    pub(crate) fn set_end_state(&mut self, state: StateID) {
        self.end_state = state;
    }

    pub(crate) fn add_transition(
        &mut self,
        from: StateID,
        chars: Ast,
        target_state: StateID,
        char_class_registry: &mut CharacterClassRegistry,
    ) {
        let char_class = char_class_registry.add_character_class(&chars);
        self.states[from].transitions.push(NfaTransition {
            ast: ComparableAst(chars),
            char_class,
            target_state,
        });
    }

    pub(crate) fn add_epsilon_transition(&mut self, from: StateID, target_state: StateID) {
        self.states[from]
            .epsilon_transitions
            .push(EpsilonTransition { target_state });
    }

    pub(crate) fn add_anchor_transition(
        &mut self,
        from: StateID,
        kind: AnchorKind,
        target_state: StateID,
    ) {
        self.states[from]
            .anchor_transitions
            .push(AnchorTransition { kind, target_state });
    }

    pub(crate) fn new_state(&mut self) -> StateID {
        let state = StateID::new(self.states.len() as StateIDBase);
        self.add_state(NfaState::new(state));
        state
    }

    /// Apply an offset to every state number. Used when splicing a
    /// freshly-compiled sub-NFA into a larger one (concatenation,
    /// alternation), and again when splicing a pattern's whole NFA into the
    /// shared multi-pattern arena.
    pub(crate) fn shift_ids(&mut self, offset: usize) -> (StateID, StateID) {
        for state in self.states.iter_mut() {
            state.offset(offset);
        }
        self.start_state = StateID::new(self.start_state.id() + offset as StateIDBase);
        self.end_state = StateID::new(self.end_state.id() + offset as StateIDBase);
        (self.start_state, self.end_state)
    }

    pub(crate) fn concat(&mut self, mut nfa: Nfa) {
        if self.is_empty() {
            self.set_start_state(nfa.start_state);
            self.set_end_state(nfa.end_state);
            self.states = nfa.states;
            return;
        }
        let (nfa_start_state, nfa_end_state) = nfa.shift_ids(self.states.len());
        self.append(nfa);
        self.add_epsilon_transition(self.end_state, nfa_start_state);
        self.set_end_state(nfa_end_state);
    }

    pub(crate) fn alternation(&mut self, mut nfa: Nfa) {
        if self.is_empty() {
            self.set_start_state(nfa.start_state);
            self.set_end_state(nfa.end_state);
            self.states = nfa.states;
            return;
        }
        let (nfa_start_state, nfa_end_state) = nfa.shift_ids(self.states.len());
        self.append(nfa);

        let start_state = self.new_state();
        self.add_epsilon_transition(start_state, self.start_state);
        self.add_epsilon_transition(start_state, nfa_start_state);

        let end_state = self.new_state();
        self.add_epsilon_transition(self.end_state, end_state);
        self.add_epsilon_transition(nfa_end_state, end_state);

        self.set_start_state(start_state);
        self.set_end_state(end_state);
    }

    pub(crate) fn zero_or_one(&mut self) {
        let start_state = self.new_state();
        self.add_epsilon_transition(start_state, self.start_state);
        self.add_epsilon_transition(start_state, self.end_state);
        self.set_start_state(start_state);
    }

    pub(crate) fn one_or_more(&mut self) {
        let start_state = self.new_state();
        self.add_epsilon_transition(start_state, self.start_state);

        let end_state = self.new_state();
        self.add_epsilon_transition(self.end_state, end_state);
        self.add_epsilon_transition(self.end_state, self.start_state);

        self.set_start_state(start_state);
        self.set_end_state(end_state);
    }

    pub(crate) fn zero_or_more(&mut self) {
        let start_state = self.new_state();
        self.add_epsilon_transition(start_state, self.start_state);
        self.add_epsilon_transition(start_state, self.end_state);

        let end_state = self.new_state();
        self.add_epsilon_transition(self.end_state, end_state);
        self.add_epsilon_transition(self.end_state, self.start_state);

        self.set_start_state(start_state);
        self.set_end_state(end_state);
    }

    /// Anchor a zero-width assertion between the current end state and a new
    /// end state, gated by `kind`.
    fn assert(&mut self, kind: AnchorKind) {
        let start_state = self.end_state;
        let end_state = self.new_state();
        self.add_anchor_transition(start_state, kind, end_state);
        self.set_end_state(end_state);
    }

    /// Move the states of the given NFA to the current NFA and consume it.
    pub(crate) fn append(&mut self, mut nfa: Nfa) {
        self.states.append(nfa.states.as_mut());
        debug_assert!(self
            .states
            .iter()
            .enumerate()
            .all(|(i, s)| s.id().as_usize() == i));
    }

    pub(crate) fn try_from_ast(
        ast: Ast,
        char_class_registry: &mut CharacterClassRegistry,
        max_nodes: usize,
        multiline: bool,
    ) -> Result<Self> {
        let mut nfa = Nfa::new();
        nfa.set_source(&ast.to_string());
        let nfa = Self::compile(ast, char_class_registry, &mut nfa, multiline)?;
        if nfa.states.len() > max_nodes {
            return Err(MatcherError::limit_exceeded(format!(
                "compiled pattern has {} nodes, exceeding the configured limit of {}",
                nfa.states.len(),
                max_nodes
            )));
        }
        Ok(nfa)
    }

    fn compile(
        ast: Ast,
        char_class_registry: &mut CharacterClassRegistry,
        nfa: &mut Nfa,
        multiline: bool,
    ) -> Result<Nfa> {
        let mut nfa = std::mem::take(nfa);
        match ast {
            Ast::Empty(_) => Ok(nfa),
            Ast::Flags(ref f) => Err(unsupported!(format!("{:?}", f.flags.items))),
            Ast::Literal(ref l) => {
                let start_state = nfa.end_state();
                let end_state = nfa.new_state();
                nfa.set_end_state(end_state);
                nfa.add_transition(
                    start_state,
                    Ast::Literal(l.clone()),
                    end_state,
                    char_class_registry,
                );
                Ok(nfa)
            }
            Ast::Dot(ref d) => {
                let start_state = nfa.end_state();
                let end_state = nfa.new_state();
                nfa.set_end_state(end_state);
                nfa.add_transition(
                    start_state,
                    Ast::Dot(d.clone()),
                    end_state,
                    char_class_registry,
                );
                Ok(nfa)
            }
            Ast::Assertion(ref a) => {
                let kind = match (a.kind, multiline) {
                    (AssertionKind::StartLine, false) => AnchorKind::StartText,
                    (AssertionKind::StartLine, true) => AnchorKind::StartLine,
                    (AssertionKind::EndLine, false) => AnchorKind::EndText,
                    (AssertionKind::EndLine, true) => AnchorKind::EndLine,
                    _ => return Err(unsupported!(format!("Assertion {:?}", a.kind))),
                };
                nfa.assert(kind);
                Ok(nfa)
            }
            Ast::ClassUnicode(_) | Ast::ClassPerl(_) | Ast::ClassBracketed(_) => {
                let start_state = nfa.end_state();
                let end_state = nfa.new_state();
                nfa.set_end_state(end_state);
                nfa.add_transition(start_state, ast.clone(), end_state, char_class_registry);
                Ok(nfa)
            }
            Ast::Repetition(ref r) => {
                let mut nfa2 =
                    Self::compile((*r.ast).clone(), char_class_registry, &mut Nfa::new(), multiline)?;
                if !r.greedy {
                    return Err(unsupported!(format!(
                        "{}: non-greedy repetitions are not supported",
                        ast
                    )));
                }
                match &r.op.kind {
                    RepetitionKind::ZeroOrOne => {
                        nfa2.zero_or_one();
                        nfa = nfa2;
                    }
                    RepetitionKind::ZeroOrMore => {
                        nfa2.zero_or_more();
                        nfa = nfa2;
                    }
                    RepetitionKind::OneOrMore => {
                        nfa2.one_or_more();
                        nfa = nfa2;
                    }
                    RepetitionKind::Range(r) => match r {
                        RepetitionRange::Exactly(c) => {
                            for _ in 0..*c {
                                nfa.concat(nfa2.clone());
                            }
                        }
                        RepetitionRange::AtLeast(c) => {
                            for _ in 0..*c {
                                nfa.concat(nfa2.clone());
                            }
                            let mut nfa_zero_or_more = nfa2.clone();
                            nfa_zero_or_more.zero_or_more();
                            nfa.concat(nfa_zero_or_more);
                        }
                        RepetitionRange::Bounded(least, most) => {
                            for _ in 0..*least {
                                nfa.concat(nfa2.clone());
                            }
                            let mut nfa_zero_or_one = nfa2.clone();
                            nfa_zero_or_one.zero_or_one();
                            for _ in *least..*most {
                                nfa.concat(nfa_zero_or_one.clone());
                            }
                        }
                    },
                }
                Ok(nfa)
            }
            Ast::Group(ref g) => {
                if let GroupKind::NonCapturing(flags) = &g.kind {
                    if flags
                        .items
                        .iter()
                        .any(|f| matches!(f.kind, FlagsItemKind::Flag(_)))
                    {
                        return Err(unsupported!(format!(
                            "{:?}: flags in non-capturing group",
                            flags.items
                        )));
                    }
                }
                Self::compile((*g.ast).clone(), char_class_registry, &mut nfa, multiline)
            }
            Ast::Alternation(ref a) => {
                for ast in a.asts.iter() {
                    let nfa2 = Self::compile(ast.clone(), char_class_registry, &mut Nfa::new(), multiline)?;
                    nfa.alternation(nfa2);
                }
                Ok(nfa)
            }
            Ast::Concat(ref c) => {
                for ast in c.asts.iter() {
                    let nfa2 = Self::compile(ast.clone(), char_class_registry, &mut Nfa::new(), multiline)?;
                    nfa.concat(nfa2);
                }
                Ok(nfa)
            }
        }
    }

    /// The ε-closure of `state`, including context-gated anchor edges whose
    /// condition holds under `ctx`.
    pub(crate) fn epsilon_closure(&self, state: StateID, ctx: AnchorContext) -> Vec<StateID> {
        let mut closure = vec![state];
        let mut i = 0;
        while i < closure.len() {
            let current_state = closure[i];
            for epsilon_transition in self.states[current_state].epsilon_transitions() {
                if !closure.contains(&epsilon_transition.target_state()) {
                    closure.push(epsilon_transition.target_state());
                }
            }
            for anchor_transition in self.states[current_state].anchor_transitions() {
                if ctx.satisfies(anchor_transition.kind)
                    && !closure.contains(&anchor_transition.target_state)
                {
                    closure.push(anchor_transition.target_state);
                }
            }
            i += 1;
        }
        closure.sort_unstable();
        closure.dedup();
        closure
    }

    /// `move(T, a)`: the states reachable from `T` by matching character
    /// class `a`.
    pub(crate) fn move_set(&self, states: &[StateID], char_class: CharClassID) -> Vec<StateID> {
        let mut move_set = Vec::new();
        for state in states {
            for transition in self.states[*state].transitions() {
                if transition.char_class() == char_class {
                    move_set.push(transition.target_state());
                }
            }
        }
        move_set.sort_unstable();
        move_set.dedup();
        move_set
    }

    pub(crate) fn contains_state(&self, state: StateID) -> bool {
        self.states.iter().any(|s| s.id() == state)
    }
}

/// The buffer-position facts relevant to anchor assertions at a given cursor.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct AnchorContext {
    pub(crate) start_of_text: bool,
    pub(crate) start_of_line: bool,
    pub(crate) end_of_text: bool,
    pub(crate) end_of_line: bool,
}

impl AnchorContext {
    pub(crate) fn at(buf: &crate::CharBuffer<'_>, pos: usize) -> Self {
        Self {
            start_of_text: pos == 0,
            start_of_line: buf.at_line_start(pos),
            end_of_text: pos == buf.len(),
            end_of_line: buf.at_line_end(pos),
        }
    }

    fn satisfies(self, kind: AnchorKind) -> bool {
        match kind {
            AnchorKind::StartText => self.start_of_text,
            AnchorKind::StartLine => self.start_of_line,
            AnchorKind::EndText => self.end_of_text,
            AnchorKind::EndLine => self.end_of_line,
        }
    }

    /// A compact encoding used as part of the DFA successor memoization key,
    /// since the same NFA state set can yield different closures depending
    /// on which anchors currently hold.
    pub(crate) fn bits(self) -> u8 {
        (self.start_of_text as u8)
            | (self.start_of_line as u8) << 1
            | (self.end_of_text as u8) << 2
            | (self.end_of_line as u8) << 3
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct NfaState {
    state: StateID,
    epsilon_transitions: Vec<EpsilonTransition>,
    anchor_transitions: Vec<AnchorTransition>,
    transitions: Vec<NfaTransition>,
}

impl NfaState {
    pub(crate) fn new(state: StateID) -> Self {
        Self {
            state,
            epsilon_transitions: Vec::new(),
            anchor_transitions: Vec::new(),
            transitions: Vec::new(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.transitions.is_empty()
            && self.epsilon_transitions.is_empty()
            && self.anchor_transitions.is_empty()
    }

    pub(crate) fn id(&self) -> StateID {
        self.state
    }

    pub(crate) fn transitions(&self) -> &[NfaTransition] {
        &self.transitions
    }

    pub(crate) fn epsilon_transitions(&self) -> &[EpsilonTransition] {
        &self.epsilon_transitions
    }

    pub(crate) fn anchor_transitions(&self) -> &[AnchorTransition] {
        &self.anchor_transitions
    }

    fn offset(&mut self, offset: usize) {
        self.state = StateID::new(self.state.id() + offset as StateIDBase);
        for transition in self.transitions.iter_mut() {
            transition.target_state =
                StateID::new(transition.target_state.id() + offset as StateIDBase);
        }
        for epsilon_transition in self.epsilon_transitions.iter_mut() {
            epsilon_transition.target_state =
                StateID::new(epsilon_transition.target_state.id() + offset as StateIDBase);
        }
        for anchor_transition in self.anchor_transitions.iter_mut() {
            anchor_transition.target_state =
                StateID::new(anchor_transition.target_state.id() + offset as StateIDBase);
        }
    }
}

/// A labeled transition in the NFA.
#[derive(Debug, Clone)]
pub(crate) struct NfaTransition {
    #[allow(unused)]
    ast: ComparableAst,
    target_state: StateID,
    char_class: CharClassID,
}

impl NfaTransition {
    pub(crate) fn target_state(&self) -> StateID {
        self.target_state
    }

    pub(crate) fn char_class(&self) -> CharClassID {
        self.char_class
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct EpsilonTransition {
    pub(crate) target_state: StateID,
}

impl EpsilonTransition {
    pub(crate) fn target_state(&self) -> StateID {
        self.target_state
    }
}
