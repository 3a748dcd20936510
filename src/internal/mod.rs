/// Byte-classification fast paths for the ASCII subset of the input alphabet.
pub(crate) mod ascii;

/// Per-thread scratch buffers and bitset pools for the match driver.
pub(crate) mod buffer_pool;

/// Character classes as closures over `char`, interned by [`CharacterClassRegistry`].
mod character_class;
pub(crate) use character_class::CharacterClass;

/// Registry of character classes, deduplicated by AST shape.
mod character_class_registry;
pub(crate) use character_class_registry::CharacterClassRegistry;

/// Comparable wrapper around `regex_syntax::ast::Ast`, used as a dedup key.
pub(crate) mod comparable_ast;
pub(crate) use comparable_ast::ComparableAst;

/// Graphviz dot rendering of automata, for debugging.
#[cfg(feature = "dot_writer")]
pub(crate) mod dot;

/// ID newtypes shared across the automaton layer.
mod ids;
pub(crate) use ids::{CharClassID, DfaStateID, PatternID, StateID};

/// Aho-Corasick literal prefilter over the registered patterns' literal hints.
pub(crate) mod aho_corasick;

/// Lazy, thread-safe NFA-to-DFA subset construction node store.
pub(crate) mod dfa_store;

/// Literal hint extraction for prefilter selection.
pub(crate) mod literal_hint;

/// Match driver: the Spawn/Advance/Commit/Sweep state machine.
pub(crate) mod match_set;
pub(crate) use match_set::{Automaton, Committed};

/// Converts AST character classes into match closures.
mod match_function;
pub(crate) use match_function::MatchFunction;

/// The multi-pattern NFA arena shared by every registered pattern.
mod multi_pattern_nfa;
pub(crate) use multi_pattern_nfa::MultiPatternNfa;

/// Thompson-construction NFA compiler for a single pattern.
mod nfa;
pub(crate) use nfa::{AnchorContext, AnchorKind, Nfa};

/// Regex syntax parser, including `\Q...\E` literal-block expansion.
mod parser;
pub(crate) use parser::{fold_case, parse_regex_syntax};

/// Combined first-character / Aho-Corasick prefilter selection.
pub(crate) mod prefilter;
