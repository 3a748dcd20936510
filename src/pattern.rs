//! Module with the pattern type and its associated action callback.

use crate::internal::literal_hint::LiteralHint;
use crate::internal::PatternID as InternalPatternID;

/// The opaque id assigned to a pattern at registration.
///
/// Distinct from the automaton layer's internal `PatternID`: this is the
/// handle the public API hands back from [`crate::Matcher::add`] and that
/// [`crate::Matcher::remove`] accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PatternId(usize);

impl PatternId {
    pub(crate) fn from_internal(id: InternalPatternID) -> Self {
        PatternId(id.as_usize())
    }

    pub(crate) fn to_internal(self) -> InternalPatternID {
        InternalPatternID::new(self.0)
    }

    /// The id as a plain integer, for logging and diagnostics.
    pub fn as_usize(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for PatternId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A boxed callback invoked once per maximal match span of a [`Pattern`].
///
/// Mirrors the boxed match-function idiom used for character-class
/// predicates elsewhere in this crate: a thin newtype around a trait object
/// so the call site stays a simple `(self.0)(...)`.
pub struct Action(Box<dyn Fn(&str, usize, usize) + Send + Sync>);

impl Action {
    /// Wrap a closure as an action callback.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str, usize, usize) + Send + Sync + 'static,
    {
        Action(Box::new(f))
    }

    /// Invoke the callback with the matched text and its inclusive span.
    #[inline]
    pub(crate) fn call(&self, matched: &str, start_inclusive: usize, end_inclusive: usize) {
        (self.0)(matched, start_inclusive, end_inclusive)
    }
}

impl std::fmt::Debug for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Action(..)")
    }
}

/// A registered pattern: its regex source, assigned id, compile-time flags,
/// and whatever static analysis (§4.3) the registry could derive from it.
///
/// The action callback itself lives alongside the pattern in the registry
/// rather than on this struct, since `Pattern` is otherwise small, `Clone`,
/// and useful for diagnostics on its own (e.g. rendering `source` in a
/// Graphviz label) independent of the callback it drives.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pattern {
    id: PatternId,
    source: String,
    case_insensitive: bool,
    literal_hint: Option<LiteralHint>,
}

impl Pattern {
    pub(crate) fn new(
        id: InternalPatternID,
        source: String,
        case_insensitive: bool,
        literal_hint: Option<LiteralHint>,
    ) -> Self {
        Self {
            id: PatternId::from_internal(id),
            source,
            case_insensitive,
            literal_hint,
        }
    }

    /// The id assigned to this pattern at registration.
    #[inline]
    pub fn id(&self) -> PatternId {
        self.id
    }

    /// The regex source this pattern was compiled from.
    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether this pattern was compiled case-insensitively.
    #[inline]
    pub fn case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// The statically-derived literal hint used to seed the Aho-Corasick
    /// prefilter, if the registry could find one.
    pub(crate) fn literal_hint(&self) -> Option<&LiteralHint> {
        self.literal_hint.as_ref()
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source.escape_default())
    }
}
