#![forbid(missing_docs)]
//! # A multi-pattern regular expression matching engine.
//!
//! This crate compiles a set of independently registered regex patterns into
//! a shared Thompson-construction NFA, subset-constructs a lazy DFA over it
//! on demand, and drives every pattern's matching in a single pass over an
//! input buffer. Unlike a tokenizer, it does not pick one winning pattern per
//! position: every registered pattern reports its own leftmost-longest
//! matches independently, each through the [`Action`] callback it was
//! registered with.
//!
//! Patterns can be registered and removed at any time via [`Matcher::add`]
//! and [`Matcher::remove`]; an optional first-character index and
//! Aho-Corasick literal prefilter (configurable through
//! [`Matcher::configure_prefilter`]) narrow which patterns are considered at
//! each position without changing which matches are reported.
//!
//! To parse the given regular expressions, the crate uses the `regex-syntax`
//! crate's AST layer directly, bypassing its `Hir` translation so that
//! per-pattern case-folding and anchor handling stay under this crate's
//! control.

/// Module with error definitions.
mod errors;
pub use errors::{MatcherError, MatcherErrorKind, Result};

/// Module with matcher-wide configuration.
mod config;
pub use config::{Config, ConfigValue, PrefilterMode};

/// Module with the random-access character buffer matching runs over.
mod buffer;
pub use buffer::CharBuffer;

/// Module with a wall-clock convenience wrapper for match cancellation.
mod deadline;
pub use deadline::Deadline;

/// The module with internal implementation details.
mod internal;

/// Module that provides the public matcher facade.
mod matcher;
pub use matcher::{Matcher, PatternFlags};

/// Module that provides a Pattern type and its Action callback.
mod pattern;
pub use pattern::{Action, Pattern, PatternId};

/// Module with the pattern registry backing `Matcher`.
mod registry;

/// Module that provides a Span type.
mod span;
pub use span::Span;
