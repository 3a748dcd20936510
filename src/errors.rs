//! Error types for the matcher engine.
use thiserror::Error;

/// The result type returned by this crate's fallible operations.
pub type Result<T> = std::result::Result<T, MatcherError>;

/// The error type returned by this crate's fallible operations.
///
/// This is a thin wrapper around a boxed [`MatcherErrorKind`] so that `Result`'s
/// error type stays a single, cheaply movable, `Sized` struct.
#[derive(Error, Debug)]
pub struct MatcherError {
    /// The underlying error kind.
    pub source: Box<MatcherErrorKind>,
}

impl MatcherError {
    /// Create a new `MatcherError` from a kind.
    pub fn new(kind: MatcherErrorKind) -> Self {
        MatcherError {
            source: Box::new(kind),
        }
    }
}

impl std::fmt::Display for MatcherError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}

/// The part of pattern compilation that failed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileErrorKind {
    /// The regex failed to parse.
    #[error("syntax error")]
    Syntax,
    /// The regex uses a feature the compiler does not support.
    #[error("unsupported feature")]
    UnsupportedFeature,
    /// Compiling the regex would exceed a configured size limit.
    #[error("limit exceeded")]
    LimitExceeded,
}

/// The error kind type.
#[derive(Error, Debug)]
pub enum MatcherErrorKind {
    /// Syntax error, unsupported feature, or size limit in a registered regex.
    #[error("{kind}: {message}")]
    CompileError {
        /// Which of the three compile failure modes occurred.
        kind: CompileErrorKind,
        /// Byte offset into the regex source where the problem was detected, if known.
        position: Option<usize>,
        /// Human-readable detail.
        message: String,
    },

    /// An invalid or unknown configuration option was supplied.
    #[error("invalid configuration option '{option}': {reason}")]
    ConfigError {
        /// The offending option name.
        option: String,
        /// Why it was rejected.
        reason: String,
    },

    /// An operation was attempted that the engine's current lifecycle state forbids.
    #[error("precondition violated: {0}")]
    PreconditionError(String),

    /// A `match` call was cut short by the caller's cancellation token.
    #[error("match cancelled")]
    Cancelled,

    /// An automaton invariant was violated. Should never surface outside of
    /// development builds; if it does, the shared DFA store must be treated
    /// as poisoned and the engine restarted.
    #[error("internal error: {0}")]
    InternalError(String),

    /// An error occurred while parsing the regex syntax itself.
    #[error("'{1}' {0}")]
    RegexSyntaxError(regex_syntax::ast::Error, String),
}

impl From<regex_syntax::ast::Error> for MatcherError {
    fn from(error: regex_syntax::ast::Error) -> Self {
        MatcherError::new(MatcherErrorKind::RegexSyntaxError(error, "!".to_string()))
    }
}

impl MatcherError {
    /// Build a [`MatcherErrorKind::CompileError`] with `kind = Syntax`.
    pub fn syntax(position: Option<usize>, message: impl Into<String>) -> Self {
        MatcherError::new(MatcherErrorKind::CompileError {
            kind: CompileErrorKind::Syntax,
            position,
            message: message.into(),
        })
    }

    /// Build a [`MatcherErrorKind::CompileError`] with `kind = UnsupportedFeature`.
    pub fn unsupported_feature(message: impl Into<String>) -> Self {
        MatcherError::new(MatcherErrorKind::CompileError {
            kind: CompileErrorKind::UnsupportedFeature,
            position: None,
            message: message.into(),
        })
    }

    /// Build a [`MatcherErrorKind::CompileError`] with `kind = LimitExceeded`.
    pub fn limit_exceeded(message: impl Into<String>) -> Self {
        MatcherError::new(MatcherErrorKind::CompileError {
            kind: CompileErrorKind::LimitExceeded,
            position: None,
            message: message.into(),
        })
    }

    /// Build a [`MatcherErrorKind::ConfigError`].
    pub fn config(option: impl Into<String>, reason: impl Into<String>) -> Self {
        MatcherError::new(MatcherErrorKind::ConfigError {
            option: option.into(),
            reason: reason.into(),
        })
    }

    /// Build a [`MatcherErrorKind::PreconditionError`].
    pub fn precondition(message: impl Into<String>) -> Self {
        MatcherError::new(MatcherErrorKind::PreconditionError(message.into()))
    }

    /// Build the [`MatcherErrorKind::Cancelled`] error.
    pub fn cancelled() -> Self {
        MatcherError::new(MatcherErrorKind::Cancelled)
    }

    /// Build a [`MatcherErrorKind::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        MatcherError::new(MatcherErrorKind::InternalError(message.into()))
    }

    /// True if this error is a [`MatcherErrorKind::Cancelled`].
    pub fn is_cancelled(&self) -> bool {
        matches!(*self.source, MatcherErrorKind::Cancelled)
    }
}
