//! Matcher configuration.
use crate::{MatcherError, Result};

/// Which prefilter(s) the driver consults before spawning new [`crate::Match`]es.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrefilterMode {
    /// No prefilter: every pattern is a spawn candidate at every position.
    None,
    /// Only the first-character index is consulted.
    #[default]
    FirstChar,
    /// Only the Aho-Corasick literal trie is consulted.
    Aho,
    /// Both prefilters run; a pattern is a spawn candidate only if both agree.
    Both,
}

impl PrefilterMode {
    pub(crate) fn uses_first_char(self) -> bool {
        matches!(self, PrefilterMode::FirstChar | PrefilterMode::Both)
    }

    pub(crate) fn uses_aho_corasick(self) -> bool {
        matches!(self, PrefilterMode::Aho | PrefilterMode::Both)
    }
}

/// Matcher-wide configuration, validated eagerly whenever it changes.
///
/// Mirrors the options of the registration API: `multiline`, `case_insensitive`,
/// `dot_matches_newline`, `prefilter`, `literal_min_length`, `max_nfa_nodes_per_pattern`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub(crate) multiline: bool,
    pub(crate) case_insensitive: bool,
    pub(crate) dot_matches_newline: bool,
    pub(crate) prefilter: PrefilterMode,
    pub(crate) literal_min_length: usize,
    pub(crate) max_nfa_nodes_per_pattern: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            multiline: false,
            case_insensitive: false,
            dot_matches_newline: false,
            prefilter: PrefilterMode::FirstChar,
            literal_min_length: 3,
            max_nfa_nodes_per_pattern: 16384,
        }
    }
}

impl Config {
    /// Returns whether `^`/`$` match at line boundaries rather than only at
    /// the start/end of the whole buffer.
    pub fn multiline(&self) -> bool {
        self.multiline
    }

    /// Returns whether patterns are compiled case-insensitively by default.
    pub fn case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// Returns whether `.` matches `\n`.
    pub fn dot_matches_newline(&self) -> bool {
        self.dot_matches_newline
    }

    /// Returns the active prefilter mode.
    pub fn prefilter(&self) -> PrefilterMode {
        self.prefilter
    }

    /// Returns the minimum literal length eligible for the Aho-Corasick hint.
    pub fn literal_min_length(&self) -> usize {
        self.literal_min_length
    }

    /// Returns the per-pattern NFA node budget.
    pub fn max_nfa_nodes_per_pattern(&self) -> usize {
        self.max_nfa_nodes_per_pattern
    }

    /// Apply a single named option, validating it. Unknown option names and
    /// out-of-range values are rejected with [`crate::MatcherErrorKind::ConfigError`]
    /// and leave `self` unchanged.
    pub fn set(&mut self, option: &str, value: ConfigValue) -> Result<()> {
        let mut next = self.clone();
        match (option, value) {
            ("multiline", ConfigValue::Bool(b)) => next.multiline = b,
            ("case_insensitive", ConfigValue::Bool(b)) => next.case_insensitive = b,
            ("dot_matches_newline", ConfigValue::Bool(b)) => next.dot_matches_newline = b,
            ("literal_min_length", ConfigValue::Int(n)) if n >= 0 => {
                next.literal_min_length = n as usize
            }
            ("max_nfa_nodes_per_pattern", ConfigValue::Int(n)) if n > 0 => {
                next.max_nfa_nodes_per_pattern = n as usize
            }
            ("prefilter", ConfigValue::Prefilter(mode)) => next.prefilter = mode,
            (other, _) => {
                return Err(MatcherError::config(
                    other,
                    "unknown option or value of the wrong type",
                ))
            }
        }
        *self = next;
        Ok(())
    }
}

/// A typed value for [`Config::set`].
#[derive(Debug, Clone, Copy)]
pub enum ConfigValue {
    /// A boolean option value.
    Bool(bool),
    /// An integer option value.
    Int(i64),
    /// A prefilter mode option value.
    Prefilter(PrefilterMode),
}
