//! The public facade: a builder-free, directly mutable matcher over a set of
//! registered patterns.
//!
//! Grounded on the reference scanner's `Scanner`/`ScannerBuilder` split (a
//! thin public struct delegating to an internal impl), but flattened into a
//! single type: patterns are added and removed at any time rather than fixed
//! up front at `build()`, per §4.1's registration contract.

use crate::config::PrefilterMode;
use crate::registry::Registry;
use crate::{Action, Config, ConfigValue, PatternId, Result};

/// Per-pattern overrides passed to [`Matcher::add`].
///
/// Any field left `None` falls back to the matcher-wide [`Config`] in effect
/// at the time the pattern is registered.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternFlags {
    /// Overrides [`Config::case_insensitive`] for this pattern only.
    pub case_insensitive: Option<bool>,
}

impl PatternFlags {
    /// No overrides: the pattern inherits every matcher-wide default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Match this pattern without regard to letter case.
    pub fn case_insensitive(mut self, yes: bool) -> Self {
        self.case_insensitive = Some(yes);
        self
    }
}

/// A multi-pattern regex matcher.
///
/// A `Matcher` owns a set of registered patterns, each with its own
/// [`Action`] callback, and drives every one of them to completion over an
/// input buffer in a single pass via [`Matcher::find`]. Patterns can be
/// added and removed at any time except while a match is in progress.
pub struct Matcher {
    registry: Registry,
}

impl Matcher {
    /// Creates an empty matcher with default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates an empty matcher with the given matcher-wide configuration.
    pub fn with_config(config: Config) -> Self {
        Self {
            registry: Registry::new(config),
        }
    }

    /// Registers a pattern with an action to invoke on each of its matches.
    ///
    /// Returns the [`PatternId`] the pattern was assigned, or a
    /// `CompileError`/`RegexSyntaxError` if `regex` fails to parse or exceeds
    /// configured limits. Rejection never mutates the matcher's state.
    pub fn add(&self, regex: &str, action: Action, flags: PatternFlags) -> Result<PatternId> {
        let case_insensitive = flags
            .case_insensitive
            .unwrap_or_else(|| self.registry.config().case_insensitive());
        self.registry.add(regex, action, case_insensitive)
    }

    /// Removes a previously registered pattern.
    ///
    /// `PreconditionError` if `id` is not currently registered, or if a match
    /// is in progress.
    pub fn remove(&self, id: PatternId) -> Result<()> {
        self.registry.remove(id)
    }

    /// Reconfigures which prefilter(s) the driver consults before spawning
    /// new matches. `PreconditionError` while a match is in progress.
    pub fn configure_prefilter(&self, mode: PrefilterMode, literal_min_length: usize) -> Result<()> {
        self.registry.configure_prefilter(mode, literal_min_length)
    }

    /// Sets a single configuration option by name.
    ///
    /// `ConfigError` for an unknown option or an out-of-range value;
    /// `PreconditionError` while a match is in progress.
    pub fn set_config(&self, option: &str, value: ConfigValue) -> Result<()> {
        self.registry.set_config(option, value)
    }

    /// The matcher-wide configuration currently in effect.
    pub fn config(&self) -> Config {
        self.registry.config()
    }

    /// Runs every registered pattern's matching over `text`, invoking each
    /// pattern's action once per committed match, in ascending order of
    /// match end position (ties broken by ascending pattern id).
    ///
    /// Returns `Ok(())` once the whole buffer has been scanned. If `cancel`
    /// is given and returns `true` at some point during the scan, any match
    /// already committed survives and the call still returns
    /// `Err(MatcherErrorKind::Cancelled)`.
    pub fn find(&self, text: &str) -> Result<()> {
        self.registry.match_buffer(text, || false)
    }

    /// Like [`Matcher::find`], but polls `cancel` once per input position
    /// and stops early (without losing already-committed matches) once it
    /// returns `true`.
    pub fn find_cancellable(&self, text: &str, cancel: impl FnMut() -> bool) -> Result<()> {
        self.registry.match_buffer(text, cancel)
    }

    /// Logs every registered pattern's compiled NFA as Graphviz dot output
    /// via the `log` crate at `debug` level.
    ///
    /// Enable with `RUST_LOG=multimatch::registry=debug` (or broader) to see it.
    #[cfg(feature = "dot_writer")]
    pub fn log_patterns_as_dot(&self) -> Result<()> {
        self.registry.log_patterns_as_dot()
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new()
    }
}
