//! The matching engine seam.
//!
//! Matching itself is delegated to the `regex` crate. The only entry point the
//! cache needs is [`MatchEngine::compile`]; everything after that goes through
//! the [`CompiledPattern`] handle it produces.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use regex::{Captures, Regex, RegexBuilder};

use crate::flags::FlagSet;

/// Something that turns a canonical pattern string and flags into a regex.
pub trait MatchEngine: Send + Sync {
    /// Compile `pattern` with `flags`.
    ///
    /// # Errors
    ///
    /// Returns the engine error if the pattern is malformed.
    fn compile(&self, pattern: &str, flags: FlagSet) -> Result<Regex, regex::Error>;
}

/// The default engine, backed by [`regex::RegexBuilder`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexEngine;

impl MatchEngine for RegexEngine {
    fn compile(&self, pattern: &str, flags: FlagSet) -> Result<Regex, regex::Error> {
        let mut builder = RegexBuilder::new(pattern);
        flags.apply(&mut builder);
        builder.build()
    }
}

/// An engine wrapper that counts compile calls.
///
/// Useful for checking how effective a cache is.
#[derive(Debug, Default)]
pub struct CountingEngine<E = RegexEngine> {
    inner: E,
    compiles: AtomicUsize,
}

impl<E: MatchEngine> CountingEngine<E> {
    /// Wrap an engine.
    #[must_use]
    pub const fn new(inner: E) -> Self {
        Self {
            inner,
            compiles: AtomicUsize::new(0),
        }
    }

    /// Number of compile calls so far, including failed ones.
    #[must_use]
    pub fn compiles(&self) -> usize {
        self.compiles.load(Ordering::SeqCst)
    }
}

impl<E: MatchEngine> MatchEngine for CountingEngine<E> {
    fn compile(&self, pattern: &str, flags: FlagSet) -> Result<Regex, regex::Error> {
        self.compiles.fetch_add(1, Ordering::SeqCst);
        self.inner.compile(pattern, flags)
    }
}

/// A compiled pattern with the canonical string and flags it came from.
pub struct CompiledPattern {
    pattern: String,
    flags: FlagSet,
    regex: Regex,
}

impl CompiledPattern {
    /// Create a new compiled pattern.
    #[must_use]
    pub const fn new(pattern: String, flags: FlagSet, regex: Regex) -> Self {
        Self {
            pattern,
            flags,
            regex,
        }
    }

    /// Get the canonical pattern string.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Get the flags it was compiled with.
    #[must_use]
    pub const fn flags(&self) -> FlagSet {
        self.flags
    }

    /// Get the underlying regex.
    #[must_use]
    pub const fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Number of capture groups, counting the implicit whole-match group.
    #[must_use]
    pub fn captures_len(&self) -> usize {
        self.regex.captures_len()
    }

    /// Check whether a named group exists.
    #[must_use]
    pub fn has_group(&self, name: &str) -> bool {
        self.regex.capture_names().flatten().any(|n| n == name)
    }

    /// Check whether the pattern matches anywhere in `input`.
    #[must_use]
    pub fn is_match(&self, input: &str) -> bool {
        self.regex.is_match(input)
    }

    /// Match anchored at the start of `input`.
    #[must_use]
    pub fn match_at_start<'h>(self: &Arc<Self>, input: &'h str) -> Option<Match<'h>> {
        // Leftmost semantics: if any match starts at 0, the first match does.
        self.regex
            .captures(input)
            .filter(|caps| caps.get(0).is_some_and(|m| m.start() == 0))
            .map(|caps| Match::new(caps, Arc::clone(self)))
    }

    /// First match anywhere in `input`.
    #[must_use]
    pub fn search<'h>(self: &Arc<Self>, input: &'h str) -> Option<Match<'h>> {
        self.regex
            .captures(input)
            .map(|caps| Match::new(caps, Arc::clone(self)))
    }

    /// All non-overlapping matches in `input`.
    #[must_use]
    pub fn find_all<'h>(self: &Arc<Self>, input: &'h str) -> Vec<Match<'h>> {
        self.regex
            .captures_iter(input)
            .map(|caps| Match::new(caps, Arc::clone(self)))
            .collect()
    }

    /// Replace up to `limit` matches (0 for all) using an engine template.
    #[must_use]
    pub fn substitute(&self, input: &str, limit: usize, replacement: &str) -> String {
        self.regex.replacen(input, limit, replacement).into_owned()
    }

    /// Replace up to `limit` matches (0 for all) with the closure's output.
    pub fn substitute_with<F>(self: &Arc<Self>, input: &str, limit: usize, mut f: F) -> String
    where
        F: FnMut(&Match<'_>) -> String,
    {
        let limit = if limit == 0 { usize::MAX } else { limit };
        let mut out = String::with_capacity(input.len());
        let mut last = 0;
        for caps in self.regex.captures_iter(input).take(limit) {
            let found = Match::new(caps, Arc::clone(self));
            out.push_str(&input[last..found.start()]);
            out.push_str(&f(&found));
            last = found.end();
        }
        out.push_str(&input[last..]);
        out
    }
}

impl fmt::Debug for CompiledPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledPattern")
            .field("pattern", &self.pattern)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

/// Result of a successful match.
pub struct Match<'h> {
    captures: Captures<'h>,
    compiled: Arc<CompiledPattern>,
}

impl<'h> Match<'h> {
    fn new(captures: Captures<'h>, compiled: Arc<CompiledPattern>) -> Self {
        Self { captures, compiled }
    }

    fn whole(&self) -> regex::Match<'h> {
        // Group 0 is always present in a successful match.
        self.captures
            .get(0)
            .unwrap_or_else(|| unreachable!("group 0 missing from a match"))
    }

    /// Start offset of the match in the input.
    #[must_use]
    pub fn start(&self) -> usize {
        self.whole().start()
    }

    /// End offset of the match in the input.
    #[must_use]
    pub fn end(&self) -> usize {
        self.whole().end()
    }

    /// Byte range of the match in the input.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.whole().range()
    }

    /// The matched text.
    #[must_use]
    pub fn as_str(&self) -> &'h str {
        self.whole().as_str()
    }

    /// Length of the match in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end() - self.start()
    }

    /// Check if the match is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start() == self.end()
    }

    /// Text of a positional group; 0 is the whole match.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&'h str> {
        self.captures.get(index).map(|m| m.as_str())
    }

    /// Text of a named group.
    #[must_use]
    pub fn name(&self, name: &str) -> Option<&'h str> {
        self.captures.name(name).map(|m| m.as_str())
    }

    /// Positional groups, excluding the whole match.
    #[must_use]
    pub fn groups(&self) -> Vec<Option<&'h str>> {
        self.captures
            .iter()
            .skip(1)
            .map(|m| m.map(|m| m.as_str()))
            .collect()
    }

    /// Participating named groups, keyed by name.
    #[must_use]
    pub fn named_groups(&self) -> BTreeMap<&str, &'h str> {
        self.compiled
            .regex
            .capture_names()
            .flatten()
            .filter_map(|name| self.name(name).map(|text| (name, text)))
            .collect()
    }

    /// The compiled pattern that produced this match.
    #[must_use]
    pub fn pattern(&self) -> &CompiledPattern {
        &self.compiled
    }
}

impl fmt::Debug for Match<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Match")
            .field("range", &self.range())
            .field("text", &self.as_str())
            .field("groups", &self.groups())
            .finish()
    }
}
