//! Matching operations over a [`Pattern`].
//!
//! A [`Finder`] compiles its pattern through a [`PatternCache`] on first use
//! and keeps the handle, so repeated calls never touch the cache again. No
//! match is `Ok(None)`; errors only come from compilation.

use std::sync::{Arc, OnceLock};

use crate::cache::{PatternCache, global_cache};
use crate::engine::{CompiledPattern, Match};
use crate::error::Result;
use crate::pattern::Pattern;

/// Runs match, search and find-all over one pattern.
#[derive(Debug)]
pub struct Finder {
    pattern: Pattern,
    cache: Arc<PatternCache>,
    compiled: OnceLock<Arc<CompiledPattern>>,
}

impl Finder {
    /// Create a finder that compiles through the global cache.
    #[must_use]
    pub fn new(pattern: Pattern) -> Self {
        Self::with_cache(pattern, global_cache())
    }

    /// Create a finder that compiles through `cache`.
    #[must_use]
    pub const fn with_cache(pattern: Pattern, cache: Arc<PatternCache>) -> Self {
        Self {
            pattern,
            cache,
            compiled: OnceLock::new(),
        }
    }

    /// The pattern being matched.
    #[must_use]
    pub const fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// The compiled handle, compiling on first call.
    ///
    /// # Errors
    ///
    /// Returns [`RegularizeError::PatternCompilation`](crate::RegularizeError::PatternCompilation)
    /// if the engine rejects the pattern.
    pub fn compiled(&self) -> Result<&Arc<CompiledPattern>> {
        if let Some(compiled) = self.compiled.get() {
            return Ok(compiled);
        }
        let compiled = self.cache.get_or_compile_canonical(&self.pattern.compile())?;
        Ok(self.compiled.get_or_init(|| compiled))
    }

    /// Check whether the pattern matches anywhere in `input`.
    pub fn is_match(&self, input: &str) -> Result<bool> {
        Ok(self.compiled()?.is_match(input))
    }

    /// Match anchored at the start of `input`.
    ///
    /// ```rust
    /// use regularize::{Finder, Pattern};
    ///
    /// let finder = Finder::new(Pattern::new().digits().at_least_one().unwrap());
    /// assert_eq!(finder.match_at_start("42 apples").unwrap().unwrap().as_str(), "42");
    /// assert!(finder.match_at_start("apples 42").unwrap().is_none());
    /// ```
    pub fn match_at_start<'h>(&self, input: &'h str) -> Result<Option<Match<'h>>> {
        Ok(self.compiled()?.match_at_start(input))
    }

    /// First match anywhere in `input`.
    pub fn search<'h>(&self, input: &'h str) -> Result<Option<Match<'h>>> {
        Ok(self.compiled()?.search(input))
    }

    /// All non-overlapping matches in `input`, left to right.
    pub fn find_all<'h>(&self, input: &'h str) -> Result<Vec<Match<'h>>> {
        Ok(self.compiled()?.find_all(input))
    }

    /// Text of all non-overlapping matches in `input`.
    pub fn find_strings<'h>(&self, input: &'h str) -> Result<Vec<&'h str>> {
        Ok(self
            .compiled()?
            .regex()
            .find_iter(input)
            .map(|m| m.as_str())
            .collect())
    }
}

impl From<Pattern> for Finder {
    fn from(pattern: Pattern) -> Self {
        Self::new(pattern)
    }
}
