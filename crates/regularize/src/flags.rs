//! Matching-mode flags.
//!
//! A [`FlagSet`] is a small `Copy` value, so every operation on it already
//! returns a new set and leaves the original untouched. Flags are handed to
//! the engine as builder options and never spliced into the pattern text.
//! [`FlagSet::ASCII_ONLY`] is the exception: the engine stays in Unicode mode
//! so that `.` and negated classes keep compiling, and the renderer writes
//! ASCII classes in place of `\w`, `\s` and `\b`.

use std::fmt;

use regex::RegexBuilder;

use crate::error::{RegularizeError, Result};

bitflags::bitflags! {
    /// Matching-mode flags attached to a pattern.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FlagSet: u8 {
        /// Letters match regardless of case (`i`).
        const CASE_INSENSITIVE = 0b0000_0001;
        /// `^` and `$` match at line boundaries (`m`).
        const MULTILINE = 0b0000_0010;
        /// `.` also matches `\n` (`s`).
        const DOT_MATCHES_NEWLINE = 0b0000_0100;
        /// Whitespace and `#` comments in the pattern are ignored (`x`).
        const IGNORE_WHITESPACE = 0b0000_1000;
        /// Quantifiers are lazy by default and `?` makes them greedy (`U`).
        const SWAP_GREED = 0b0001_0000;
        /// `\r\n` is treated as a line terminator in multiline mode (`R`).
        const CRLF = 0b0010_0000;
        /// Shorthand classes and word boundaries are ASCII only (`-u`).
        ///
        /// Applies to fragments built through [`Pattern`](crate::Pattern)
        /// methods; raw text is passed through untouched. Case folding stays
        /// Unicode aware.
        const ASCII_ONLY = 0b0100_0000;
        /// Shorthand classes and case folding are Unicode aware (`u`).
        const UNICODE = 0b1000_0000;
    }
}

/// Pairs of flags that cannot be active at the same time.
const EXCLUSIVE: &[(FlagSet, FlagSet)] = &[(FlagSet::ASCII_ONLY, FlagSet::UNICODE)];

/// Inline letters in rendering order.
const LETTERS: &[(FlagSet, &str)] = &[
    (FlagSet::CASE_INSENSITIVE, "i"),
    (FlagSet::MULTILINE, "m"),
    (FlagSet::DOT_MATCHES_NEWLINE, "s"),
    (FlagSet::IGNORE_WHITESPACE, "x"),
    (FlagSet::SWAP_GREED, "U"),
    (FlagSet::CRLF, "R"),
    (FlagSet::UNICODE, "u"),
];

impl FlagSet {
    /// Return a set with `flags` added.
    ///
    /// Adding a flag that is already present is a no-op. Adding a flag whose
    /// exclusive partner is present fails.
    pub fn with(self, flags: Self) -> Result<Self> {
        flags.check()?;
        for &(a, b) in EXCLUSIVE {
            if self.contains(a) && flags.contains(b) {
                return Err(RegularizeError::incompatible_flags(a.describe(), b.describe()));
            }
            if self.contains(b) && flags.contains(a) {
                return Err(RegularizeError::incompatible_flags(b.describe(), a.describe()));
            }
        }
        Ok(self | flags)
    }

    /// Return a set with `flags` removed.
    #[must_use]
    pub const fn without(self, flags: Self) -> Self {
        self.difference(flags)
    }

    /// Union of two sets, as used when concatenating patterns.
    pub fn merge(self, other: Self) -> Result<Self> {
        self.with(other)
    }

    /// Verify that no mutually exclusive flags are both present.
    pub fn check(self) -> Result<Self> {
        for &(a, b) in EXCLUSIVE {
            if self.contains(a | b) {
                return Err(RegularizeError::incompatible_flags(a.describe(), b.describe()));
            }
        }
        Ok(self)
    }

    /// Human-readable name of the flags in this set.
    #[must_use]
    pub fn describe(self) -> String {
        if self.is_empty() {
            return "no flags".to_string();
        }
        self.iter_names()
            .map(|(name, _)| name.to_lowercase().replace('_', "-"))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Inline-flag rendering, e.g. `im` or `i-u`.
    #[must_use]
    pub fn inline(self) -> String {
        let mut out: String = LETTERS
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, letter)| *letter)
            .collect();
        if self.contains(Self::ASCII_ONLY) {
            out.push_str("-u");
        }
        out
    }

    /// Configure an engine builder with these flags.
    pub fn apply(self, builder: &mut RegexBuilder) {
        builder
            .case_insensitive(self.contains(Self::CASE_INSENSITIVE))
            .multi_line(self.contains(Self::MULTILINE))
            .dot_matches_new_line(self.contains(Self::DOT_MATCHES_NEWLINE))
            .ignore_whitespace(self.contains(Self::IGNORE_WHITESPACE))
            .swap_greed(self.contains(Self::SWAP_GREED))
            .crlf(self.contains(Self::CRLF))
            .unicode(true);
    }
}

impl fmt::Display for FlagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inline())
    }
}
