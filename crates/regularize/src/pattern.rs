//! The immutable pattern builder.
//!
//! A [`Pattern`] is a persistent sequence of [`Fragment`]s plus a
//! [`FlagSet`] and the extension registry it resolves names against. Every
//! builder method returns a new value and leaves the receiver untouched:
//!
//! ```rust
//! use regularize::Pattern;
//!
//! let base = Pattern::new().literal("application.");
//! let numbered = base.digits().at_least_one().unwrap().literal(".log");
//!
//! assert_eq!(base.canonical_string(), r"application\.");
//! assert_eq!(numbered.canonical_string(), r"application\.[0-9]+\.log");
//! ```
//!
//! Sequences are `im::Vector`s, so appending to a long chain shares
//! structure with the receiver instead of copying it.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, BitOr};
use std::sync::Arc;

use crate::cache::global_cache;
use crate::engine::{CompiledPattern, Match};
use crate::error::{RegularizeError, Result};
use crate::extension::{ExtArg, ExtensionRegistry};
use crate::flags::FlagSet;
use crate::fragment::{Anchor, ClassMember, Fragment, GroupSpec, Sequence, render_sequence};

/// Capture names used anywhere in a pattern.
type GroupNames = im::HashSet<Arc<str>>;

/// The rendered form of a pattern: canonical string plus flags.
///
/// This is the cache key. Two patterns with equal canonical forms are
/// interchangeable no matter how they were built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalPattern {
    pattern: String,
    flags: FlagSet,
}

impl CanonicalPattern {
    /// Create a canonical form from an already rendered pattern string.
    #[must_use]
    pub fn new(pattern: impl Into<String>, flags: FlagSet) -> Self {
        Self {
            pattern: pattern.into(),
            flags,
        }
    }

    /// The canonical pattern string.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The flags.
    #[must_use]
    pub const fn flags(&self) -> FlagSet {
        self.flags
    }

    /// Split into the pattern string and flags.
    #[must_use]
    pub fn into_parts(self) -> (String, FlagSet) {
        (self.pattern, self.flags)
    }
}

impl fmt::Display for CanonicalPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.pattern, self.flags)
    }
}

/// An immutable, composable regular expression.
#[derive(Clone)]
pub struct Pattern {
    fragments: Sequence,
    flags: FlagSet,
    names: GroupNames,
    registry: Arc<ExtensionRegistry>,
}

impl Pattern {
    /// An empty pattern bound to the global extension registry.
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(ExtensionRegistry::global())
    }

    /// An empty pattern bound to a specific extension registry.
    #[must_use]
    pub fn with_registry(registry: Arc<ExtensionRegistry>) -> Self {
        Self {
            fragments: Sequence::new(),
            flags: FlagSet::empty(),
            names: GroupNames::new(),
            registry,
        }
    }

    /// The fragments, in concatenation order.
    #[must_use]
    pub const fn fragments(&self) -> &Sequence {
        &self.fragments
    }

    /// The flags.
    #[must_use]
    pub const fn flags(&self) -> FlagSet {
        self.flags
    }

    /// The extension registry used by [`ext`](Self::ext).
    #[must_use]
    pub const fn registry(&self) -> &Arc<ExtensionRegistry> {
        &self.registry
    }

    /// Check if nothing has been appended yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Number of top-level fragments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    fn with_fragments(&self, fragments: Sequence) -> Self {
        Self {
            fragments,
            flags: self.flags,
            names: self.names.clone(),
            registry: Arc::clone(&self.registry),
        }
    }

    fn push(&self, fragment: Fragment) -> Self {
        let mut fragments = self.fragments.clone();
        fragments.push_back(fragment);
        self.with_fragments(fragments)
    }

    fn map_last(
        &self,
        empty: RegularizeError,
        wrap: impl FnOnce(Fragment) -> Result<Fragment>,
    ) -> Result<Self> {
        let mut fragments = self.fragments.clone();
        let last = fragments.pop_back().ok_or(empty)?;
        fragments.push_back(wrap(last)?);
        Ok(self.with_fragments(fragments))
    }

    /// Append an arbitrary fragment.
    ///
    /// Intended for extensions that need a construct the builder methods do
    /// not cover.
    ///
    /// # Errors
    ///
    /// Returns [`RegularizeError::DuplicateGroupName`] if the fragment
    /// reuses a capture name already present.
    pub fn push_fragment(&self, fragment: Fragment) -> Result<Self> {
        let mut added = Vec::new();
        fragment.for_each_group_name(&mut |name: &str| added.push(Arc::<str>::from(name)));
        let names = merge_names(self.names.clone(), added)?;
        let mut next = self.push(fragment);
        next.names = names;
        Ok(next)
    }

    // Appenders

    /// Append fixed text. Metacharacters are escaped.
    #[must_use]
    pub fn literal(&self, text: impl Into<Arc<str>>) -> Self {
        self.push(Fragment::literal(text))
    }

    /// Append pattern text verbatim, without escaping.
    ///
    /// Capture groups inside raw text are invisible to
    /// [`group_names`](Self::group_names) and to duplicate-name checks.
    #[must_use]
    pub fn raw(&self, text: impl Into<Arc<str>>) -> Self {
        self.push(Fragment::raw(text))
    }

    /// Append `.`, any single character.
    #[must_use]
    pub fn wildcard(&self) -> Self {
        self.push(Fragment::Wildcard)
    }

    /// Append `.+`, one or more of any character.
    #[must_use]
    pub fn match_all(&self) -> Self {
        self.push(Fragment::Quantifier {
            inner: Arc::new(Fragment::Wildcard),
            minimum: 1,
            maximum: None,
        })
    }

    /// Append a character set matching any of `members`.
    #[must_use]
    pub fn any_of<I, M>(&self, members: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<ClassMember>,
    {
        self.push(Fragment::character_set(members, false))
    }

    /// Append a character set matching any character in `chars`.
    #[must_use]
    pub fn any_of_chars(&self, chars: &str) -> Self {
        self.any_of(ClassMember::chars(chars))
    }

    /// Append a character set matching anything *not* in `members`.
    #[must_use]
    pub fn none_of<I, M>(&self, members: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<ClassMember>,
    {
        self.push(Fragment::character_set(members, true))
    }

    /// Append a character set matching any character *not* in `chars`.
    #[must_use]
    pub fn none_of_chars(&self, chars: &str) -> Self {
        self.none_of(ClassMember::chars(chars))
    }

    /// Append `[0-9]`.
    #[must_use]
    pub fn digits(&self) -> Self {
        self.any_of([ClassMember::Digit])
    }

    /// Append a single digit between `minimum` and `maximum` inclusive.
    ///
    /// # Errors
    ///
    /// Returns [`RegularizeError::InvalidRange`] if `minimum > maximum` or
    /// `maximum > 9`.
    pub fn any_number_between(&self, minimum: u32, maximum: u32) -> Result<Self> {
        if minimum > maximum || maximum > 9 {
            return Err(RegularizeError::invalid_range(minimum, maximum));
        }
        let digit = |n: u32| char::from_digit(n, 10).unwrap_or('0');
        let member = if minimum == maximum {
            ClassMember::Char(digit(minimum))
        } else {
            ClassMember::Range(digit(minimum), digit(maximum))
        };
        Ok(self.any_of([member]))
    }

    /// Append `[a-z]`.
    #[must_use]
    pub fn lowercase_ascii_letters(&self) -> Self {
        self.any_of([ClassMember::AsciiLowercase])
    }

    /// Append `[A-Z]`.
    #[must_use]
    pub fn uppercase_ascii_letters(&self) -> Self {
        self.any_of([ClassMember::AsciiUppercase])
    }

    /// Append `[a-zA-Z]`.
    #[must_use]
    pub fn ascii_letters(&self) -> Self {
        self.any_of([ClassMember::AsciiLetter])
    }

    /// Append `\w`.
    #[must_use]
    pub fn word_characters(&self) -> Self {
        self.any_of([ClassMember::Word])
    }

    /// Append `\s`.
    #[must_use]
    pub fn whitespace(&self) -> Self {
        self.any_of([ClassMember::Whitespace])
    }

    /// Append `\S`.
    #[must_use]
    pub fn non_whitespace(&self) -> Self {
        self.any_of([ClassMember::NonWhitespace])
    }

    // Quantity modifiers

    /// Repeat the last fragment between `minimum` and `maximum` times.
    ///
    /// `None` means unbounded.
    ///
    /// # Errors
    ///
    /// Returns [`RegularizeError::EmptyPatternQuantify`] on an empty pattern
    /// and [`RegularizeError::InvalidRange`] if `maximum < minimum`.
    pub fn quantify(&self, minimum: u32, maximum: Option<u32>) -> Result<Self> {
        self.map_last(RegularizeError::EmptyPatternQuantify, |last| {
            Fragment::quantifier(last, minimum, maximum)
        })
    }

    /// Repeat the last fragment exactly `n` times.
    pub fn exactly(&self, n: u32) -> Result<Self> {
        self.quantify(n, Some(n))
    }

    /// Repeat the last fragment at least `n` times.
    pub fn at_least(&self, n: u32) -> Result<Self> {
        self.quantify(n, None)
    }

    /// Repeat the last fragment at most `n` times.
    pub fn at_most(&self, n: u32) -> Result<Self> {
        self.quantify(0, Some(n))
    }

    /// Repeat the last fragment between `minimum` and `maximum` times.
    pub fn between(&self, minimum: u32, maximum: u32) -> Result<Self> {
        self.quantify(minimum, Some(maximum))
    }

    /// Repeat the last fragment one or more times (`+`).
    pub fn at_least_one(&self) -> Result<Self> {
        self.quantify(1, None)
    }

    /// Repeat the last fragment zero or more times (`*`).
    pub fn any_number_of(&self) -> Result<Self> {
        self.quantify(0, None)
    }

    /// Make the last fragment optional (`?`).
    pub fn optional(&self) -> Result<Self> {
        self.quantify(0, Some(1))
    }

    // Grouping

    /// Wrap the last fragment in a group.
    ///
    /// # Errors
    ///
    /// Returns [`RegularizeError::EmptyPatternGroup`] on an empty pattern,
    /// [`RegularizeError::InvalidGroupName`] for a name the engine rejects
    /// and [`RegularizeError::DuplicateGroupName`] for a name already used.
    pub fn group(&self, spec: GroupSpec) -> Result<Self> {
        let added: Vec<Arc<str>> = spec.name().map(Arc::from).into_iter().collect();
        let mut next = self.map_last(RegularizeError::EmptyPatternGroup, |last| {
            Fragment::group(last, spec)
        })?;
        next.names = merge_names(self.names.clone(), added)?;
        Ok(next)
    }

    /// Wrap the last fragment in a named capture group.
    pub fn named_group(&self, name: &str) -> Result<Self> {
        self.group(GroupSpec::named(name))
    }

    /// Append `sub` wrapped in a group.
    ///
    /// The sub-pattern's flags are merged into the result.
    ///
    /// # Errors
    ///
    /// As for [`group`](Self::group), plus
    /// [`RegularizeError::IncompatibleFlags`] if the flag sets conflict.
    pub fn group_pattern(&self, sub: &Self, spec: GroupSpec) -> Result<Self> {
        let flags = self.flags.merge(sub.flags)?;
        let own: Vec<Arc<str>> = spec.name().map(Arc::from).into_iter().collect();
        let grouped = Fragment::group(Fragment::from_sequence(sub.fragments.clone()), spec)?;
        let names = merge_names(merge_names(self.names.clone(), own)?, sub.names.iter().cloned())?;

        let mut next = self.push(grouped);
        next.flags = flags;
        next.names = names;
        Ok(next)
    }

    // Alternation

    /// Append a choice between `alternatives`.
    ///
    /// Text alternatives are taken literally. With no alternatives the
    /// pattern is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`RegularizeError::IncompatibleFlags`] or
    /// [`RegularizeError::DuplicateGroupName`] if the alternatives conflict
    /// with each other or with this pattern.
    pub fn match_any<I>(&self, alternatives: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Self>,
    {
        let mut flags = self.flags;
        let mut names = self.names.clone();
        let mut branches = Vec::new();
        for alternative in alternatives {
            let alternative: Self = alternative.into();
            flags = flags.merge(alternative.flags)?;
            names = merge_names(names, alternative.names.iter().cloned())?;
            branches.push(alternative.fragments);
        }
        if branches.is_empty() {
            return Ok(self.clone());
        }

        let mut next = self.push(Fragment::alternation(branches));
        next.flags = flags;
        next.names = names;
        Ok(next)
    }

    /// A pattern matching either `self` or `other`.
    ///
    /// Also available as `&a | &b`.
    ///
    /// # Errors
    ///
    /// As for [`match_any`](Self::match_any).
    pub fn or(&self, other: &Self) -> Result<Self> {
        let flags = self.flags.merge(other.flags)?;
        let names = merge_names(self.names.clone(), other.names.iter().cloned())?;
        let alternation =
            Fragment::alternation([self.fragments.clone(), other.fragments.clone()]);
        Ok(Self {
            fragments: Sequence::unit(alternation),
            flags,
            names,
            registry: Arc::clone(&self.registry),
        })
    }

    // Anchors

    fn anchor(&self, anchor: Anchor) -> Self {
        self.push(Fragment::Anchor(anchor))
    }

    /// Append `^`.
    #[must_use]
    pub fn start_anchor(&self) -> Self {
        self.anchor(Anchor::StartOfInput)
    }

    /// Append `$`.
    #[must_use]
    pub fn end_anchor(&self) -> Self {
        self.anchor(Anchor::EndOfInput)
    }

    /// Append `\A`.
    #[must_use]
    pub fn start_of_text(&self) -> Self {
        self.anchor(Anchor::StartOfText)
    }

    /// Append `\z`.
    #[must_use]
    pub fn end_of_text(&self) -> Self {
        self.anchor(Anchor::EndOfText)
    }

    /// Append `\b`.
    #[must_use]
    pub fn word_boundary(&self) -> Self {
        self.anchor(Anchor::WordBoundary)
    }

    /// Append `\B`.
    #[must_use]
    pub fn non_word_boundary(&self) -> Self {
        self.anchor(Anchor::NonWordBoundary)
    }

    // Flags

    fn set_flags(&self, flags: FlagSet) -> Self {
        let mut next = self.clone();
        next.flags = flags;
        next
    }

    /// Add `flags`.
    ///
    /// # Errors
    ///
    /// Returns [`RegularizeError::IncompatibleFlags`] if a flag's exclusive
    /// partner is already present.
    pub fn with_flags(&self, flags: FlagSet) -> Result<Self> {
        Ok(self.set_flags(self.flags.with(flags)?))
    }

    /// Remove `flags`.
    #[must_use]
    pub fn without_flags(&self, flags: FlagSet) -> Self {
        self.set_flags(self.flags.without(flags))
    }

    /// Match letters regardless of case.
    #[must_use]
    pub fn case_insensitive(&self) -> Self {
        self.set_flags(self.flags | FlagSet::CASE_INSENSITIVE)
    }

    /// Let `^` and `$` match at line boundaries.
    #[must_use]
    pub fn multiline(&self) -> Self {
        self.set_flags(self.flags | FlagSet::MULTILINE)
    }

    /// Let `.` match `\n`.
    #[must_use]
    pub fn dot_matches_newline(&self) -> Self {
        self.set_flags(self.flags | FlagSet::DOT_MATCHES_NEWLINE)
    }

    /// Ignore whitespace and `#` comments in the pattern text.
    #[must_use]
    pub fn ignore_whitespace(&self) -> Self {
        self.set_flags(self.flags | FlagSet::IGNORE_WHITESPACE)
    }

    /// Make quantifiers lazy by default.
    #[must_use]
    pub fn swap_greed(&self) -> Self {
        self.set_flags(self.flags | FlagSet::SWAP_GREED)
    }

    /// Treat `\r\n` as a line terminator.
    #[must_use]
    pub fn crlf(&self) -> Self {
        self.set_flags(self.flags | FlagSet::CRLF)
    }

    /// Restrict classes and case folding to ASCII.
    ///
    /// # Errors
    ///
    /// Returns [`RegularizeError::IncompatibleFlags`] if unicode mode is set.
    pub fn ascii_only(&self) -> Result<Self> {
        self.with_flags(FlagSet::ASCII_ONLY)
    }

    /// Make classes and case folding Unicode aware.
    ///
    /// # Errors
    ///
    /// Returns [`RegularizeError::IncompatibleFlags`] if ascii-only mode is set.
    pub fn unicode(&self) -> Result<Self> {
        self.with_flags(FlagSet::UNICODE)
    }

    // Composition

    /// Concatenate `self` and `other`.
    ///
    /// The result holds a single join of both full sequences, so a later
    /// quantifier applies to the whole concatenation. Flags are merged by
    /// union; the registry of `self` is kept.
    ///
    /// # Errors
    ///
    /// Returns [`RegularizeError::IncompatibleFlags`] or
    /// [`RegularizeError::DuplicateGroupName`] on conflict.
    pub fn concat(&self, other: &Self) -> Result<Self> {
        let flags = self.flags.merge(other.flags)?;
        let names = merge_names(self.names.clone(), other.names.iter().cloned())?;
        Ok(Self {
            fragments: Sequence::unit(Fragment::join(
                self.fragments.clone(),
                other.fragments.clone(),
            )),
            flags,
            names,
            registry: Arc::clone(&self.registry),
        })
    }

    /// Concatenate `patterns` with `separator` between each pair.
    ///
    /// ```rust
    /// use regularize::Pattern;
    ///
    /// let sep = Pattern::new().whitespace();
    /// let words = [Pattern::from("GET"), Pattern::from("/"), Pattern::from("HTTP")];
    /// let line = Pattern::join(&sep, &words).unwrap();
    /// assert_eq!(line.canonical_string(), r"GET\s/\sHTTP");
    /// ```
    ///
    /// # Errors
    ///
    /// As for [`concat`](Self::concat).
    pub fn join<'a, I>(separator: &Self, patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a Self>,
    {
        let mut patterns = patterns.into_iter();
        let Some(first) = patterns.next() else {
            return Ok(Self::with_registry(Arc::clone(&separator.registry)));
        };
        patterns.try_fold(first.clone(), |acc, next| acc.concat(separator)?.concat(next))
    }

    // Extensions

    /// Invoke the extension registered under `name`.
    ///
    /// The result is bound to this pattern's registry.
    ///
    /// # Errors
    ///
    /// Returns [`RegularizeError::UnknownExtension`] if nothing is registered
    /// under `name`, or whatever error the extension itself returns.
    pub fn ext(&self, name: &str, args: &[ExtArg]) -> Result<Self> {
        let mut result = self.registry.invoke(name, self, args)?;
        result.registry = Arc::clone(&self.registry);
        Ok(result)
    }

    // Output

    /// The canonical pattern string.
    #[must_use]
    pub fn canonical_string(&self) -> String {
        let mut out = String::new();
        render_sequence(&self.fragments, self.flags, &mut out);
        out
    }

    /// Render to the canonical string and flags.
    ///
    /// Pure; never touches the engine.
    #[must_use]
    pub fn compile(&self) -> CanonicalPattern {
        CanonicalPattern::new(self.canonical_string(), self.flags)
    }

    /// Compile through the global cache.
    ///
    /// # Errors
    ///
    /// Returns [`RegularizeError::PatternCompilation`] if the engine rejects
    /// the pattern.
    pub fn to_regex(&self) -> Result<Arc<CompiledPattern>> {
        global_cache().get_or_compile_canonical(&self.compile())
    }

    /// Match `sample` at its start, failing if it does not match.
    ///
    /// ```rust
    /// use regularize::Pattern;
    ///
    /// let version = Pattern::new().literal("v").digits().at_least_one().unwrap();
    /// assert_eq!(version.test("v12 beta").unwrap().as_str(), "v12");
    /// assert!(version.test("beta v12").is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`RegularizeError::SampleNotMatched`] when there is no match
    /// and [`RegularizeError::PatternCompilation`] if the pattern is invalid.
    pub fn test<'h>(&self, sample: &'h str) -> Result<Match<'h>> {
        let compiled = self.to_regex()?;
        compiled
            .match_at_start(sample)
            .ok_or_else(|| RegularizeError::sample_not_matched(compiled.pattern(), sample))
    }

    /// Capture group names, in rendering order.
    #[must_use]
    pub fn group_names<'a>(&'a self) -> Vec<&'a str> {
        let mut names = Vec::new();
        let mut collect = |name: &'a str| names.push(name);
        for fragment in &self.fragments {
            fragment.for_each_group_name(&mut collect);
        }
        names
    }

    /// Check whether a capture group name is used.
    #[must_use]
    pub fn has_group(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Number of capturing groups, or `None` if raw text makes it unknowable.
    #[must_use]
    pub fn capture_count(&self) -> Option<usize> {
        crate::fragment::sequence_capture_count(self.fragments.iter())
    }
}

fn merge_names(
    mut names: GroupNames,
    added: impl IntoIterator<Item = Arc<str>>,
) -> Result<GroupNames> {
    for name in added {
        if names.contains(&name) {
            return Err(RegularizeError::duplicate_group_name(&*name));
        }
        names.insert(name);
    }
    Ok(names)
}

impl Default for Pattern {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for Pattern {
    fn from(text: &str) -> Self {
        Self::new().literal(text)
    }
}

impl From<String> for Pattern {
    fn from(text: String) -> Self {
        Self::new().literal(text)
    }
}

impl From<&Pattern> for Pattern {
    fn from(pattern: &Pattern) -> Self {
        pattern.clone()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.flags == other.flags
            && (self.fragments == other.fragments
                || self.canonical_string() == other.canonical_string())
    }
}

impl Eq for Pattern {}

impl Hash for Pattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.compile().hash(state);
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.canonical_string(), self.flags)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("pattern", &self.canonical_string())
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

impl Add for &Pattern {
    type Output = Result<Pattern>;

    fn add(self, rhs: Self) -> Self::Output {
        self.concat(rhs)
    }
}

impl Add for Pattern {
    type Output = Result<Self>;

    fn add(self, rhs: Self) -> Self::Output {
        self.concat(&rhs)
    }
}

impl BitOr for &Pattern {
    type Output = Result<Pattern>;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.or(rhs)
    }
}

impl BitOr for Pattern {
    type Output = Result<Self>;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.or(&rhs)
    }
}
