//! Fragment model.
//!
//! A [`Fragment`] is one immutable node of a pattern: a literal, a character
//! set, a quantified or grouped sub-fragment, an anchor, or the concatenation
//! of two sequences. Child nodes are reference counted, so wrapping a fragment
//! never copies the subtree underneath it.
//!
//! Rendering is a recursive, order-preserving traversal that produces the
//! canonical pattern string. The same tree and flags always render to the
//! same string. Only [`FlagSet::ASCII_ONLY`] affects the output: shorthand
//! classes and word boundaries are then written in their ASCII forms.

use std::fmt::{self, Write};
use std::sync::Arc;

use im::Vector;

use crate::error::{RegularizeError, Result};
use crate::flags::FlagSet;

/// An ordered, structurally shared sequence of fragments.
pub type Sequence = Vector<Fragment>;

/// Position assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// Start of input, or of a line in multiline mode (`^`).
    StartOfInput,
    /// End of input, or of a line in multiline mode (`$`).
    EndOfInput,
    /// Start of input regardless of mode (`\A`).
    StartOfText,
    /// End of input regardless of mode (`\z`).
    EndOfText,
    /// Word boundary (`\b`).
    WordBoundary,
    /// Not a word boundary (`\B`).
    NonWordBoundary,
}

impl Anchor {
    /// The pattern token for this anchor.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::StartOfInput => "^",
            Self::EndOfInput => "$",
            Self::StartOfText => r"\A",
            Self::EndOfText => r"\z",
            Self::WordBoundary => r"\b",
            Self::NonWordBoundary => r"\B",
        }
    }

    /// The token under [`FlagSet::ASCII_ONLY`].
    #[must_use]
    pub const fn ascii_token(self) -> &'static str {
        match self {
            Self::WordBoundary => r"(?-u:\b)",
            Self::NonWordBoundary => r"(?-u:\B)",
            other => other.token(),
        }
    }
}

/// One member of a character set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassMember {
    /// A single character.
    Char(char),
    /// An inclusive character range.
    Range(char, char),
    /// ASCII digits (`0-9`).
    Digit,
    /// Lowercase ASCII letters (`a-z`).
    AsciiLowercase,
    /// Uppercase ASCII letters (`A-Z`).
    AsciiUppercase,
    /// ASCII letters of either case (`a-zA-Z`).
    AsciiLetter,
    /// Word characters (`\w`).
    Word,
    /// Anything but word characters (`\W`).
    NonWord,
    /// Whitespace (`\s`).
    Whitespace,
    /// Anything but whitespace (`\S`).
    NonWhitespace,
}

impl ClassMember {
    /// Create a range member, rejecting reversed bounds.
    pub fn range(start: char, end: char) -> Result<Self> {
        if start > end {
            return Err(RegularizeError::invalid_range(start as u32, end as u32));
        }
        Ok(Self::Range(start, end))
    }

    /// One `Char` member per character of `text`.
    pub fn chars(text: &str) -> impl Iterator<Item = Self> + '_ {
        text.chars().map(Self::Char)
    }

    /// Shorthand escape for members that have one.
    const fn shorthand(self) -> Option<&'static str> {
        match self {
            Self::Word => Some(r"\w"),
            Self::NonWord => Some(r"\W"),
            Self::Whitespace => Some(r"\s"),
            Self::NonWhitespace => Some(r"\S"),
            _ => None,
        }
    }

    /// ASCII class for shorthand members, usable inside brackets.
    const fn ascii_class(self) -> Option<&'static str> {
        match self {
            Self::Word => Some("[:word:]"),
            Self::NonWord => Some("[:^word:]"),
            Self::Whitespace => Some("[:space:]"),
            Self::NonWhitespace => Some("[:^space:]"),
            _ => None,
        }
    }

    /// Shorthand for the complement of this member, if it has one.
    const fn negated_shorthand(self) -> Option<&'static str> {
        match self {
            Self::Word => Some(r"\W"),
            Self::NonWord => Some(r"\w"),
            Self::Whitespace => Some(r"\S"),
            Self::NonWhitespace => Some(r"\s"),
            _ => None,
        }
    }

    fn render(self, ascii: bool, out: &mut String) {
        match self {
            Self::Char(c) => push_class_char(c, out),
            Self::Range(start, end) => {
                push_class_char(start, out);
                out.push('-');
                push_class_char(end, out);
            }
            Self::Digit => out.push_str("0-9"),
            Self::AsciiLowercase => out.push_str("a-z"),
            Self::AsciiUppercase => out.push_str("A-Z"),
            Self::AsciiLetter => out.push_str("a-zA-Z"),
            other => {
                let class = if ascii {
                    other.ascii_class()
                } else {
                    other.shorthand()
                };
                if let Some(class) = class {
                    out.push_str(class);
                }
            }
        }
    }
}

impl From<char> for ClassMember {
    fn from(c: char) -> Self {
        Self::Char(c)
    }
}

fn push_class_char(c: char, out: &mut String) {
    if c.is_whitespace() {
        push_whitespace(c, out);
    } else {
        let mut buf = [0u8; 4];
        out.push_str(&regex::escape(c.encode_utf8(&mut buf)));
    }
}

/// Escape `text` so it matches itself under every flag.
///
/// `regex::escape` leaves whitespace alone, which verbose mode would drop.
fn push_literal(text: &str, out: &mut String) {
    let mut rest = text;
    while let Some(at) = rest.find(char::is_whitespace) {
        out.push_str(&regex::escape(&rest[..at]));
        let mut tail = rest[at..].chars();
        if let Some(c) = tail.next() {
            push_whitespace(c, out);
        }
        rest = tail.as_str();
    }
    out.push_str(&regex::escape(rest));
}

fn push_whitespace(c: char, out: &mut String) {
    match c {
        '\t' => out.push_str(r"\t"),
        '\n' => out.push_str(r"\n"),
        '\r' => out.push_str(r"\r"),
        other => {
            let _ = write!(out, r"\x{{{:X}}}", u32::from(other));
        }
    }
}

/// Options for a group fragment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupSpec {
    name: Option<Arc<str>>,
    capturing: bool,
    optional: bool,
}

impl Default for GroupSpec {
    fn default() -> Self {
        Self::capturing()
    }
}

impl GroupSpec {
    /// An unnamed capturing group.
    #[must_use]
    pub const fn capturing() -> Self {
        Self {
            name: None,
            capturing: true,
            optional: false,
        }
    }

    /// A non-capturing group.
    #[must_use]
    pub const fn non_capturing() -> Self {
        Self {
            name: None,
            capturing: false,
            optional: false,
        }
    }

    /// A named capturing group.
    ///
    /// Names may contain `.`, `[` and `]`. A [`Template`](crate::Template)
    /// can only refer to such a name in braced form, `${name}`; the bare
    /// `$name` form stops at the first character that is not alphanumeric or
    /// `_`.
    #[must_use]
    pub fn named(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: Some(name.into()),
            capturing: true,
            optional: false,
        }
    }

    /// Make the group match zero or one time.
    #[must_use]
    pub const fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// The group name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether the group captures.
    #[must_use]
    pub const fn is_capturing(&self) -> bool {
        self.capturing
    }

    /// Whether the group is optional.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.optional
    }

    /// Check the name against what the engine accepts.
    pub(crate) fn validate(&self) -> Result<()> {
        let Some(name) = self.name.as_deref() else {
            return Ok(());
        };
        let mut chars = name.chars();
        match chars.next() {
            None => Err(RegularizeError::invalid_group_name(name, "name is empty")),
            Some(first) if !(first.is_alphabetic() || first == '_') => Err(
                RegularizeError::invalid_group_name(name, "name must start with a letter or underscore"),
            ),
            Some(_) => {
                if chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '[' | ']')) {
                    Ok(())
                } else {
                    Err(RegularizeError::invalid_group_name(
                        name,
                        "name may only contain letters, digits, '_', '.', '[' and ']'",
                    ))
                }
            }
        }
    }
}

/// One immutable node of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Fixed text; metacharacters are escaped when rendered.
    Literal(Arc<str>),

    /// A set of characters, ranges and named classes.
    CharacterSet {
        /// Set members, in insertion order.
        members: Arc<[ClassMember]>,
        /// Match anything *not* in the set.
        negated: bool,
    },

    /// A repeated fragment.
    Quantifier {
        /// The repeated fragment.
        inner: Arc<Fragment>,
        /// Minimum repetitions.
        minimum: u32,
        /// Maximum repetitions, `None` for unbounded.
        maximum: Option<u32>,
    },

    /// A group around a fragment.
    Group {
        /// The grouped fragment.
        inner: Arc<Fragment>,
        /// Group options.
        spec: GroupSpec,
    },

    /// A position assertion.
    Anchor(Anchor),

    /// Concatenation of two sequences.
    Join(Sequence, Sequence),

    /// One of several alternative sequences.
    Alternation(Arc<[Sequence]>),

    /// Any single character (`.`).
    Wildcard,

    /// Pattern text inserted verbatim.
    Raw(Arc<str>),
}

impl Fragment {
    /// Create a literal fragment.
    pub fn literal(text: impl Into<Arc<str>>) -> Self {
        Self::Literal(text.into())
    }

    /// Create a raw fragment.
    pub fn raw(text: impl Into<Arc<str>>) -> Self {
        Self::Raw(text.into())
    }

    /// Create a character set.
    pub fn character_set<I, M>(members: I, negated: bool) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<ClassMember>,
    {
        Self::CharacterSet {
            members: members.into_iter().map(Into::into).collect(),
            negated,
        }
    }

    /// Wrap `inner` in a quantifier.
    ///
    /// # Errors
    ///
    /// Returns [`RegularizeError::InvalidRange`] if a bounded maximum is
    /// below the minimum.
    pub fn quantifier(inner: Self, minimum: u32, maximum: Option<u32>) -> Result<Self> {
        if let Some(maximum) = maximum
            && maximum < minimum
        {
            return Err(RegularizeError::invalid_range(minimum, maximum));
        }
        Ok(Self::Quantifier {
            inner: Arc::new(inner),
            minimum,
            maximum,
        })
    }

    /// Wrap `inner` in a group.
    pub fn group(inner: Self, spec: GroupSpec) -> Result<Self> {
        spec.validate()?;
        Ok(Self::Group {
            inner: Arc::new(inner),
            spec,
        })
    }

    /// Concatenate two sequences.
    #[must_use]
    pub const fn join(left: Sequence, right: Sequence) -> Self {
        Self::Join(left, right)
    }

    /// Alternate between several sequences.
    pub fn alternation(branches: impl IntoIterator<Item = Sequence>) -> Self {
        Self::Alternation(branches.into_iter().collect())
    }

    /// Collapse a sequence into a single fragment.
    #[must_use]
    pub fn from_sequence(sequence: Sequence) -> Self {
        if sequence.len() == 1
            && let Some(only) = sequence.front()
        {
            return only.clone();
        }
        Self::Join(sequence, Sequence::new())
    }

    /// Whether a quantifier can be applied directly, without a wrapping group.
    #[must_use]
    pub fn is_atom(&self) -> bool {
        match self {
            Self::Literal(text) => text.chars().count() == 1,
            // An optional group already ends in `?`.
            Self::Group { spec, .. } => !spec.optional,
            Self::CharacterSet { .. } | Self::Alternation(_) | Self::Wildcard => true,
            Self::Join(left, right) => match (left.len(), right.len()) {
                (1, 0) => left.front().is_some_and(Self::is_atom),
                (0, 1) => right.front().is_some_and(Self::is_atom),
                _ => false,
            },
            Self::Quantifier { .. } | Self::Anchor(_) | Self::Raw(_) => false,
        }
    }

    /// Render this fragment onto `out` for a pattern carrying `flags`.
    pub fn render(&self, flags: FlagSet, out: &mut String) {
        match self {
            Self::Literal(text) => push_literal(text, out),
            Self::CharacterSet { members, negated } => render_set(members, *negated, flags, out),
            Self::Quantifier {
                inner,
                minimum,
                maximum,
            } => {
                if inner.is_atom() {
                    inner.render(flags, out);
                } else {
                    out.push_str("(?:");
                    inner.render(flags, out);
                    out.push(')');
                }
                push_quantifier(*minimum, *maximum, out);
            }
            Self::Group { inner, spec } => {
                match (spec.capturing, spec.name.as_deref()) {
                    (true, Some(name)) => {
                        out.push_str("(?P<");
                        out.push_str(name);
                        out.push('>');
                    }
                    (true, None) => out.push('('),
                    (false, _) => out.push_str("(?:"),
                }
                if let Self::Alternation(branches) = inner.as_ref() {
                    render_branches(branches, flags, out);
                } else {
                    inner.render(flags, out);
                }
                out.push(')');
                if spec.optional {
                    out.push('?');
                }
            }
            Self::Anchor(anchor) => {
                if flags.contains(FlagSet::ASCII_ONLY) {
                    out.push_str(anchor.ascii_token());
                } else {
                    out.push_str(anchor.token());
                }
            }
            Self::Join(left, right) => {
                render_sequence(left, flags, out);
                render_sequence(right, flags, out);
            }
            Self::Alternation(branches) => {
                out.push_str("(?:");
                render_branches(branches, flags, out);
                out.push(')');
            }
            Self::Wildcard => out.push('.'),
            Self::Raw(text) => out.push_str(text),
        }
    }

    /// Visit every capture group name in this subtree, in rendering order.
    pub fn for_each_group_name<'a>(&'a self, f: &mut dyn FnMut(&'a str)) {
        match self {
            Self::Group { inner, spec } => {
                if spec.capturing
                    && let Some(name) = spec.name.as_deref()
                {
                    f(name);
                }
                inner.for_each_group_name(f);
            }
            Self::Quantifier { inner, .. } => inner.for_each_group_name(f),
            Self::Join(left, right) => {
                for fragment in left.iter().chain(right.iter()) {
                    fragment.for_each_group_name(f);
                }
            }
            Self::Alternation(branches) => {
                for fragment in branches.iter().flat_map(|branch| branch.iter()) {
                    fragment.for_each_group_name(f);
                }
            }
            _ => {}
        }
    }

    /// Number of capturing groups, or `None` if raw text makes it unknowable.
    #[must_use]
    pub fn capture_count(&self) -> Option<usize> {
        match self {
            Self::Group { inner, spec } => {
                inner.capture_count().map(|n| n + usize::from(spec.capturing))
            }
            Self::Quantifier { inner, .. } => inner.capture_count(),
            Self::Join(left, right) => sequence_capture_count(left.iter().chain(right.iter())),
            Self::Alternation(branches) => {
                sequence_capture_count(branches.iter().flat_map(|branch| branch.iter()))
            }
            Self::Raw(_) => None,
            _ => Some(0),
        }
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.render(FlagSet::empty(), &mut out);
        f.write_str(&out)
    }
}

/// Render a whole sequence, left to right.
pub fn render_sequence(sequence: &Sequence, flags: FlagSet, out: &mut String) {
    for fragment in sequence {
        fragment.render(flags, out);
    }
}

/// Sum capture counts over fragments; `None` if any is unknowable.
pub fn sequence_capture_count<'a>(fragments: impl Iterator<Item = &'a Fragment>) -> Option<usize> {
    fragments.map(Fragment::capture_count).sum()
}

fn render_branches(branches: &[Sequence], flags: FlagSet, out: &mut String) {
    for (i, branch) in branches.iter().enumerate() {
        if i > 0 {
            out.push('|');
        }
        render_sequence(branch, flags, out);
    }
}

fn render_set(members: &[ClassMember], negated: bool, flags: FlagSet, out: &mut String) {
    let ascii = flags.contains(FlagSet::ASCII_ONLY);
    if !ascii
        && let [only] = members
    {
        let bare = if negated {
            only.negated_shorthand()
        } else {
            only.shorthand()
        };
        if let Some(bare) = bare {
            out.push_str(bare);
            return;
        }
    }
    out.push('[');
    if negated {
        out.push('^');
    }
    for member in members {
        member.render(ascii, out);
    }
    out.push(']');
}

fn push_quantifier(minimum: u32, maximum: Option<u32>, out: &mut String) {
    match (minimum, maximum) {
        (0, None) => out.push('*'),
        (1, None) => out.push('+'),
        (0, Some(1)) => out.push('?'),
        (n, None) => {
            let _ = write!(out, "{{{n},}}");
        }
        (n, Some(m)) if n == m => {
            let _ = write!(out, "{{{n}}}");
        }
        (n, Some(m)) => {
            let _ = write!(out, "{{{n},{m}}}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(fragment: &Fragment) -> String {
        fragment.to_string()
    }

    fn digits() -> Fragment {
        Fragment::character_set([ClassMember::Digit], false)
    }

    #[test]
    fn literal_escapes_metacharacters() {
        assert_eq!(render(&Fragment::literal("a.b*c")), r"a\.b\*c");
    }

    #[test]
    fn character_sets() {
        assert_eq!(render(&digits()), "[0-9]");
        let set = Fragment::character_set(
            [ClassMember::AsciiLowercase, ClassMember::Char('_'), ClassMember::Char('-')],
            false,
        );
        assert_eq!(render(&set), r"[a-z_\-]");
        let negated = Fragment::character_set([ClassMember::Char(']')], true);
        assert_eq!(render(&negated), r"[^\]]");
    }

    #[test]
    fn single_shorthand_renders_bare() {
        let ws = Fragment::character_set([ClassMember::Whitespace], false);
        assert_eq!(render(&ws), r"\s");
        let not_ws = Fragment::character_set([ClassMember::Whitespace], true);
        assert_eq!(render(&not_ws), r"\S");
        let mixed = Fragment::character_set([ClassMember::Whitespace, ClassMember::Digit], false);
        assert_eq!(render(&mixed), r"[\s0-9]");
    }

    #[test]
    fn quantifier_shorthands() {
        let q = |min, max| render(&Fragment::quantifier(digits(), min, max).unwrap());
        assert_eq!(q(0, None), "[0-9]*");
        assert_eq!(q(1, None), "[0-9]+");
        assert_eq!(q(0, Some(1)), "[0-9]?");
        assert_eq!(q(2, Some(2)), "[0-9]{2}");
        assert_eq!(q(3, None), "[0-9]{3,}");
        assert_eq!(q(1, Some(61)), "[0-9]{1,61}");
    }

    #[test]
    fn quantifier_rejects_reversed_bounds() {
        let err = Fragment::quantifier(digits(), 3, Some(1)).unwrap_err();
        assert!(matches!(
            err,
            RegularizeError::InvalidRange {
                minimum: 3,
                maximum: 1
            }
        ));
    }

    #[test]
    fn quantifier_wraps_non_atoms() {
        let word = Fragment::quantifier(Fragment::literal("ab"), 1, None).unwrap();
        assert_eq!(render(&word), "(?:ab)+");
        let single = Fragment::quantifier(Fragment::literal("."), 0, Some(1)).unwrap();
        assert_eq!(render(&single), r"\.?");
        let nested = Fragment::quantifier(word, 2, Some(2)).unwrap();
        assert_eq!(render(&nested), "(?:(?:ab)+){2}");
    }

    #[test]
    fn groups() {
        let named = Fragment::group(digits(), GroupSpec::named("year")).unwrap();
        assert_eq!(render(&named), "(?P<year>[0-9])");
        let plain = Fragment::group(digits(), GroupSpec::capturing()).unwrap();
        assert_eq!(render(&plain), "([0-9])");
        let optional = Fragment::group(digits(), GroupSpec::non_capturing().optional()).unwrap();
        assert_eq!(render(&optional), "(?:[0-9])?");
    }

    #[test]
    fn quantified_optional_group_is_wrapped() {
        let optional = Fragment::group(digits(), GroupSpec::capturing().optional()).unwrap();
        let q = |min, max| render(&Fragment::quantifier(optional.clone(), min, max).unwrap());
        assert_eq!(q(0, Some(1)), "(?:([0-9])?)?");
        assert_eq!(q(1, None), "(?:([0-9])?)+");
        assert_eq!(q(0, None), "(?:([0-9])?)*");
        assert_eq!(q(2, Some(3)), "(?:([0-9])?){2,3}");
        let required = Fragment::group(digits(), GroupSpec::capturing()).unwrap();
        assert_eq!(render(&Fragment::quantifier(required, 1, None).unwrap()), "([0-9])+");
    }

    #[test]
    fn whitespace_is_escaped() {
        assert_eq!(render(&Fragment::literal("a b#c")), r"a\x{20}b\#c");
        assert_eq!(render(&Fragment::literal("\t\n\r")), r"\t\n\r");
        assert_eq!(render(&Fragment::literal("a\u{a0}")), r"a\x{A0}");
        let set = Fragment::character_set(ClassMember::chars(" -"), true);
        assert_eq!(render(&set), r"[^\x{20}\-]");
    }

    #[test]
    fn ascii_only_rendering() {
        let render_ascii = |fragment: &Fragment| {
            let mut out = String::new();
            fragment.render(FlagSet::ASCII_ONLY, &mut out);
            out
        };
        let word = Fragment::character_set([ClassMember::Word], false);
        assert_eq!(render_ascii(&word), "[[:word:]]");
        let not_space = Fragment::character_set([ClassMember::Whitespace], true);
        assert_eq!(render_ascii(&not_space), "[^[:space:]]");
        let mixed = Fragment::character_set([ClassMember::NonWhitespace, ClassMember::Digit], false);
        assert_eq!(render_ascii(&mixed), "[[:^space:]0-9]");
        assert_eq!(render_ascii(&Fragment::Anchor(Anchor::WordBoundary)), r"(?-u:\b)");
        assert_eq!(render_ascii(&Fragment::Anchor(Anchor::StartOfText)), r"\A");
        assert_eq!(render_ascii(&Fragment::Wildcard), ".");
    }

    #[test]
    fn group_name_validation() {
        assert!(GroupSpec::named("ok_name1").validate().is_ok());
        assert!(GroupSpec::named("").validate().is_err());
        assert!(GroupSpec::named("1abc").validate().is_err());
        assert!(GroupSpec::named("has space").validate().is_err());
    }

    #[test]
    fn alternation_inside_group_is_not_double_wrapped() {
        let alt = Fragment::alternation([
            Sequence::unit(Fragment::literal("GET")),
            Sequence::unit(Fragment::literal("POST")),
        ]);
        assert_eq!(render(&alt), "(?:GET|POST)");
        let grouped = Fragment::group(alt, GroupSpec::named("verb")).unwrap();
        assert_eq!(render(&grouped), "(?P<verb>GET|POST)");
    }

    #[test]
    fn join_concatenates_in_order() {
        let join = Fragment::join(
            Sequence::unit(Fragment::literal("a")),
            Sequence::unit(Fragment::Anchor(Anchor::EndOfInput)),
        );
        assert_eq!(render(&join), "a$");
    }

    #[test]
    fn from_sequence_collapses_single() {
        let one = Fragment::from_sequence(Sequence::unit(Fragment::Wildcard));
        assert_eq!(one, Fragment::Wildcard);
        let many: Sequence = [Fragment::Wildcard, Fragment::Wildcard].into_iter().collect();
        assert!(matches!(Fragment::from_sequence(many), Fragment::Join(..)));
    }

    #[test]
    fn group_names_and_capture_count() {
        let inner = Fragment::group(digits(), GroupSpec::named("a")).unwrap();
        let outer = Fragment::group(inner, GroupSpec::named("b")).unwrap();
        let mut names = Vec::new();
        outer.for_each_group_name(&mut |n: &str| names.push(n.to_string()));
        assert_eq!(names, ["b", "a"]);
        assert_eq!(outer.capture_count(), Some(2));
        assert_eq!(Fragment::raw("(x)").capture_count(), None);
    }

    #[test]
    fn range_member() {
        assert_eq!(ClassMember::range('a', 'f').unwrap(), ClassMember::Range('a', 'f'));
        assert!(ClassMember::range('z', 'a').is_err());
    }
}
