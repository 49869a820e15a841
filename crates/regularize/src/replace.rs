//! Substitution.
//!
//! A [`Template`] describes replacement text with references to capture
//! groups. It can be parsed from the usual `$name`, `${name}`, `$1`, `$$`
//! syntax or assembled piece by piece:
//!
//! ```rust
//! use regularize::{Pattern, Substitution, Template};
//!
//! let date = Pattern::new()
//!     .digits().exactly(4).unwrap().named_group("year").unwrap()
//!     .literal("-")
//!     .digits().exactly(2).unwrap().named_group("month").unwrap();
//!
//! let template = Template::new().group("month").text("/").group("year");
//! let out = Substitution::new(date).replace("due 2024-05", &template).unwrap();
//! assert_eq!(out, "due 05/2024");
//! ```
//!
//! References are checked before anything is compiled whenever the pattern
//! tree is fully known, i.e. holds no raw text.

use std::fmt;
use std::sync::Arc;

use crate::cache::PatternCache;
use crate::engine::{CompiledPattern, Match};
use crate::error::{RegularizeError, Result};
use crate::find::Finder;
use crate::pattern::Pattern;

/// A reference to a capture group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupRef {
    /// A positional group; 0 is the whole match.
    Index(usize),
    /// A named group.
    Name(String),
}

impl GroupRef {
    fn parse(text: &str) -> Self {
        text.parse().map_or_else(|_| Self::Name(text.to_string()), Self::Index)
    }
}

impl fmt::Display for GroupRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Text(String),
    Group(GroupRef),
}

/// Replacement text with capture group references.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    parts: Vec<Part>,
}

impl Template {
    /// An empty template.
    #[must_use]
    pub const fn new() -> Self {
        Self { parts: Vec::new() }
    }

    /// Parse `$name`, `${name}`, `$1` and `$$` references.
    ///
    /// A `$` that does not start a valid reference is kept literally.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut template = Self::new();
        let mut rest = text;
        while let Some(at) = rest.find('$') {
            template = template.text(&rest[..at]);
            rest = &rest[at + 1..];

            if let Some(after) = rest.strip_prefix('$') {
                template = template.text("$");
                rest = after;
            } else if let Some(inner) = rest.strip_prefix('{')
                && let Some(close) = inner.find('}')
                && close > 0
            {
                template.push_group(GroupRef::parse(&inner[..close]));
                rest = &inner[close + 1..];
            } else {
                let len = rest
                    .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                    .unwrap_or(rest.len());
                if len == 0 {
                    template = template.text("$");
                } else {
                    template.push_group(GroupRef::parse(&rest[..len]));
                    rest = &rest[len..];
                }
            }
        }
        template.text(rest)
    }

    /// Append literal text.
    #[must_use]
    pub fn text(mut self, text: &str) -> Self {
        if text.is_empty() {
            return self;
        }
        if let Some(Part::Text(last)) = self.parts.last_mut() {
            last.push_str(text);
        } else {
            self.parts.push(Part::Text(text.to_string()));
        }
        self
    }

    /// Append a reference to a named group.
    #[must_use]
    pub fn group(mut self, name: &str) -> Self {
        self.push_group(GroupRef::Name(name.to_string()));
        self
    }

    /// Append a reference to a positional group.
    #[must_use]
    pub fn index(mut self, index: usize) -> Self {
        self.push_group(GroupRef::Index(index));
        self
    }

    fn push_group(&mut self, group: GroupRef) {
        self.parts.push(Part::Group(group));
    }

    /// The group references, in order.
    pub fn references(&self) -> impl Iterator<Item = &GroupRef> {
        self.parts.iter().filter_map(|part| match part {
            Part::Group(group) => Some(group),
            Part::Text(_) => None,
        })
    }

    /// Expand the template against one match.
    #[must_use]
    pub fn expand(&self, m: &Match<'_>) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                Part::Text(text) => out.push_str(text),
                Part::Group(GroupRef::Index(i)) => out.push_str(m.get(*i).unwrap_or_default()),
                Part::Group(GroupRef::Name(name)) => out.push_str(m.name(name).unwrap_or_default()),
            }
        }
        out
    }

    /// Render in the engine's replacement syntax.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                Part::Text(text) => out.push_str(&text.replace('$', "$$")),
                Part::Group(group) => {
                    out.push_str("${");
                    out.push_str(&group.to_string());
                    out.push('}');
                }
            }
        }
        out
    }
}

impl From<&str> for Template {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Replace matches of a pattern.
#[derive(Debug)]
pub struct Substitution {
    finder: Finder,
}

impl Substitution {
    /// Create a substitution that compiles through the global cache.
    #[must_use]
    pub fn new(pattern: Pattern) -> Self {
        Self {
            finder: Finder::new(pattern),
        }
    }

    /// Create a substitution that compiles through `cache`.
    #[must_use]
    pub const fn with_cache(pattern: Pattern, cache: Arc<PatternCache>) -> Self {
        Self {
            finder: Finder::with_cache(pattern, cache),
        }
    }

    /// The pattern being replaced.
    #[must_use]
    pub const fn pattern(&self) -> &Pattern {
        self.finder.pattern()
    }

    /// Replace every match of the pattern in `input`.
    ///
    /// # Errors
    ///
    /// Returns [`RegularizeError::UnknownGroupReference`] if the template
    /// names a group the pattern lacks, or a compilation error.
    pub fn replace(&self, input: &str, template: &Template) -> Result<String> {
        self.replace_n(input, template, 0)
    }

    /// Replace the first `limit` matches, or every match if `limit` is 0.
    ///
    /// # Errors
    ///
    /// As for [`replace`](Self::replace).
    pub fn replace_n(&self, input: &str, template: &Template, limit: usize) -> Result<String> {
        let compiled = match self.check_statically(template) {
            Some(checked) => {
                checked?;
                self.finder.compiled()?
            }
            None => {
                let compiled = self.finder.compiled()?;
                check_compiled(template, compiled)?;
                compiled
            }
        };
        Ok(compiled.substitute(input, limit, &template.render()))
    }

    /// Replace every match with the closure's output.
    pub fn replace_with<F>(&self, input: &str, f: F) -> Result<String>
    where
        F: FnMut(&Match<'_>) -> String,
    {
        Ok(self.finder.compiled()?.substitute_with(input, 0, f))
    }

    /// Check references against the fragment tree, if it is fully known.
    fn check_statically(&self, template: &Template) -> Option<Result<()>> {
        let pattern = self.finder.pattern();
        let captures = pattern.capture_count()?;
        Some(
            template
                .references()
                .find(|group| match group {
                    GroupRef::Index(i) => *i > captures,
                    GroupRef::Name(name) => !pattern.has_group(name),
                })
                .map_or(Ok(()), |group| {
                    Err(RegularizeError::unknown_group_reference(group.to_string()))
                }),
        )
    }
}

fn check_compiled(template: &Template, compiled: &CompiledPattern) -> Result<()> {
    for group in template.references() {
        let known = match group {
            GroupRef::Index(i) => *i < compiled.captures_len(),
            GroupRef::Name(name) => compiled.has_group(name),
        };
        if !known {
            return Err(RegularizeError::unknown_group_reference(group.to_string()));
        }
    }
    Ok(())
}
