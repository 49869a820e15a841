//! Extension registry.
//!
//! Extensions add named vocabulary to the builder. A capability receives the
//! pattern it was invoked on plus dynamically typed arguments, and returns a
//! new pattern. Resolution is a single explicit lookup by name through
//! [`Pattern::ext`](crate::Pattern::ext).
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use regularize::{ClassMember, ExtArg, ExtensionRegistry, Pattern};
//!
//! let registry = Arc::new(ExtensionRegistry::new());
//! registry.add("html_tag", |p: &Pattern, args: &[ExtArg]| {
//!     let opening = ExtArg::bool_at(args, 0, true)?;
//!     p.literal(if opening { "<" } else { "</" })
//!         .any_of([ClassMember::AsciiLowercase])
//!         .at_least_one()
//!         .map(|p| p.literal(">"))
//! });
//!
//! let tag = Pattern::with_registry(registry).ext("html_tag", &[]).unwrap();
//! assert_eq!(tag.canonical_string(), "<[a-z]+>");
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use tracing::debug;

use crate::error::{RegularizeError, Result};
use crate::pattern::Pattern;

/// A dynamically typed extension argument.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtArg {
    /// Text.
    Text(String),
    /// An integer.
    Int(i64),
    /// A boolean.
    Bool(bool),
    /// A sub-pattern.
    Pattern(Pattern),
}

impl ExtArg {
    fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Int(_) => "integer",
            Self::Bool(_) => "boolean",
            Self::Pattern(_) => "pattern",
        }
    }

    fn mismatch(&self, index: usize, wanted: &str) -> RegularizeError {
        RegularizeError::invalid_extension_argument(
            index,
            format!("expected {wanted}, got {}", self.kind()),
        )
    }

    fn required(args: &[Self], index: usize) -> Result<&Self> {
        args.get(index)
            .ok_or_else(|| RegularizeError::invalid_extension_argument(index, "missing argument"))
    }

    /// Text argument at `index`.
    pub fn text_at(args: &[Self], index: usize) -> Result<&str> {
        match Self::required(args, index)? {
            Self::Text(text) => Ok(text),
            other => Err(other.mismatch(index, "text")),
        }
    }

    /// Integer argument at `index`.
    pub fn int_at(args: &[Self], index: usize) -> Result<i64> {
        match Self::required(args, index)? {
            Self::Int(n) => Ok(*n),
            other => Err(other.mismatch(index, "integer")),
        }
    }

    /// Boolean argument at `index`, or `default` if absent.
    pub fn bool_at(args: &[Self], index: usize, default: bool) -> Result<bool> {
        match args.get(index) {
            None => Ok(default),
            Some(Self::Bool(b)) => Ok(*b),
            Some(other) => Err(other.mismatch(index, "boolean")),
        }
    }

    /// Pattern argument at `index`.
    pub fn pattern_at(args: &[Self], index: usize) -> Result<&Pattern> {
        match Self::required(args, index)? {
            Self::Pattern(p) => Ok(p),
            other => Err(other.mismatch(index, "pattern")),
        }
    }
}

impl From<&str> for ExtArg {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for ExtArg {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for ExtArg {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<u32> for ExtArg {
    fn from(n: u32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<bool> for ExtArg {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Pattern> for ExtArg {
    fn from(p: Pattern) -> Self {
        Self::Pattern(p)
    }
}

/// A named capability that extends the builder.
pub trait Extension: Send + Sync {
    /// Build a new pattern from `pattern` and `args`.
    fn apply(&self, pattern: &Pattern, args: &[ExtArg]) -> Result<Pattern>;
}

impl<F> Extension for F
where
    F: Fn(&Pattern, &[ExtArg]) -> Result<Pattern> + Send + Sync,
{
    fn apply(&self, pattern: &Pattern, args: &[ExtArg]) -> Result<Pattern> {
        self(pattern, args)
    }
}

/// Mapping from extension name to capability.
///
/// All mutation is serialized by one lock per registry.
#[derive(Default)]
pub struct ExtensionRegistry {
    extensions: RwLock<HashMap<String, Arc<dyn Extension>>>,
}

static GLOBAL_REGISTRY: LazyLock<Arc<ExtensionRegistry>> =
    LazyLock::new(|| Arc::new(ExtensionRegistry::new()));

impl ExtensionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared process-wide registry used by [`Pattern::new`].
    #[must_use]
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL_REGISTRY)
    }

    /// Register a closure, replacing any capability with the same name.
    pub fn add<F>(&self, name: impl Into<String>, capability: F)
    where
        F: Fn(&Pattern, &[ExtArg]) -> Result<Pattern> + Send + Sync + 'static,
    {
        self.add_extension(name, capability);
    }

    /// Register an [`Extension`], replacing any capability with the same name.
    pub fn add_extension(&self, name: impl Into<String>, extension: impl Extension + 'static) {
        let name = name.into();
        debug!(extension = %name, "registering extension");
        self.extensions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, Arc::new(extension));
    }

    /// Look up a capability.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn Extension>> {
        self.extensions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Deregister a capability, returning it if it was present.
    pub fn remove(&self, name: &str) -> Option<Arc<dyn Extension>> {
        debug!(extension = %name, "removing extension");
        self.extensions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name)
    }

    /// Check whether a name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.extensions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .extensions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort_unstable();
        names
    }

    /// Number of registered extensions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.extensions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if no extensions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every extension.
    pub fn clear(&self) {
        self.extensions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Resolve `name` and apply it to `pattern`.
    ///
    /// The lock is released before the capability runs, so capabilities may
    /// themselves call other extensions.
    pub fn invoke(&self, name: &str, pattern: &Pattern, args: &[ExtArg]) -> Result<Pattern> {
        let extension = self
            .get(name)
            .ok_or_else(|| RegularizeError::unknown_extension(name))?;
        extension.apply(pattern, args)
    }
}

impl fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionRegistry")
            .field("extensions", &self.names())
            .finish()
    }
}
