//! Error types for regularize.
//!
//! Errors fall into three groups. Construction errors are raised by the
//! builder call that breaks an invariant and always indicate a mistake in how
//! a pattern was assembled. Compilation errors come from the matching engine
//! and are never cached, so a corrected pattern can simply be retried.
//! Runtime errors cover replacement templates and sample testing; a failed
//! match on its own is never an error.

use thiserror::Error;

/// Maximum length of a pattern to display in error messages.
const MAX_PATTERN_DISPLAY: usize = 200;

/// Shorten long patterns for display, keeping the head.
fn format_pattern_snippet(pattern: &str) -> String {
    if pattern.len() <= MAX_PATTERN_DISPLAY {
        return pattern.to_string();
    }

    let mut end = MAX_PATTERN_DISPLAY;
    while !pattern.is_char_boundary(end) {
        end -= 1;
    }
    format!(
        "{}... ({} more bytes)",
        &pattern[..end],
        pattern.len() - end
    )
}

/// Format a compilation error with the rendered pattern.
fn format_compilation_error(pattern: &str, source: &regex::Error) -> String {
    format!(
        "unable to compile pattern\n\
         \n\
         Pattern: /{}/\n\
         \n\
         {source}",
        format_pattern_snippet(pattern)
    )
}

/// The main error type for regularize operations.
#[derive(Debug, Error)]
pub enum RegularizeError {
    /// A quantifier or digit range whose lower bound exceeds its upper bound.
    #[error("invalid range: cannot build range between {minimum} and {maximum}")]
    InvalidRange {
        /// The requested lower bound.
        minimum: u32,
        /// The requested upper bound.
        maximum: u32,
    },

    /// A quantifier was applied to a pattern with nothing to repeat.
    #[error("cannot quantify an empty pattern")]
    EmptyPatternQuantify,

    /// A group was requested on a pattern with nothing to wrap.
    #[error("cannot group an empty pattern")]
    EmptyPatternGroup,

    /// Two capture groups share a name within one composed pattern.
    #[error("duplicate capture group name '{name}'")]
    DuplicateGroupName {
        /// The name used more than once.
        name: String,
    },

    /// A capture group name the engine cannot accept.
    #[error("invalid capture group name '{name}': {reason}")]
    InvalidGroupName {
        /// The rejected name.
        name: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Two mutually exclusive flags were combined.
    #[error("incompatible flags: {first} cannot be combined with {second}")]
    IncompatibleFlags {
        /// The flag already present.
        first: String,
        /// The flag being added.
        second: String,
    },

    /// No capability is registered under the requested extension name.
    #[error("unknown extension '{name}'")]
    UnknownExtension {
        /// The requested extension name.
        name: String,
    },

    /// An extension was called with an argument it cannot use.
    #[error("invalid argument {index} for extension: {message}")]
    InvalidExtensionArgument {
        /// Position of the offending argument.
        index: usize,
        /// What was wrong with it.
        message: String,
    },

    /// The matching engine rejected the rendered pattern.
    #[error("{}", format_compilation_error(pattern, source))]
    PatternCompilation {
        /// The canonical pattern string that failed.
        pattern: String,
        /// The engine error.
        #[source]
        source: regex::Error,
    },

    /// `Pattern::test` found no match at the start of the sample.
    #[error("pattern /{}/ did not match sample {sample:?}", format_pattern_snippet(pattern))]
    SampleNotMatched {
        /// The canonical pattern string.
        pattern: String,
        /// The sample that was tested.
        sample: String,
    },

    /// A replacement template refers to a capture group that does not exist.
    #[error("replacement refers to unknown group '{reference}'")]
    UnknownGroupReference {
        /// The name or index used in the template.
        reference: String,
    },

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// Configuration file could not be parsed.
    #[error("invalid configuration file: {0}")]
    Toml(#[from] toml::de::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An I/O error occurred with additional context.
    #[error("{context}: {source}")]
    IoWithContext {
        /// What operation was being performed.
        context: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for regularize operations.
pub type Result<T> = std::result::Result<T, RegularizeError>;

impl RegularizeError {
    /// Create an invalid range error.
    #[must_use]
    pub const fn invalid_range(minimum: u32, maximum: u32) -> Self {
        Self::InvalidRange { minimum, maximum }
    }

    /// Create a duplicate group name error.
    pub fn duplicate_group_name(name: impl Into<String>) -> Self {
        Self::DuplicateGroupName { name: name.into() }
    }

    /// Create an invalid group name error.
    pub fn invalid_group_name(name: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidGroupName {
            name: name.into(),
            reason,
        }
    }

    /// Create an incompatible flags error.
    pub fn incompatible_flags(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self::IncompatibleFlags {
            first: first.into(),
            second: second.into(),
        }
    }

    /// Create an unknown extension error.
    pub fn unknown_extension(name: impl Into<String>) -> Self {
        Self::UnknownExtension { name: name.into() }
    }

    /// Create an invalid extension argument error.
    pub fn invalid_extension_argument(index: usize, message: impl Into<String>) -> Self {
        Self::InvalidExtensionArgument {
            index,
            message: message.into(),
        }
    }

    /// Create a pattern compilation error.
    pub fn compilation(pattern: impl Into<String>, source: regex::Error) -> Self {
        Self::PatternCompilation {
            pattern: pattern.into(),
            source,
        }
    }

    /// Create a sample not matched error.
    pub fn sample_not_matched(pattern: impl Into<String>, sample: impl Into<String>) -> Self {
        Self::SampleNotMatched {
            pattern: pattern.into(),
            sample: sample.into(),
        }
    }

    /// Create an unknown group reference error.
    pub fn unknown_group_reference(reference: impl Into<String>) -> Self {
        Self::UnknownGroupReference {
            reference: reference.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an I/O error with context.
    pub fn io_context(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::IoWithContext {
            context: context.into(),
            source,
        }
    }

    /// Wrap an I/O result with context.
    pub fn with_io_context<T>(result: std::io::Result<T>, context: impl Into<String>) -> Result<T> {
        result.map_err(|e| Self::io_context(context, e))
    }

    /// Check if this error was raised while assembling a pattern.
    #[must_use]
    pub const fn is_construction_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRange { .. }
                | Self::EmptyPatternQuantify
                | Self::EmptyPatternGroup
                | Self::DuplicateGroupName { .. }
                | Self::InvalidGroupName { .. }
                | Self::IncompatibleFlags { .. }
                | Self::UnknownExtension { .. }
                | Self::InvalidExtensionArgument { .. }
        )
    }

    /// Check if this error came from the matching engine.
    #[must_use]
    pub const fn is_compilation_error(&self) -> bool {
        matches!(self, Self::PatternCompilation { .. })
    }

    /// Get the pattern text if this error carries one.
    #[must_use]
    pub fn pattern(&self) -> Option<&str> {
        match self {
            Self::PatternCompilation { pattern, .. } | Self::SampleNotMatched { pattern, .. } => {
                Some(pattern)
            }
            _ => None,
        }
    }
}
