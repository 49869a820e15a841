//! Convenient re-exports for common regularize usage.
//!
//! ```rust
//! use regularize::prelude::*;
//!
//! let p = Pattern::new().word_characters().at_least_one().unwrap();
//! assert!(Finder::new(p).is_match("hello").unwrap());
//! ```

// Building
pub use crate::flags::FlagSet;
pub use crate::fragment::{ClassMember, GroupSpec};
pub use crate::pattern::Pattern;

// Error handling
pub use crate::error::{RegularizeError, Result};

// Matching and replacing
pub use crate::engine::Match;
pub use crate::find::Finder;
pub use crate::replace::{Substitution, Template};

// Extensions
pub use crate::extension::{ExtArg, ExtensionRegistry};
