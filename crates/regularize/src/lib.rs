//! regularize: build regular expressions from a fluent, immutable API
//!
//! Patterns are assembled from small fragments instead of hand-written
//! syntax. Every builder call returns a new [`Pattern`]; compiled regexes are
//! shared through a bounded cache keyed by the rendered pattern and its flags,
//! so structurally identical patterns compile once.
//!
//! # Features
//!
//! - **Immutable builder** backed by persistent sequences
//! - **Named groups, alternation and flags** with construction-time checks
//! - **Extension registry** for adding vocabulary by name
//! - **Bounded LRU cache** of compiled patterns, shared across threads
//! - **Finder and Substitution** for matching and replacing
//!
//! # Example
//!
//! ```rust
//! use regularize::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let log_file = Pattern::new()
//!         .literal("application.")
//!         .digits()
//!         .at_least_one()?
//!         .literal(".log")
//!         .case_insensitive();
//!
//!     assert_eq!(log_file.compile().pattern(), r"application\.[0-9]+\.log");
//!
//!     let finder = Finder::new(log_file);
//!     assert!(finder.match_at_start("Application.1.log")?.is_some());
//!     assert!(finder.match_at_start("application.log")?.is_none());
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod extension;
pub mod find;
pub mod flags;
pub mod fragment;
pub mod pattern;
pub mod prelude;
pub mod replace;

pub use cache::{
    CacheStats, DEFAULT_CACHE_CAPACITY, PatternCache, get_compiled, global_cache,
    install_global_cache,
};
pub use config::{CacheConfig, EnvConfig, RegularizeConfig};
pub use engine::{CompiledPattern, CountingEngine, Match, MatchEngine, RegexEngine};
pub use error::{RegularizeError, Result};
pub use extension::{ExtArg, Extension, ExtensionRegistry};
pub use find::Finder;
pub use flags::FlagSet;
pub use fragment::{Anchor, ClassMember, Fragment, GroupSpec, Sequence};
pub use pattern::{CanonicalPattern, Pattern};
pub use replace::{GroupRef, Substitution, Template};
