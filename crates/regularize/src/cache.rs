//! Compiled-pattern cache.
//!
//! Patterns are keyed by their canonical string *and* flags, so two builder
//! chains that render the same text with the same flags share one compiled
//! regex. The cache is bounded and evicts the least recently used entry.
//!
//! Concurrency: lookups that hit only take the read lock and refresh an
//! atomic recency stamp, so hits on different keys never block each other.
//! Each key owns a compile gate, which keeps at most one compilation per key
//! in flight; concurrent callers for the same key wait and then reuse it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, trace, warn};

use crate::config::{CacheConfig, RegularizeConfig};
use crate::engine::{CompiledPattern, MatchEngine, RegexEngine};
use crate::error::{RegularizeError, Result};
use crate::flags::FlagSet;
use crate::pattern::CanonicalPattern;

/// Default maximum cache size.
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// A bounded LRU cache of compiled patterns.
pub struct PatternCache {
    slots: RwLock<HashMap<CanonicalPattern, Arc<Slot>>>,
    capacity: usize,
    engine: Arc<dyn MatchEngine>,
    /// Monotonic counter used as a recency stamp.
    clock: AtomicU64,
    /// Total cache hits (for statistics).
    total_hits: AtomicUsize,
    /// Total cache misses (for statistics).
    total_misses: AtomicUsize,
    /// Total evictions (for statistics).
    total_evictions: AtomicUsize,
}

struct Slot {
    handle: OnceLock<Arc<CompiledPattern>>,
    /// Held while compiling this key.
    gate: Mutex<()>,
    last_used: AtomicU64,
}

impl Slot {
    const fn new() -> Self {
        Self {
            handle: OnceLock::new(),
            gate: Mutex::new(()),
            last_used: AtomicU64::new(0),
        }
    }

    fn ready(&self) -> Option<&Arc<CompiledPattern>> {
        self.handle.get()
    }

    fn touch(&self, stamp: u64) {
        self.last_used.fetch_max(stamp, Ordering::Relaxed);
    }
}

impl PatternCache {
    /// Create a cache holding at most `capacity` compiled patterns.
    ///
    /// A capacity of zero is treated as one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self::with_engine(capacity, Arc::new(RegexEngine))
    }

    /// Create a cache with default size.
    #[must_use]
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }

    /// Create a cache sized from configuration.
    #[must_use]
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.capacity)
    }

    /// Create a cache that compiles through a custom engine.
    #[must_use]
    pub fn with_engine(capacity: usize, engine: Arc<dyn MatchEngine>) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: RwLock::new(HashMap::with_capacity(capacity)),
            capacity,
            engine,
            clock: AtomicU64::new(0),
            total_hits: AtomicUsize::new(0),
            total_misses: AtomicUsize::new(0),
            total_evictions: AtomicUsize::new(0),
        }
    }

    // The cache is an optimization, so lock poisoning is recovered from.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<CanonicalPattern, Arc<Slot>>> {
        self.slots.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<CanonicalPattern, Arc<Slot>>> {
        self.slots.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn hit(&self, key: &CanonicalPattern, slot: &Slot, handle: &Arc<CompiledPattern>) -> Arc<CompiledPattern> {
        slot.touch(self.tick());
        self.total_hits.fetch_add(1, Ordering::Relaxed);
        trace!(pattern = %key.pattern(), flags = %key.flags(), "pattern cache hit");
        Arc::clone(handle)
    }

    /// Get or compile a pattern.
    ///
    /// # Errors
    ///
    /// Returns [`RegularizeError::PatternCompilation`] if the engine rejects
    /// the pattern. Failures are not cached.
    pub fn get_or_compile(&self, pattern: &str, flags: FlagSet) -> Result<Arc<CompiledPattern>> {
        self.get_or_compile_canonical(&CanonicalPattern::new(pattern, flags))
    }

    /// Get or compile the output of [`Pattern::compile`](crate::Pattern::compile).
    ///
    /// # Errors
    ///
    /// Returns [`RegularizeError::PatternCompilation`] if the engine rejects
    /// the pattern. Failures are not cached.
    pub fn get_or_compile_canonical(&self, key: &CanonicalPattern) -> Result<Arc<CompiledPattern>> {
        loop {
            // Try read path first
            {
                let slots = self.read();
                if let Some(slot) = slots.get(key)
                    && let Some(handle) = slot.ready()
                {
                    return Ok(self.hit(key, slot, handle));
                }
            }

            let slot = {
                let mut slots = self.write();
                Arc::clone(slots.entry(key.clone()).or_insert_with(|| Arc::new(Slot::new())))
            };

            let _gate = slot.gate.lock().unwrap_or_else(PoisonError::into_inner);

            // Another thread may have compiled while we waited on the gate
            if let Some(handle) = slot.ready() {
                return Ok(self.hit(key, &slot, handle));
            }

            // A failed compile removed the slot; start over with a fresh one.
            let current = self
                .read()
                .get(key)
                .is_some_and(|s| Arc::ptr_eq(s, &slot));
            if !current {
                continue;
            }

            return self.compile_into(key, &slot);
        }
    }

    fn compile_into(&self, key: &CanonicalPattern, slot: &Arc<Slot>) -> Result<Arc<CompiledPattern>> {
        self.total_misses.fetch_add(1, Ordering::Relaxed);
        debug!(pattern = %key.pattern(), flags = %key.flags(), "compiling pattern");

        match self.engine.compile(key.pattern(), key.flags()) {
            Ok(regex) => {
                let handle = Arc::new(CompiledPattern::new(
                    key.pattern().to_string(),
                    key.flags(),
                    regex,
                ));
                let _ = slot.handle.set(Arc::clone(&handle));
                slot.touch(self.tick());
                self.evict_over_capacity(key);
                Ok(handle)
            }
            Err(source) => {
                warn!(pattern = %key.pattern(), error = %source, "unable to compile pattern");
                let mut slots = self.write();
                if slots.get(key).is_some_and(|s| Arc::ptr_eq(s, slot)) {
                    slots.remove(key);
                }
                Err(RegularizeError::compilation(key.pattern(), source))
            }
        }
    }

    /// Evict least recently used entries until the cache fits, keeping `keep`.
    fn evict_over_capacity(&self, keep: &CanonicalPattern) {
        let mut slots = self.write();
        while slots.len() > self.capacity {
            let victim = slots
                .iter()
                .filter(|(key, slot)| *key != keep && slot.ready().is_some())
                .min_by_key(|(_, slot)| slot.last_used.load(Ordering::Relaxed))
                .map(|(key, _)| key.clone());

            // Only in-flight compiles remain; they are counted once they land.
            let Some(victim) = victim else { break };
            slots.remove(&victim);
            self.total_evictions.fetch_add(1, Ordering::Relaxed);
            debug!(pattern = %victim.pattern(), flags = %victim.flags(), "evicted pattern");
        }
    }

    /// Check if a pattern is cached.
    #[must_use]
    pub fn contains(&self, pattern: &str, flags: FlagSet) -> bool {
        self.read()
            .get(&CanonicalPattern::new(pattern, flags))
            .is_some_and(|slot| slot.ready().is_some())
    }

    /// Get the current number of cached patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read()
            .values()
            .filter(|slot| slot.ready().is_some())
            .count()
    }

    /// Check if the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear the cache.
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Get the maximum cache size.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get cache statistics.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.len(),
            capacity: self.capacity,
            total_hits: self.total_hits.load(Ordering::Relaxed),
            total_misses: self.total_misses.load(Ordering::Relaxed),
            total_evictions: self.total_evictions.load(Ordering::Relaxed),
        }
    }

    /// Get the total number of cache hits.
    #[must_use]
    pub fn total_hits(&self) -> usize {
        self.total_hits.load(Ordering::Relaxed)
    }

    /// Get the total number of cache misses.
    #[must_use]
    pub fn total_misses(&self) -> usize {
        self.total_misses.load(Ordering::Relaxed)
    }

    /// Get the cache hit rate as a ratio (0.0 to 1.0).
    ///
    /// Returns 1.0 if no accesses have been made.
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        self.stats().hit_rate()
    }
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

impl std::fmt::Debug for PatternCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternCache")
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

/// Statistics about a pattern cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Current number of cached patterns.
    pub size: usize,
    /// Maximum cache size.
    pub capacity: usize,
    /// Total cache hits.
    pub total_hits: usize,
    /// Total cache misses.
    pub total_misses: usize,
    /// Total entries evicted to stay within capacity.
    pub total_evictions: usize,
}

impl CacheStats {
    /// Get the cache hit rate as a ratio (0.0 to 1.0).
    ///
    /// Returns 1.0 if no accesses have been made.
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.total_hits + self.total_misses;
        if total == 0 {
            1.0
        } else {
            self.total_hits as f64 / total as f64
        }
    }
}

static GLOBAL_CACHE: OnceLock<Arc<PatternCache>> = OnceLock::new();

/// The process-wide cache.
///
/// Created on first use with the capacity from [`RegularizeConfig::load`],
/// unless [`install_global_cache`] ran first. Its capacity never changes
/// afterwards.
pub fn global_cache() -> Arc<PatternCache> {
    Arc::clone(GLOBAL_CACHE.get_or_init(|| {
        let config = RegularizeConfig::load();
        debug!(capacity = config.cache.capacity, "initializing global pattern cache");
        Arc::new(PatternCache::from_config(&config.cache))
    }))
}

/// Install the process-wide cache.
///
/// # Errors
///
/// Returns [`RegularizeError::Config`] if the global cache already exists.
pub fn install_global_cache(cache: PatternCache) -> Result<Arc<PatternCache>> {
    let cache = Arc::new(cache);
    GLOBAL_CACHE
        .set(Arc::clone(&cache))
        .map_err(|_| RegularizeError::config("global pattern cache is already initialized"))?;
    debug!(capacity = cache.capacity(), "installed global pattern cache");
    Ok(cache)
}

/// Get or compile a pattern using the global cache.
///
/// # Errors
///
/// Returns an error if the pattern is invalid.
pub fn get_compiled(pattern: &str, flags: FlagSet) -> Result<Arc<CompiledPattern>> {
    global_cache().get_or_compile(pattern, flags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::CountingEngine;

    fn counting(capacity: usize) -> (PatternCache, Arc<CountingEngine>) {
        let engine = Arc::new(CountingEngine::new(RegexEngine));
        let cache = PatternCache::with_engine(capacity, Arc::clone(&engine) as Arc<dyn MatchEngine>);
        (cache, engine)
    }

    #[test]
    fn cache_basic() {
        let cache = PatternCache::new(10);

        let r1 = cache.get_or_compile(r"\d+", FlagSet::empty()).unwrap();
        let r2 = cache.get_or_compile(r"\d+", FlagSet::empty()).unwrap();

        // Should be the same Arc
        assert!(Arc::ptr_eq(&r1, &r2));
    }

    #[test]
    fn flags_are_part_of_the_key() {
        let (cache, engine) = counting(10);
        cache.get_or_compile("abc", FlagSet::empty()).unwrap();
        cache.get_or_compile("abc", FlagSet::CASE_INSENSITIVE).unwrap();
        assert_eq!(engine.compiles(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn cache_eviction_is_lru() {
        let cache = PatternCache::new(2);
        let none = FlagSet::empty();

        cache.get_or_compile("a+", none).unwrap();
        cache.get_or_compile("b+", none).unwrap();
        // Touch a+ so b+ becomes the oldest
        cache.get_or_compile("a+", none).unwrap();
        cache.get_or_compile("c+", none).unwrap();

        assert_eq!(cache.len(), 2);
        assert!(cache.contains("a+", none));
        assert!(!cache.contains("b+", none));
        assert!(cache.contains("c+", none));
        assert_eq!(cache.stats().total_evictions, 1);
    }

    #[test]
    fn capacity_one_recompiles_evicted() {
        let (cache, engine) = counting(1);
        let none = FlagSet::empty();
        cache.get_or_compile("a", none).unwrap();
        cache.get_or_compile("b", none).unwrap();
        cache.get_or_compile("a", none).unwrap();
        assert_eq!(engine.compiles(), 3);
    }

    #[test]
    fn cache_invalid_pattern_is_not_cached() {
        let (cache, engine) = counting(10);
        let first = cache.get_or_compile("[invalid", FlagSet::empty());
        assert!(matches!(first, Err(RegularizeError::PatternCompilation { .. })));
        assert!(cache.is_empty());
        assert!(cache.get_or_compile("[invalid", FlagSet::empty()).is_err());
        assert_eq!(engine.compiles(), 2);
    }

    #[test]
    fn cache_stats_tracking() {
        let cache = PatternCache::new(10);
        let none = FlagSet::empty();

        let stats = cache.stats();
        assert_eq!(stats.size, 0);
        assert_eq!(stats.total_hits, 0);
        assert_eq!(stats.total_misses, 0);

        cache.get_or_compile(r"\d+", none).unwrap();
        assert_eq!(cache.total_misses(), 1);
        assert_eq!(cache.total_hits(), 0);

        cache.get_or_compile(r"\d+", none).unwrap();
        cache.get_or_compile(r"\d+", none).unwrap();
        assert_eq!(cache.total_hits(), 2);

        cache.get_or_compile(r"\w+", none).unwrap();
        assert_eq!(cache.total_misses(), 2);

        // 2 hits out of 4 total
        assert!((cache.hit_rate() - 0.5).abs() < 0.001);
    }

    #[test]
    fn cache_stats_hit_rate_empty() {
        let cache = PatternCache::new(10);
        assert!((cache.hit_rate() - 1.0).abs() < 0.001);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        assert_eq!(PatternCache::new(0).capacity(), 1);
    }

    #[test]
    fn clear_empties() {
        let cache = PatternCache::new(4);
        cache.get_or_compile("x", FlagSet::empty()).unwrap();
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn concurrent_requests_compile_once() {
        let (cache, engine) = counting(8);
        let cache = Arc::new(cache);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    cache
                        .get_or_compile(r"(?P<word>\w+)\s+\d{2,}", FlagSet::empty())
                        .unwrap()
                })
            })
            .collect();
        let compiled: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(engine.compiles(), 1);
        assert!(compiled.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }
}
