//! Measurement cache
//!
//! Measuring through a real font walks the glyph tables on every call.
//! Widgets re-measure the same labels on each render, so a measurement
//! context keeps a bounded LRU of results keyed by (text, font).

use std::cell::{Cell, RefCell};
use std::num::NonZeroUsize;

use lru::LruCache;
use rustc_hash::FxBuildHasher;

use crate::measure::{FontSpec, TextMeasurer, TextMetrics};

/// Default number of cached measurements per context
const DEFAULT_CAPACITY: usize = 256;

type CacheKey = (String, String);

/// A measurer that memoizes another measurer's results
pub struct CachedTextMeasurer<M> {
    inner: M,
    cache: RefCell<LruCache<CacheKey, Option<TextMetrics>, FxBuildHasher>>,
    hits: Cell<u64>,
    misses: Cell<u64>,
}

impl<M: TextMeasurer> CachedTextMeasurer<M> {
    /// Wrap `inner` with the default capacity
    pub fn new(inner: M) -> Self {
        Self::with_capacity(inner, DEFAULT_CAPACITY)
    }

    /// Wrap `inner`, keeping at most `capacity` results (minimum 1)
    pub fn with_capacity(inner: M, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            cache: RefCell::new(LruCache::with_hasher(capacity, FxBuildHasher)),
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    }

    /// The wrapped measurer
    pub fn inner(&self) -> &M {
        &self.inner
    }

    /// Number of cached results
    pub fn len(&self) -> usize {
        self.cache.borrow().len()
    }

    /// Whether nothing is cached
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// (hits, misses) since creation
    pub fn stats(&self) -> (u64, u64) {
        (self.hits.get(), self.misses.get())
    }

    /// Drop all cached results
    pub fn clear(&self) {
        self.cache.borrow_mut().clear();
    }
}

impl<M: TextMeasurer> TextMeasurer for CachedTextMeasurer<M> {
    fn measure(&self, text: &str, font: &FontSpec) -> Option<TextMetrics> {
        let key = (text.to_string(), font.to_string());

        if let Some(cached) = self.cache.borrow_mut().get(&key) {
            self.hits.set(self.hits.get() + 1);
            return *cached;
        }

        self.misses.set(self.misses.get() + 1);
        let metrics = self.inner.measure(text, font);
        self.cache.borrow_mut().put(key, metrics);
        metrics
    }
}
