//! Optional memoization of filtered frames.
//!
//! A reactive shell re-runs the whole pipeline on every interaction; since
//! every operation is pure that is already correct, so this cache is a
//! performance strategy only. It is keyed by the filter spec and owns its
//! base catalog, which is immutable after load, so entries never go stale.

use std::collections::HashMap;

use color_eyre::eyre::eyre;
use color_eyre::Result;

use crate::filter::FilterSpec;
use crate::source::Catalog;

/// Memoizes `base.filter(spec)` per spec.
pub struct FilterCache {
    base: Catalog,
    entries: HashMap<FilterSpec, Catalog>,
}

impl FilterCache {
    pub fn new(base: Catalog) -> Self {
        Self {
            base,
            entries: HashMap::new(),
        }
    }

    /// The unfiltered catalog this cache was built over.
    pub fn base(&self) -> &Catalog {
        &self.base
    }

    /// The filtered catalog for `spec`, computing and storing it on first use.
    pub fn filtered(&mut self, spec: &FilterSpec) -> Result<&Catalog> {
        if !self.entries.contains_key(spec) {
            let filtered = self.base.filter(spec)?;
            self.entries.insert(spec.clone(), filtered);
        }
        self.entries
            .get(spec)
            .ok_or_else(|| eyre!("filter cache entry missing after insert"))
    }

    /// Drop all memoized frames; the base catalog is kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
