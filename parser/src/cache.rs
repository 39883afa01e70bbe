//! In-memory cache of compiled usage docs, keyed by a fingerprint of the
//! doc text.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};

use tracing::debug;
use usage_pattern_core::FormatError;

use crate::UsageDoc;

/// Fingerprint of a doc text.
pub fn fingerprint(doc: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    doc.hash(&mut hasher);
    hasher.finish()
}

/// Thread-safe cache of compiled docs.
///
/// An entry is only returned when its stored doc text equals the requested
/// one, so a fingerprint collision costs a recompile, never a wrong pattern.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use usage_pattern_parser::UsageCache;
///
/// let cache = UsageCache::new();
/// let first = cache.get_or_compile("Usage: prog <x>").unwrap();
/// let second = cache.get_or_compile("Usage: prog <x>").unwrap();
/// assert!(Arc::ptr_eq(&first, &second));
/// assert_eq!(cache.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct UsageCache {
    entries: RwLock<HashMap<u64, Arc<UsageDoc>>>,
}

impl UsageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a compiled doc. Returns `Some` only for an exact text match.
    pub fn get(&self, doc: &str) -> Option<Arc<UsageDoc>> {
        let entries = self.entries.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        entries
            .get(&fingerprint(doc))
            .filter(|entry| entry.doc() == doc)
            .cloned()
    }

    /// Returns the cached compilation of `doc`, compiling and storing it on
    /// a miss.
    ///
    /// # Errors
    ///
    /// Returns the [`FormatError`] of a failed compile; failures are not
    /// cached.
    pub fn get_or_compile(&self, doc: &str) -> Result<Arc<UsageDoc>, FormatError> {
        if let Some(hit) = self.get(doc) {
            return Ok(hit);
        }

        let compiled = Arc::new(UsageDoc::compile(doc)?);
        let key = fingerprint(doc);
        debug!(fingerprint = key, "Caching compiled usage doc");
        let mut entries = self.entries.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.insert(key, Arc::clone(&compiled));
        Ok(compiled)
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_stable() {
        assert_eq!(fingerprint("Usage: a"), fingerprint("Usage: a"));
        assert_ne!(fingerprint("Usage: a"), fingerprint("Usage: b"));
    }

    #[test]
    fn test_failed_compile_not_cached() {
        let cache = UsageCache::new();
        assert_eq!(
            cache.get_or_compile("nothing").unwrap_err(),
            FormatError::MissingUsage
        );
        assert!(cache.is_empty());
    }

    #[test]
    fn test_distinct_docs() {
        let cache = UsageCache::new();
        cache.get_or_compile("Usage: prog a").unwrap();
        cache.get_or_compile("Usage: prog b").unwrap();
        assert_eq!(cache.len(), 2);
        assert!(cache.get("Usage: prog c").is_none());

        cache.clear();
        assert!(cache.get("Usage: prog a").is_none());
    }
}
