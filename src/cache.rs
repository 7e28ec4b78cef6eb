//! In-process caching of remote and local lookups
//!
//! Every lookup against a release server is cached for the duration of one
//! push run: folder paths, configuration searches and folder template
//! listings are each asked for at most once. Caches are owned by the
//! resolver or discovery instance that performs the lookups, so a fresh run
//! always starts empty.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;

use crate::error::{Error, Result};

/// A keyed cache for fallible lookups.
#[derive(Debug, Default)]
pub struct LookupCache<K, V> {
    entries: Mutex<HashMap<K, V>>,
}

impl<K, V> LookupCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create a new empty cache
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Get a cached value, or compute and cache it if not present
    pub fn get_or_try<F>(&self, key: K, lookup: F) -> Result<V>
    where
        F: FnOnce() -> Result<V>,
    {
        // First check if we have a cached result
        {
            let entries = self.entries.lock().map_err(|_| Error::LockPoisoned {
                context: "lookup cache".to_string(),
            })?;
            if let Some(cached) = entries.get(&key) {
                return Ok(cached.clone());
            }
        }

        // Not in cache, perform the lookup
        let value = lookup()?;

        // Store in cache
        {
            let mut entries = self.entries.lock().map_err(|_| Error::LockPoisoned {
                context: "lookup cache".to_string(),
            })?;
            entries.insert(key, value.clone());
        }

        Ok(value)
    }

    /// Manually insert a value into the cache
    pub fn insert(&self, key: K, value: V) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| Error::LockPoisoned {
            context: "lookup cache".to_string(),
        })?;
        entries.insert(key, value);
        Ok(())
    }

    /// Get a value from cache without computing
    pub fn get(&self, key: &K) -> Result<Option<V>> {
        let entries = self.entries.lock().map_err(|_| Error::LockPoisoned {
            context: "lookup cache".to_string(),
        })?;
        Ok(entries.get(key).cloned())
    }

    /// Get the number of cached entries
    pub fn len(&self) -> Result<usize> {
        let entries = self.entries.lock().map_err(|_| Error::LockPoisoned {
            context: "lookup cache".to_string(),
        })?;
        Ok(entries.len())
    }

    /// Check if cache is empty
    pub fn is_empty(&self) -> Result<bool> {
        let entries = self.entries.lock().map_err(|_| Error::LockPoisoned {
            context: "lookup cache".to_string(),
        })?;
        Ok(entries.is_empty())
    }
}
