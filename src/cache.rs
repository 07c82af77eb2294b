//! Defines [`Cache`], the optional read-through store a
//! [`crate::loader::Loader`] consults before parsing a document.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::document::ContentDocument;
use crate::error::Result;

/// One identifier's entry. It's empty until a load succeeds.
type Slot = Arc<Mutex<Option<Arc<ContentDocument>>>>;

/// Parsed documents keyed by identifier. A cache is created and owned by the
/// caller and lent to any number of loaders; entries are only ever added
/// (populate-on-miss) until [`Cache::clear`] is called. Entries reflect the
/// content repository as it was when they were first read.
#[derive(Debug, Default)]
pub struct Cache {
    slots: Mutex<HashMap<String, Slot>>,
}

impl Cache {
    pub fn new() -> Cache {
        Cache::default()
    }

    /// Returns the cached document for `identifier`, if any.
    pub fn get(&self, identifier: &str) -> Option<Arc<ContentDocument>> {
        let slot = lock(&self.slots).get(identifier).cloned()?;
        let document = lock(&slot).clone();
        document
    }

    /// Returns the cached document for `identifier`, calling `load` to
    /// populate the entry on a miss. Only callers asking for the same
    /// identifier wait on each other, so a key is never populated twice.
    /// Failures are not cached.
    pub(crate) fn get_or_try_insert_with<F>(
        &self,
        identifier: &str,
        load: F,
    ) -> Result<Arc<ContentDocument>>
    where
        F: FnOnce() -> Result<ContentDocument>,
    {
        let slot = lock(&self.slots)
            .entry(identifier.to_owned())
            .or_default()
            .clone();
        let mut entry = lock(&slot);
        if let Some(document) = &*entry {
            return Ok(document.clone());
        }
        let document = Arc::new(load()?);
        *entry = Some(document.clone());
        Ok(document)
    }

    /// The number of populated entries.
    pub fn len(&self) -> usize {
        lock(&self.slots)
            .values()
            .filter(|slot| lock(slot).is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every entry so the next read goes back to disk.
    pub fn clear(&self) {
        lock(&self.slots).clear()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // Neither the map nor a slot is ever left half-updated, so a poisoned
    // lock is still usable.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
