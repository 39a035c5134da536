//! In-process locking keyed by string value.
//!
//! Two callers asking for the same key (compared by value, never by address)
//! share one mutex, so work guarded by that key runs one at a time while work
//! for other keys proceeds in parallel.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use tracing::trace;

use crate::error::{LockError, LockResult};

/// A registry of mutexes, one per key, created on first use and reused.
#[derive(Default)]
pub struct KeyedLock {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl KeyedLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the mutex for `key`, inserting a fresh one if none exists yet.
    fn handle(&self, key: &str) -> LockResult<Arc<Mutex<()>>> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| LockError::Poisoned(key.to_string()))?;

        Ok(Arc::clone(
            locks
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        ))
    }

    /// Run `f` while holding the exclusive lock for `key`.
    ///
    /// This will block until every other holder of the same key is done.
    /// The registry itself is only held while looking up the key, so
    /// callers with different keys never wait on each other.
    ///
    /// # Arguments
    ///
    /// * `key` - Value identifying the guarded resource
    /// * `f` - Work to run inside the critical section
    pub fn with_lock<T, F>(&self, key: &str, f: F) -> LockResult<T>
    where
        F: FnOnce() -> T,
    {
        let handle = self.handle(key)?;
        let _guard = handle
            .lock()
            .map_err(|_| LockError::Poisoned(key.to_string()))?;
        trace!("acquired lock for {}", key);

        Ok(f())
    }

    /// Number of keys seen so far.
    pub fn len(&self) -> usize {
        self.locks.lock().map(|locks| locks.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
