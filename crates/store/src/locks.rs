//! Keyed mutual exclusion.

use dashmap::DashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

use crate::StoreError;

/// One mutex per key, created on first use and dropped once unused.
pub struct KeyedLocks<K: Eq + Hash> {
    map: DashMap<K, Arc<Mutex<()>>>,
}

impl<K: Eq + Hash> Default for KeyedLocks<K> {
    fn default() -> Self {
        Self {
            map: DashMap::new(),
        }
    }
}

impl<K> KeyedLocks<K>
where
    K: Eq + Hash + Clone + std::fmt::Display,
{
    /// Returns the mutex for `key`. Lock it with [`acquire`].
    pub fn handle(&self, key: K) -> Arc<Mutex<()>> {
        Arc::clone(self.map.entry(key).or_default().value())
    }

    /// Handles for several keys in the iteration order given.
    ///
    /// Callers pass keys in a fixed global order to avoid lock cycles.
    pub fn handles(&self, keys: impl IntoIterator<Item = K>) -> Vec<(K, Arc<Mutex<()>>)> {
        keys.into_iter()
            .map(|key| {
                let handle = self.handle(key.clone());
                (key, handle)
            })
            .collect()
    }

    /// Runs `f` while holding the mutex for `key`, then forgets the key
    /// unless another caller still holds its handle.
    pub fn with_lock<T, E>(
        &self,
        key: K,
        what: &'static str,
        f: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let handle = self.handle(key.clone());
        let result = {
            let _guard = acquire(&handle, what, &key)?;
            f()
        };
        drop(handle);
        self.release(&key);
        result
    }

    /// Removes the entry for `key` when the registry holds its only handle.
    pub fn release(&self, key: &K) {
        self.map
            .remove_if(key, |_, handle| Arc::strong_count(handle) == 1);
    }

    /// Number of keys currently registered.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether no key is registered.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Blocks until the mutex is held.
pub fn acquire<'a>(
    handle: &'a Mutex<()>,
    what: &'static str,
    key: &dyn std::fmt::Display,
) -> Result<MutexGuard<'a, ()>, StoreError> {
    debug!(lock = what, key = %key, "Acquiring lock");
    handle.lock().map_err(|_| StoreError::Poisoned(what))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_same_key_shares_mutex() {
        let locks: KeyedLocks<u32> = KeyedLocks::default();
        let a = locks.handle(1);
        let b = locks.handle(1);
        let c = locks.handle(2);
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(locks.len(), 2);
    }

    #[test]
    fn test_held_lock_blocks_other_holder() {
        let locks: Arc<KeyedLocks<u32>> = Arc::new(KeyedLocks::default());
        let handle = locks.handle(7);
        let guard = acquire(&handle, "test", &7).unwrap();

        let other = Arc::clone(&locks);
        let waiter = thread::spawn(move || {
            let handle = other.handle(7);
            handle.try_lock().is_err()
        });
        assert!(waiter.join().unwrap());
        drop(guard);
        assert!(handle.try_lock().is_ok());
    }

    #[test]
    fn test_with_lock_forgets_key_afterwards() {
        let locks: KeyedLocks<u32> = KeyedLocks::default();
        let value = locks
            .with_lock(3, "test", || {
                assert_eq!(locks.len(), 1);
                Ok::<_, StoreError>(42)
            })
            .unwrap();
        assert_eq!(value, 42);
        assert!(locks.is_empty());

        let err = locks
            .with_lock(4, "test", || Err::<(), _>(StoreError::Poisoned("inner")))
            .unwrap_err();
        assert!(matches!(err, StoreError::Poisoned("inner")));
        assert!(locks.is_empty());
    }

    #[test]
    fn test_release_keeps_key_with_outstanding_handle() {
        let locks: KeyedLocks<u32> = KeyedLocks::default();
        let held = locks.handle(5);
        locks.with_lock(5, "test", || Ok::<_, StoreError>(())).unwrap();
        assert_eq!(locks.len(), 1);

        drop(held);
        locks.release(&5);
        assert!(locks.is_empty());
    }
}
