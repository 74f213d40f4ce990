use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::thread::{self, ThreadId};

use parking_lot::{Condvar, Mutex};

/// Single-flight memoization cache.
///
/// At most one computation runs per key, ever: concurrent requests for a
/// key in flight block until the winner publishes, then observe the same
/// value. Completed entries are immutable for the cache's lifetime.
///
/// Re-entering a key from the thread currently computing it means the
/// computation depends on its own result (a cyclic import); that panics
/// deterministically instead of deadlocking. If a computation panics, its
/// in-flight slot is cleared and waiters retry, so one poisoned attempt
/// does not wedge later queries.
pub struct MemoCache<K, V> {
    slots: Mutex<HashMap<K, Slot<V>>>,
    ready: Condvar,
}

enum Slot<V> {
    InProgress(ThreadId),
    Done(V),
}

impl<K, V> Default for MemoCache<K, V> {
    fn default() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            ready: Condvar::new(),
        }
    }
}

impl<K, V> MemoCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed value for `key`, if one has been published.
    pub fn get(&self, key: &K) -> Option<V> {
        match self.slots.lock().get(key) {
            Some(Slot::Done(value)) => Some(value.clone()),
            _ => None,
        }
    }

    /// Return the memoized value for `key`, computing it if absent.
    ///
    /// # Panics
    ///
    /// Panics if `compute` (transitively) requests `key` again on the
    /// same thread.
    pub fn get_or_compute(&self, key: K, compute: impl FnOnce() -> V) -> V {
        let me = thread::current().id();
        {
            let mut slots = self.slots.lock();
            loop {
                match slots.get(&key) {
                    Some(Slot::Done(value)) => return value.clone(),
                    Some(Slot::InProgress(owner)) => {
                        assert!(
                            *owner != me,
                            "recursive resolution of {key:?} (cyclic import dependency)"
                        );
                        self.ready.wait(&mut slots);
                    }
                    None => {
                        slots.insert(key.clone(), Slot::InProgress(me));
                        break;
                    }
                }
            }
        }

        // Lock released while computing. The guard clears the in-progress
        // slot if `compute` unwinds.
        let mut guard = InFlight {
            cache: self,
            key: Some(key.clone()),
        };
        let value = compute();
        guard.key = None;
        drop(guard);

        let mut slots = self.slots.lock();
        slots.insert(key, Slot::Done(value.clone()));
        drop(slots);
        self.ready.notify_all();
        value
    }
}

struct InFlight<'a, K, V>
where
    K: Eq + Hash,
{
    cache: &'a MemoCache<K, V>,
    key: Option<K>,
}

impl<K, V> Drop for InFlight<'_, K, V>
where
    K: Eq + Hash,
{
    fn drop(&mut self) {
        if let Some(key) = self.key.take() {
            self.cache.slots.lock().remove(&key);
            self.cache.ready.notify_all();
        }
    }
}
