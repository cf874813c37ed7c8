//! `SwapHandle<T>` — a shared reference to an immutable snapshot that can be
//! replaced wholesale.
//!
//! Readers call [`SwapHandle::load`] and receive an `Arc<T>` they may keep for
//! as long as they like; a concurrent [`SwapHandle::store`] publishes a new
//! snapshot without disturbing readers that still hold the old one. A reader
//! therefore observes either the old value or the new value in full, never a
//! partially updated one.
//!
//! Writers that need read-modify-write semantics (check the current snapshot,
//! build a replacement, publish it) should use [`SwapHandle::update`], which
//! serializes writers on a dedicated mutex so that two rebuilds cannot race.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// A cloneable handle to an atomically replaceable `Arc<T>` snapshot.
pub struct SwapHandle<T> {
    current: Arc<RwLock<Arc<T>>>,
    writer: Arc<Mutex<()>>,
}

impl<T> SwapHandle<T> {
    /// Create a handle holding `value` as its initial snapshot.
    pub fn new(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    /// Create a handle from an existing `Arc`.
    pub fn from_arc(arc: Arc<T>) -> Self {
        Self {
            current: Arc::new(RwLock::new(arc)),
            writer: Arc::new(Mutex::new(())),
        }
    }

    /// Return the current snapshot.
    pub fn load(&self) -> Arc<T> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Publish `value` as the new snapshot, returning the previous one.
    pub fn store(&self, value: T) -> Arc<T> {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        self.swap(Arc::new(value))
    }

    /// Run `f` against the current snapshot while holding the writer lock.
    ///
    /// If `f` returns `Ok(Some(next))`, `next` is published and returned. If it
    /// returns `Ok(None)` the current snapshot is kept and returned. Readers
    /// are never blocked while `f` runs.
    pub fn update<E, F>(&self, f: F) -> Result<Arc<T>, E>
    where
        F: FnOnce(&Arc<T>) -> Result<Option<T>, E>,
    {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let current = self.load();
        match f(&current)? {
            Some(next) => {
                let next = Arc::new(next);
                self.swap(Arc::clone(&next));
                Ok(next)
            }
            None => Ok(current),
        }
    }

    fn swap(&self, next: Arc<T>) -> Arc<T> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, next)
    }
}

impl<T> Clone for SwapHandle<T> {
    fn clone(&self) -> Self {
        Self {
            current: Arc::clone(&self.current),
            writer: Arc::clone(&self.writer),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for SwapHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SwapHandle({:?})", self.load())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn old_snapshot_survives_store() {
        let h = SwapHandle::new(vec![1, 2, 3]);
        let before = h.load();
        let previous = h.store(vec![4, 5]);
        assert_eq!(*before, vec![1, 2, 3]);
        assert_eq!(*previous, vec![1, 2, 3]);
        assert_eq!(*h.load(), vec![4, 5]);
    }

    #[test]
    fn clones_share_the_slot() {
        let a = SwapHandle::new(1_u32);
        let b = a.clone();
        a.store(2);
        assert_eq!(*b.load(), 2);
    }

    #[test]
    fn update_keeps_current_on_none() {
        let h = SwapHandle::new(10_u32);
        let kept: Result<_, ()> = h.update(|_| Ok(None));
        assert_eq!(*kept.unwrap(), 10);
        let grown: Result<_, ()> = h.update(|cur| Ok(Some(**cur + 5)));
        assert_eq!(*grown.unwrap(), 15);
        assert_eq!(*h.load(), 15);
    }

    #[test]
    fn update_error_leaves_snapshot_untouched() {
        let h = SwapHandle::new(7_u32);
        let res: Result<_, &str> = h.update(|_| Err("boom"));
        assert_eq!(res.unwrap_err(), "boom");
        assert_eq!(*h.load(), 7);
    }

    #[test]
    fn readers_see_whole_snapshots() {
        // Every published vector has all elements equal; a torn read would not.
        let h = SwapHandle::new(vec![0_u64; 64]);
        let writer = {
            let h = h.clone();
            thread::spawn(move || {
                for i in 1..200_u64 {
                    h.store(vec![i; 64]);
                }
            })
        };
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let h = h.clone();
                thread::spawn(move || {
                    for _ in 0..500 {
                        let snap = h.load();
                        assert!(snap.iter().all(|&v| v == snap[0]));
                    }
                })
            })
            .collect();
        writer.join().unwrap();
        for r in readers {
            r.join().unwrap();
        }
    }
}
