//! Builder pooling.
//!
//! Every (sub-)evaluation rents an [`OutputBuilder`] and hands it back when the
//! guard drops, on every exit path. Returned builders are cleared first and
//! keep their allocations.

use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::builder::OutputBuilder;

/// An item that can be reset before going back into a pool.
pub trait Clearable {
    fn clear(&mut self);
}

impl Clearable for OutputBuilder {
    fn clear(&mut self) {
        OutputBuilder::clear(self)
    }
}

/// A bounded pool of reusable items. At most `max_retained` idle items are
/// kept; extra returns are dropped.
#[derive(Debug)]
pub struct ObjectPool<T: Clearable + Default> {
    idle: Mutex<Vec<T>>,
    max_retained: usize,
    rented: AtomicUsize,
    created: AtomicUsize,
}

pub type BuilderPool = ObjectPool<OutputBuilder>;

impl<T: Clearable + Default> ObjectPool<T> {
    pub fn new(max_retained: usize) -> Self {
        Self {
            idle: Mutex::new(Vec::new()),
            max_retained,
            rented: AtomicUsize::new(0),
            created: AtomicUsize::new(0),
        }
    }

    pub fn rent(&self) -> Pooled<'_, T> {
        let item = self
            .idle
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop()
            .unwrap_or_else(|| {
                self.created.fetch_add(1, Ordering::Relaxed);
                T::default()
            });
        self.rented.fetch_add(1, Ordering::Relaxed);
        Pooled {
            pool: self,
            item: Some(item),
        }
    }

    fn reclaim(&self, mut item: T) {
        self.rented.fetch_sub(1, Ordering::Relaxed);
        item.clear();
        let mut idle = self.idle.lock().unwrap_or_else(|e| e.into_inner());
        if idle.len() < self.max_retained {
            idle.push(item);
        }
    }

    /// Items currently rented out.
    pub fn in_use(&self) -> usize {
        self.rented.load(Ordering::Relaxed)
    }

    pub fn idle(&self) -> usize {
        self.idle.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Items ever constructed by this pool.
    pub fn created(&self) -> usize {
        self.created.load(Ordering::Relaxed)
    }
}

impl<T: Clearable + Default> Default for ObjectPool<T> {
    fn default() -> Self {
        Self::new(32)
    }
}

/// Rental guard; dereferences to the pooled item.
pub struct Pooled<'a, T: Clearable + Default> {
    pool: &'a ObjectPool<T>,
    item: Option<T>,
}

impl<T: Clearable + Default> Deref for Pooled<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // Only `drop` takes the item out.
        match &self.item {
            Some(item) => item,
            None => unreachable!("pooled item accessed after release"),
        }
    }
}

impl<T: Clearable + Default> DerefMut for Pooled<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        match &mut self.item {
            Some(item) => item,
            None => unreachable!("pooled item accessed after release"),
        }
    }
}

impl<T: Clearable + Default> Drop for Pooled<'_, T> {
    fn drop(&mut self) {
        if let Some(item) = self.item.take() {
            self.pool.reclaim(item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rent_and_return_reuses_builder() {
        let pool = BuilderPool::new(4);
        {
            let mut builder = pool.rent();
            builder.append_text("leftover");
            assert_eq!(pool.in_use(), 1);
        }
        assert_eq!(pool.in_use(), 0);
        assert_eq!(pool.idle(), 1);

        let builder = pool.rent();
        assert!(builder.is_empty());
        assert_eq!(pool.created(), 1);
    }

    #[test]
    fn test_returned_on_panic_path() {
        let pool = BuilderPool::new(4);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _builder = pool.rent();
            panic!("handler blew up");
        }));
        assert!(result.is_err());
        assert_eq!(pool.in_use(), 0);
        assert_eq!(pool.idle(), 1);
    }

    #[test]
    fn test_retention_is_bounded() {
        let pool = BuilderPool::new(1);
        let a = pool.rent();
        let b = pool.rent();
        drop(a);
        drop(b);
        assert_eq!(pool.idle(), 1);
        assert_eq!(pool.created(), 2);
    }

    #[test]
    fn test_concurrent_rentals() {
        let pool = std::sync::Arc::new(BuilderPool::new(8));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let pool = pool.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        let mut builder = pool.rent();
                        builder.append_text(&i.to_string());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(pool.in_use(), 0);
        assert!(pool.idle() <= 8);
    }
}
