use crate::runtime::Runtime;
use std::sync::{Arc, RwLock};

/// A cached derived value that recomputes lazily when a dependency changes.
///
/// Reading a clean memo returns the cached value; a write to any signal it
/// read marks it dirty, and the next read recomputes.
pub struct Memo<T> {
    cached: Arc<RwLock<Option<T>>>,
    compute: Arc<dyn Fn() -> T + Send + Sync>,
    id: usize,
}

// Not derived: handles are shared-state clones and need no `T: Clone`.
impl<T> Clone for Memo<T> {
    fn clone(&self) -> Self {
        Self {
            cached: Arc::clone(&self.cached),
            compute: Arc::clone(&self.compute),
            id: self.id,
        }
    }
}

impl<T: Clone + 'static> Memo<T> {
    /// Create a new memo; the first read runs the computation.
    pub fn new<F>(compute: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        let runtime = Runtime::current();
        let id = runtime.next_id();
        runtime.register_memo(id);

        Self {
            cached: Arc::new(RwLock::new(None)),
            compute: Arc::new(compute),
            id,
        }
    }

    /// Get the current value, recomputing if a dependency changed.
    pub fn get(&self) -> T {
        let runtime = Runtime::current();
        runtime.track_read(self.id);

        if runtime.is_memo_dirty(self.id) {
            // Recompute inside the observer context to re-record
            // dependencies.
            let value = runtime.with_observer(self.id, || (self.compute)());
            *self.cached.write().unwrap() = Some(value.clone());
            runtime.mark_memo_clean(self.id);
            value
        } else {
            self.cached.read().unwrap().as_ref().unwrap().clone()
        }
    }

    /// Borrow the current value without cloning, recomputing if needed.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let runtime = Runtime::current();
        runtime.track_read(self.id);

        if runtime.is_memo_dirty(self.id) {
            let value = runtime.with_observer(self.id, || (self.compute)());
            *self.cached.write().unwrap() = Some(value);
            runtime.mark_memo_clean(self.id);
        }
        let cached = self.cached.read().unwrap();
        f(cached.as_ref().unwrap())
    }
}
