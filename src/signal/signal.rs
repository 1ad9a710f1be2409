use crate::runtime::Runtime;
use crate::signal::{project, Projection};
use std::sync::{Arc, RwLock};

/// A reactive value: a mutable container that notifies its observers when
/// it changes.
///
/// Reads made inside an [`Effect`](crate::Effect) or [`Memo`](crate::Memo)
/// are tracked, so a later [`set`](Signal::set) or
/// [`update`](Signal::update) re-runs (or invalidates) exactly the
/// observers that depend on this signal.
///
/// # Examples
///
/// ```
/// use satchel::Signal;
///
/// let volume = Signal::new(50);
/// assert_eq!(volume.get(), 50);
///
/// volume.set(80);
/// assert_eq!(volume.get(), 80);
///
/// volume.update(|v| *v -= 10);
/// assert_eq!(volume.get(), 70);
/// ```
pub struct Signal<T> {
    value: Arc<RwLock<T>>,
    id: usize,
}

// Not derived: handles are shared-state clones and need no `T: Clone`.
impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            id: self.id,
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Signal<T> {
    /// Create a new signal holding the given initial value.
    pub fn new(initial: T) -> Self {
        let runtime = Runtime::current();
        let id = runtime.next_id();

        Self {
            value: Arc::new(RwLock::new(initial)),
            id,
        }
    }

    /// Get a clone of the current value (tracked read).
    pub fn get(&self) -> T {
        let runtime = Runtime::current();
        runtime.track_read(self.id);
        self.value.read().unwrap().clone()
    }

    /// Borrow the current value without cloning (tracked read).
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let runtime = Runtime::current();
        runtime.track_read(self.id);
        let value = self.value.read().unwrap();
        f(&value)
    }

    /// Replace the value and notify observers.
    pub fn set(&self, new_value: T) {
        *self.value.write().unwrap() = new_value;
        let runtime = Runtime::current();
        runtime.notify_observers(self.id);
    }

    /// Mutate the value in place and notify observers.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let mut value = self.value.write().unwrap();
        f(&mut value);
        // Release the write lock before notifying
        drop(value);
        let runtime = Runtime::current();
        runtime.notify_observers(self.id);
    }

    /// Replace the value without running effects.
    ///
    /// Dependent memos are still invalidated, so derived views recompute
    /// on their next read, but effect observers do not fire. This is how
    /// a value arriving from another execution context is applied without
    /// re-triggering the write-back that produced it.
    pub fn set_silent(&self, new_value: T) {
        *self.value.write().unwrap() = new_value;
        let runtime = Runtime::current();
        runtime.invalidate(self.id);
    }

    /// Present this signal through a bidirectional transform.
    ///
    /// Shorthand for [`project(self, to, from)`](project).
    pub fn project<U, To, From>(&self, to: To, from: From) -> Projection<T, U>
    where
        U: Clone + Send + Sync + 'static,
        To: Fn(&T) -> U + Send + Sync + 'static,
        From: Fn(U) -> T + Send + Sync + 'static,
    {
        project(self, to, from)
    }

    /// This signal's unique ID within its runtime.
    pub fn id(&self) -> usize {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Runtime;
    use crate::Effect;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn get_set_update() {
        let signal = Signal::new(1);
        assert_eq!(signal.get(), 1);

        signal.set(2);
        assert_eq!(signal.get(), 2);

        signal.update(|n| *n *= 10);
        assert_eq!(signal.get(), 20);
    }

    #[test]
    fn with_borrows_without_cloning() {
        let signal = Signal::new(String::from("hello"));
        let len = signal.with(|s| s.len());
        assert_eq!(len, 5);
    }

    #[test]
    fn set_silent_skips_effects() {
        Runtime::scope(|| {
            let signal = Signal::new(0);
            let runs = Arc::new(AtomicUsize::new(0));

            let _effect = Effect::new({
                let signal = signal.clone();
                let runs = Arc::clone(&runs);
                move || {
                    let _ = signal.get();
                    runs.fetch_add(1, Ordering::SeqCst);
                }
            });
            assert_eq!(runs.load(Ordering::SeqCst), 1);

            signal.set(1);
            assert_eq!(runs.load(Ordering::SeqCst), 2);

            signal.set_silent(2);
            assert_eq!(runs.load(Ordering::SeqCst), 2);
            assert_eq!(signal.get(), 2);
        });
    }
}
