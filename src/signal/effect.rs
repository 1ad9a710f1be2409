use crate::runtime::{Runtime, RuntimeCore};
use std::sync::{Arc, RwLock, Weak};

/// A side effect that re-runs when the signals it reads change.
///
/// The effect function runs immediately on creation to establish its
/// dependencies, then again whenever any of them is written through
/// [`Signal::set`](crate::Signal::set) or
/// [`Signal::update`](crate::Signal::update). Dropping the `Effect`
/// deregisters it.
///
/// # Examples
///
/// ```
/// use satchel::{Effect, Signal};
/// use std::sync::{Arc, atomic::{AtomicI32, Ordering}};
///
/// let signal = Signal::new(5);
/// let last_seen = Arc::new(AtomicI32::new(0));
///
/// let _effect = Effect::new({
///     let signal = signal.clone();
///     let last_seen = Arc::clone(&last_seen);
///     move || last_seen.store(signal.get(), Ordering::SeqCst)
/// });
/// assert_eq!(last_seen.load(Ordering::SeqCst), 5);
///
/// signal.set(10);
/// assert_eq!(last_seen.load(Ordering::SeqCst), 10);
/// ```
pub struct Effect {
    id: usize,
    runtime: Weak<RwLock<RuntimeCore>>,
}

impl Effect {
    /// Create a new effect and run it once to record its dependencies.
    pub fn new<F>(effect: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let runtime = Runtime::current();
        let id = runtime.next_id();
        let effect = Arc::new(effect);
        let effect_clone = Arc::clone(&effect);

        runtime.create_observer(id, move || {
            effect_clone();
        });

        // First run happens inside the observer context so every signal
        // read is recorded as a dependency.
        runtime.with_observer(id, || {
            effect();
        });

        Self {
            id,
            runtime: Arc::downgrade(&runtime.core()),
        }
    }
}

impl Drop for Effect {
    fn drop(&mut self) {
        if let Some(core) = self.runtime.upgrade() {
            if let Ok(mut core) = core.write() {
                core.remove_observer(self.id);
            }
        }
    }
}
