use crate::event::{EventTarget, ListenerOptions};
use std::sync::Arc;

/// A scoped listener registration.
///
/// Dropping the `Subscription` removes the listener from its target, so
/// tying the guard to an owning scope guarantees the listener cannot
/// outlive it. Removal happens exactly once no matter how the guard goes
/// away.
pub struct Subscription {
    remove: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Remove the listener now instead of at drop time.
    pub fn unsubscribe(mut self) {
        if let Some(remove) = self.remove.take() {
            remove();
        }
    }

    /// Leak the registration: the listener stays attached for the
    /// lifetime of the target.
    pub fn forget(mut self) {
        self.remove = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(remove) = self.remove.take() {
            remove();
        }
    }
}

/// Attach `listener` to `target` for events named `event`, returning a
/// guard that detaches it when dropped.
///
/// The listener is registered immediately; any failure the target raises
/// at registration propagates to the caller uncaught.
///
/// # Examples
///
/// ```
/// use satchel::{subscribe, ListenerOptions, MemoryStorage, StorageArea, STORAGE_EVENT};
/// use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
///
/// let local = MemoryStorage::new();
/// let remote = local.handle();
///
/// let seen = Arc::new(AtomicUsize::new(0));
/// let sub = subscribe(&local, STORAGE_EVENT, {
///     let seen = Arc::clone(&seen);
///     move |_event| { seen.fetch_add(1, Ordering::SeqCst); }
/// }, ListenerOptions::default());
///
/// remote.set_item("theme", "\"dark\"");
/// assert_eq!(seen.load(Ordering::SeqCst), 1);
///
/// drop(sub);
/// remote.set_item("theme", "\"light\"");
/// assert_eq!(seen.load(Ordering::SeqCst), 1);
/// ```
pub fn subscribe<E, T, F>(
    target: &T,
    event: &str,
    listener: F,
    options: ListenerOptions,
) -> Subscription
where
    T: EventTarget<E> + Clone + Send + 'static,
    F: Fn(&E) + Send + Sync + 'static,
{
    let id = target.add_event_listener(event, Arc::new(listener), options);
    let target = target.clone();

    Subscription {
        remove: Some(Box::new(move || target.remove_event_listener(id))),
    }
}
