use crate::event::{EventTarget, Listener, ListenerId, ListenerOptions};
use crate::storage::{StorageArea, StorageEvent, STORAGE_EVENT};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

struct Registration {
    context: usize,
    event: String,
    listener: Listener<StorageEvent>,
    options: ListenerOptions,
}

struct Shared {
    records: Mutex<HashMap<String, String>>,
    listeners: Mutex<HashMap<ListenerId, Registration>>,
    next_listener: AtomicUsize,
    next_context: AtomicUsize,
}

/// A shared in-memory storage area with per-context change events.
///
/// All handles cloned from one another read and write the same records.
/// [`handle`](MemoryStorage::handle) mints a handle representing a
/// separate execution context: a write made through one handle fires a
/// [`StorageEvent`] at listeners registered through every *other*
/// context's handle, never the writer's own. That is the delivery rule of
/// browser-style shared storage, and it is what makes this area a
/// faithful stand-in for one in tests and in-process multi-context setups.
///
/// # Examples
///
/// ```
/// use satchel::{MemoryStorage, StorageArea};
///
/// let local = MemoryStorage::new();
/// let remote = local.handle();
///
/// local.set_item("settings", r#"{"theme":"light"}"#);
/// assert_eq!(remote.get_item("settings").as_deref(), Some(r#"{"theme":"light"}"#));
/// ```
#[derive(Clone)]
pub struct MemoryStorage {
    shared: Arc<Shared>,
    context: usize,
}

impl MemoryStorage {
    /// Create a new empty storage area. The returned handle is context 0.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                records: Mutex::new(HashMap::new()),
                listeners: Mutex::new(HashMap::new()),
                next_listener: AtomicUsize::new(0),
                next_context: AtomicUsize::new(1),
            }),
            context: 0,
        }
    }

    /// A handle onto the same records representing a different execution
    /// context. Writes through this handle notify the original handle's
    /// listeners, and vice versa.
    pub fn handle(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            context: self.shared.next_context.fetch_add(1, Ordering::SeqCst),
        }
    }

    /// Number of records currently stored.
    pub fn len(&self) -> usize {
        self.shared.records.lock().unwrap().len()
    }

    /// Whether the area holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn dispatch(&self, event: StorageEvent) {
        // Snapshot matching listeners, then call outside the lock so a
        // listener may touch the area again.
        let targets: Vec<(ListenerId, Listener<StorageEvent>, bool)> = {
            let listeners = self.shared.listeners.lock().unwrap();
            listeners
                .iter()
                .filter(|(_, r)| r.context != self.context && r.event == STORAGE_EVENT)
                .map(|(id, r)| (*id, Arc::clone(&r.listener), r.options.once))
                .collect()
        };

        for (id, listener, once) in targets {
            listener(&event);
            if once {
                self.shared.listeners.lock().unwrap().remove(&id);
            }
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageArea for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.shared.records.lock().unwrap().get(key).cloned()
    }

    fn set_item(&self, key: &str, text: &str) {
        let old_value = {
            let mut records = self.shared.records.lock().unwrap();
            records.insert(key.to_owned(), text.to_owned())
        };
        self.dispatch(StorageEvent {
            key: key.to_owned(),
            new_value: Some(text.to_owned()),
            old_value,
        });
    }

    fn remove_item(&self, key: &str) {
        let old_value = self.shared.records.lock().unwrap().remove(key);
        if old_value.is_some() {
            self.dispatch(StorageEvent {
                key: key.to_owned(),
                new_value: None,
                old_value,
            });
        }
    }
}

impl EventTarget<StorageEvent> for MemoryStorage {
    fn add_event_listener(
        &self,
        event: &str,
        listener: Listener<StorageEvent>,
        options: ListenerOptions,
    ) -> ListenerId {
        let id = self.shared.next_listener.fetch_add(1, Ordering::SeqCst);
        self.shared.listeners.lock().unwrap().insert(
            id,
            Registration {
                context: self.context,
                event: event.to_owned(),
                listener,
                options,
            },
        );
        id
    }

    fn remove_event_listener(&self, id: ListenerId) {
        self.shared.listeners.lock().unwrap().remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::subscribe;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn records_are_shared_across_handles() {
        let a = MemoryStorage::new();
        let b = a.handle();

        a.set_item("k", "v");
        assert_eq!(b.get_item("k").as_deref(), Some("v"));

        b.remove_item("k");
        assert_eq!(a.get_item("k"), None);
        assert!(a.is_empty());
    }

    #[test]
    fn writer_does_not_hear_its_own_write() {
        let a = MemoryStorage::new();
        let b = a.handle();

        let heard_by_a = Arc::new(AtomicUsize::new(0));
        let heard_by_b = Arc::new(AtomicUsize::new(0));

        let _sub_a = subscribe(&a, STORAGE_EVENT, {
            let heard = Arc::clone(&heard_by_a);
            move |_: &StorageEvent| {
                heard.fetch_add(1, Ordering::SeqCst);
            }
        }, ListenerOptions::default());
        let _sub_b = subscribe(&b, STORAGE_EVENT, {
            let heard = Arc::clone(&heard_by_b);
            move |_: &StorageEvent| {
                heard.fetch_add(1, Ordering::SeqCst);
            }
        }, ListenerOptions::default());

        a.set_item("k", "1");
        assert_eq!(heard_by_a.load(Ordering::SeqCst), 0);
        assert_eq!(heard_by_b.load(Ordering::SeqCst), 1);

        b.set_item("k", "2");
        assert_eq!(heard_by_a.load(Ordering::SeqCst), 1);
        assert_eq!(heard_by_b.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn deletion_event_carries_no_new_value() {
        let a = MemoryStorage::new();
        let b = a.handle();

        let last: Arc<Mutex<Option<StorageEvent>>> = Arc::new(Mutex::new(None));
        let _sub = subscribe(&a, STORAGE_EVENT, {
            let last = Arc::clone(&last);
            move |e: &StorageEvent| {
                *last.lock().unwrap() = Some(e.clone());
            }
        }, ListenerOptions::default());

        b.set_item("k", "v");
        b.remove_item("k");

        let event = last.lock().unwrap().clone().unwrap();
        assert_eq!(event.key, "k");
        assert_eq!(event.new_value, None);
        assert_eq!(event.old_value.as_deref(), Some("v"));
    }

    #[test]
    fn removing_an_absent_key_fires_nothing() {
        let a = MemoryStorage::new();
        let b = a.handle();

        let heard = Arc::new(AtomicUsize::new(0));
        let _sub = subscribe(&a, STORAGE_EVENT, {
            let heard = Arc::clone(&heard);
            move |_: &StorageEvent| {
                heard.fetch_add(1, Ordering::SeqCst);
            }
        }, ListenerOptions::default());

        b.remove_item("missing");
        assert_eq!(heard.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn once_listener_fires_a_single_time() {
        let a = MemoryStorage::new();
        let b = a.handle();

        let heard = Arc::new(AtomicUsize::new(0));
        let sub = subscribe(&a, STORAGE_EVENT, {
            let heard = Arc::clone(&heard);
            move |_: &StorageEvent| {
                heard.fetch_add(1, Ordering::SeqCst);
            }
        }, ListenerOptions::once());

        b.set_item("k", "1");
        b.set_item("k", "2");
        assert_eq!(heard.load(Ordering::SeqCst), 1);

        // Already removed by the once delivery; dropping is a no-op.
        drop(sub);
    }
}
