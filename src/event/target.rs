use std::sync::Arc;

/// Handle identifying a listener registration on an [`EventTarget`].
pub type ListenerId = usize;

/// A boxed listener callback for events of type `E`.
pub type Listener<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Dispatch options supplied at registration time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ListenerOptions {
    /// Remove the listener automatically after its first delivery.
    pub once: bool,
}

impl ListenerOptions {
    /// Options for a listener that fires at most once.
    pub fn once() -> Self {
        Self { once: true }
    }
}

/// Anything that can register and remove named-event listeners.
///
/// Targets own their listener registry and hand back a [`ListenerId`] for
/// later removal. A target that cannot accept the registration is expected
/// to fail loudly at `add_event_listener` time; nothing in this crate
/// catches that.
pub trait EventTarget<E> {
    /// Register `listener` for events named `event`. The listener stays
    /// registered until removed (or after one delivery, with
    /// [`ListenerOptions::once`]).
    fn add_event_listener(
        &self,
        event: &str,
        listener: Listener<E>,
        options: ListenerOptions,
    ) -> ListenerId;

    /// Remove a registration. Unknown IDs are ignored, which makes
    /// removal idempotent.
    fn remove_event_listener(&self, id: ListenerId);
}
