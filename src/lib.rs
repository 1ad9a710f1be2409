//! # Satchel
//!
//! Durable reactive state: signals persisted to key-value storage, kept in
//! sync across execution contexts sharing that storage.
//!
//! ## Reactive primitives
//!
//! - [`Signal<T>`](Signal) - reactive values that notify dependents when
//!   changed
//! - [`Memo<T>`](Memo) - cached derived values
//! - [`Effect`] - side effects that re-run when dependencies change
//! - [`Projection<F, T>`](Projection) - writable views through a
//!   bidirectional transform pair
//!
//! ## Persistence
//!
//! [`PersistentSignal<T>`](PersistentSignal) binds a signal to a record in
//! a [`StorageArea`]: it loads on open (backfilling missing fields from a
//! default template), writes the full JSON record on every mutation, and
//! applies changes written by other contexts without echoing them back.
//! Conflicts resolve last-write-wins at whole-value granularity.
//!
//! ## Events
//!
//! [`subscribe`] attaches a listener to any [`EventTarget`] and returns a
//! [`Subscription`] guard that detaches it on drop, so listeners cannot
//! outlive the scope that owns them.

pub mod error;
pub mod event;
pub mod runtime;
pub mod signal;
pub mod storage;
pub mod store;

// Re-export main types for convenience
pub use error::{Result, StoreError};
pub use event::{subscribe, EventTarget, Listener, ListenerId, ListenerOptions, Subscription};
pub use signal::{project, Effect, Memo, Projection, Signal};
pub use storage::{MemoryStorage, StorageArea, StorageEvent, STORAGE_EVENT};
pub use store::PersistentSignal;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_works() {
        // Basic smoke test
        let signal = Signal::new(0);
        assert_eq!(signal.get(), 0);
        signal.set(42);
        assert_eq!(signal.get(), 42);
    }
}
