//! Generic event-listener protocol with scoped cleanup.
//!
//! [`EventTarget`] is the listener-registry contract; [`subscribe`]
//! attaches a callback and returns a [`Subscription`] guard whose drop
//! detaches it again.

mod subscription;
mod target;

pub use subscription::{subscribe, Subscription};
pub use target::{EventTarget, Listener, ListenerId, ListenerOptions};
