//! Durable reactive values.
//!
//! [`PersistentSignal`] binds a [`Signal`](crate::Signal) to a record in a
//! [`StorageArea`](crate::StorageArea) and keeps execution contexts
//! sharing that storage converged, last-write-wins.

mod persistent;

pub use persistent::PersistentSignal;
