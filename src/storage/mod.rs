//! The durable storage protocol and an in-memory multi-context area.
//!
//! [`StorageArea`] is the key-value text-store contract consumed by
//! [`PersistentSignal`](crate::PersistentSignal); [`MemoryStorage`] is a
//! shared in-process implementation whose change events follow the
//! everyone-but-the-writer delivery rule.

mod area;
mod memory;

pub use area::{StorageArea, StorageEvent, STORAGE_EVENT};
pub use memory::MemoryStorage;
