//! Runtime support for reactive primitives.
//!
//! Tracks which observers read which signals, delivers notifications, and
//! manages scoped execution contexts.

mod context;

pub use context::Runtime;
pub(crate) use context::RuntimeCore;
