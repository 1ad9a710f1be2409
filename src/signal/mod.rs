//! Fine-grained reactive primitives.
//!
//! - [`Signal`]: reactive values that notify observers on change
//! - [`Memo`]: cached derived values
//! - [`Effect`]: side effects that re-run when dependencies change
//! - [`Projection`]: writable views through a bidirectional transform

mod effect;
mod memo;
mod projection;
mod signal;

pub use effect::Effect;
pub use memo::Memo;
pub use projection::{project, Projection};
pub use signal::Signal;
