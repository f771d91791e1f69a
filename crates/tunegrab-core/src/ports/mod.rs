//! Port definitions (trait abstractions) for external boundaries.
//!
//! The progress engine depends only on these traits; concrete transports
//! live in adapter crates.

pub mod progress_emitter;

pub use progress_emitter::{FnProgressEmitter, NoopProgressEmitter, ProgressEmitterPort};
