//! Progress emitter port.
//!
//! This port abstracts the transport boundary, allowing the progress engine
//! to hand off finished events without knowing how they reach the host
//! (NDJSON on stdout, a channel, a test recorder).

use std::sync::Arc;

use crate::progress::OutwardProgressEvent;

/// Port for delivering outward progress events.
///
/// Implementations must not block and must not panic: the call happens
/// inside the fetch engine's progress callback.
///
/// # Example
///
/// ```ignore
/// fn on_tick(emitter: &dyn ProgressEmitterPort, event: OutwardProgressEvent) {
///     emitter.emit(event);
/// }
/// ```
pub trait ProgressEmitterPort: Send + Sync {
    /// Deliver one event to the host.
    fn emit(&self, event: OutwardProgressEvent);

    /// Clone this emitter into a boxed trait object.
    ///
    /// This enables cloning of `Arc<dyn ProgressEmitterPort>` without
    /// requiring the underlying type to implement Clone.
    fn clone_box(&self) -> Box<dyn ProgressEmitterPort>;
}

/// A no-op emitter for tests and hosts that only consume return values.
#[derive(Debug, Clone, Default)]
pub struct NoopProgressEmitter;

impl NoopProgressEmitter {
    /// Create a new no-op emitter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ProgressEmitterPort for NoopProgressEmitter {
    fn emit(&self, _event: OutwardProgressEvent) {
        // Intentionally do nothing
    }

    fn clone_box(&self) -> Box<dyn ProgressEmitterPort> {
        Box::new(self.clone())
    }
}

/// Adapter that forwards every event to a closure.
///
/// Handy for hosts that already own a channel sender.
#[derive(Clone)]
pub struct FnProgressEmitter {
    inner: Arc<dyn Fn(OutwardProgressEvent) + Send + Sync>,
}

impl FnProgressEmitter {
    /// Wrap a closure.
    pub fn new(f: impl Fn(OutwardProgressEvent) + Send + Sync + 'static) -> Self {
        Self { inner: Arc::new(f) }
    }
}

impl std::fmt::Debug for FnProgressEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnProgressEmitter").finish_non_exhaustive()
    }
}

impl ProgressEmitterPort for FnProgressEmitter {
    fn emit(&self, event: OutwardProgressEvent) {
        (self.inner)(event);
    }

    fn clone_box(&self) -> Box<dyn ProgressEmitterPort> {
        Box::new(self.clone())
    }
}
