//! Session facade.
//!
//! [`ProgressSession`] is what a download orchestrator talks to: reset it,
//! optionally declare a collection, then feed it every raw tick from the
//! fetch engine's callback. Nothing escapes [`ProgressSession::observe_raw_event`];
//! failures and panics turn into an `error` event.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, trace};
use tunegrab_core::{
    CollectionState, OutwardProgressEvent, ProgressEmitterPort, ProgressError, RawProgressEvent,
    Settings,
};

use crate::emit::{AssemblyOptions, ProgressEventEmitter, fallback_event};
use crate::lifecycle::ProgressStateLifecycle;
use crate::normalize::normalize;
use crate::throttle::ProgressThrottle;

/// Tunables for one session, resolved from [`Settings`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Minimum interval between plain `downloading` deliveries.
    pub throttle: Duration,
    /// Event assembly switches.
    pub assembly: AssemblyOptions,
    /// Name used when the engine reports a collection without one.
    pub fallback_collection_name: String,
}

impl SessionOptions {
    /// Resolve options from settings, applying defaults for unset fields.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            throttle: Duration::from_millis(settings.effective_throttle_ms()),
            assembly: AssemblyOptions {
                collection_eta: settings.effective_collection_eta(),
                basename_filenames: settings.effective_basename_filenames(),
            },
            fallback_collection_name: settings
                .fallback_collection_name
                .clone()
                .unwrap_or_default(),
        }
    }

    /// Options with throttling disabled regardless of settings.
    #[must_use]
    pub fn unthrottled() -> Self {
        Self {
            throttle: Duration::ZERO,
            ..Self::default()
        }
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::with_defaults())
    }
}

/// Progress state and delivery for one download session.
///
/// One instance per concurrently running download; never share one between
/// two downloads.
#[derive(Debug)]
pub struct ProgressSession {
    lifecycle: ProgressStateLifecycle,
    emitter: ProgressEventEmitter,
    throttle: ProgressThrottle,
    events_observed: u64,
}

impl ProgressSession {
    /// Create a session with default options.
    pub fn new(port: Arc<dyn ProgressEmitterPort>) -> Self {
        Self::with_options(port, SessionOptions::default())
    }

    /// Create a session with explicit options.
    pub fn with_options(port: Arc<dyn ProgressEmitterPort>, options: SessionOptions) -> Self {
        Self {
            lifecycle: ProgressStateLifecycle::new(options.fallback_collection_name),
            emitter: ProgressEventEmitter::new(port, options.assembly),
            throttle: ProgressThrottle::new(options.throttle),
            events_observed: 0,
        }
    }

    /// Clear all state. Call once per download, before the fetch engine starts.
    pub fn reset_session(&mut self) {
        if self.events_observed > 0 {
            info!(events = self.events_observed, "Resetting progress session");
        }
        self.lifecycle.reset();
        self.throttle.reset();
        self.events_observed = 0;
    }

    /// Declare that the target is a collection of `total_items` items.
    ///
    /// Ignored (with a warning) once an item has finished.
    pub fn declare_collection(&mut self, total_items: u32, name: &str) {
        self.lifecycle.declare_collection(total_items, name);
    }

    /// Current collection bookkeeping.
    #[must_use]
    pub const fn state(&self) -> &CollectionState {
        self.lifecycle.state()
    }

    /// Number of raw ticks observed since the last reset.
    #[must_use]
    pub const fn events_observed(&self) -> u64 {
        self.events_observed
    }

    /// Process one raw tick from the fetch engine.
    ///
    /// Always returns the assembled event; delivery to the port is subject to
    /// throttling. Never panics.
    pub fn observe_raw_event(&mut self, raw: &RawProgressEvent) -> OutwardProgressEvent {
        self.events_observed += 1;

        let processed = panic::catch_unwind(AssertUnwindSafe(|| self.process(raw)));
        let (event, item_completed) = processed.unwrap_or_else(|payload| {
            let err = ProgressError::Panicked(panic_message(payload.as_ref()));
            error!(error = %err, "Progress pipeline panicked");
            (fallback_event(&err), false)
        });

        if self.throttle.admit(&event, item_completed) {
            self.emitter.deliver(event.clone());
        } else {
            trace!(percentage = event.percentage, "Progress tick throttled");
        }
        event
    }

    fn process(&mut self, raw: &RawProgressEvent) -> (OutwardProgressEvent, bool) {
        let mut progress = normalize(raw);
        let outcome = self.lifecycle.advance(&mut progress);
        let collection_eta = self.lifecycle.collection_eta(&progress);

        let event = self.emitter.assemble_or_fallback(
            &progress,
            &outcome,
            self.lifecycle.state(),
            collection_eta,
        );
        (event, outcome.item_completed)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        return (*s).to_string();
    }
    if let Some(s) = payload.downcast_ref::<String>() {
        return s.clone();
    }
    "unknown panic payload".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tunegrab_core::{FnProgressEmitter, NoopProgressEmitter, ProgressStatus};

    fn recording() -> (Arc<dyn ProgressEmitterPort>, Arc<Mutex<Vec<OutwardProgressEvent>>>) {
        let captured = Arc::new(Mutex::new(Vec::new()));
        let sink = captured.clone();
        let port = FnProgressEmitter::new(move |event| sink.lock().unwrap().push(event));
        (Arc::new(port), captured)
    }

    #[test]
    fn test_options_from_settings() {
        let settings = Settings {
            throttle_ms: Some(0),
            collection_eta: Some(false),
            fallback_collection_name: Some("Queue".to_string()),
            ..Settings::default()
        };
        let options = SessionOptions::from_settings(&settings);

        assert_eq!(options.throttle, Duration::ZERO);
        assert!(!options.assembly.collection_eta);
        assert_eq!(options.fallback_collection_name, "Queue");
    }

    #[test]
    fn test_default_session_emits_every_tick() {
        let (port, captured) = recording();
        let mut session = ProgressSession::new(port);
        session.reset_session();

        for downloaded in [10, 20, 30, 40, 50] {
            session.observe_raw_event(
                &RawProgressEvent::with_status("downloading").bytes(downloaded, 100),
            );
        }

        let events = captured.lock().unwrap();
        assert_eq!(events.len(), 5);
        assert!((events[4].percentage - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_returns_event_even_when_throttled() {
        let (port, captured) = recording();
        let options = SessionOptions {
            throttle: Duration::from_secs(60),
            ..SessionOptions::default()
        };
        let mut session = ProgressSession::with_options(port, options);

        let tick = RawProgressEvent::with_status("downloading").bytes(10, 100);
        session.observe_raw_event(&tick);
        let second = session.observe_raw_event(&tick.clone().bytes(20, 100));

        assert!((second.percentage - 20.0).abs() < f64::EPSILON);
        assert_eq!(captured.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_finished_is_always_delivered() {
        let (port, captured) = recording();
        let options = SessionOptions {
            throttle: Duration::from_secs(60),
            ..SessionOptions::default()
        };
        let mut session = ProgressSession::with_options(port, options);

        session.observe_raw_event(&RawProgressEvent::with_status("downloading").bytes(10, 100));
        session.observe_raw_event(&RawProgressEvent::with_status("downloading").bytes(20, 100));
        session.observe_raw_event(&RawProgressEvent::with_status("finished"));

        let events = captured.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].status, ProgressStatus::Finished);
    }

    #[test]
    fn test_reset_session_clears_collection() {
        let mut session = ProgressSession::new(Arc::new(NoopProgressEmitter::new()));
        session.declare_collection(3, "Mix");
        session.observe_raw_event(&RawProgressEvent::with_status("downloading"));
        assert_eq!(session.events_observed(), 1);

        session.reset_session();
        assert!(!session.state().is_collection_mode);
        assert_eq!(session.events_observed(), 0);
    }

    #[test]
    fn test_panic_message_payloads() {
        let boxed: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(boxed.as_ref()), "static");

        let boxed: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(boxed.as_ref()), "owned");

        let boxed: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(boxed.as_ref()), "unknown panic payload");
    }
}
