//! Session-scoped ownership of the progress state.
//!
//! [`ProgressStateLifecycle`] is the only writer of the collection state for
//! one session. Every mutation takes `&mut self`; hosts that share a session
//! across threads wrap it in their own lock.

use tracing::{debug, info};
use tunegrab_core::{CollectionState, NormalizedFileProgress, ProgressStatus};

use crate::aggregate::{AggregateOutcome, CollectionProgressAggregator, ItemKey};
use crate::estimate::FileProgressEstimator;

/// Owns the estimator, the aggregator and the session-wide monotonic guard.
#[derive(Debug)]
pub struct ProgressStateLifecycle {
    estimator: FileProgressEstimator,
    aggregator: CollectionProgressAggregator,
    /// Highest overall percentage reported this session.
    high_water: f64,
    /// Name used when the engine announces a collection without one.
    fallback_collection_name: String,
}

impl Default for ProgressStateLifecycle {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl ProgressStateLifecycle {
    /// Create a cleared lifecycle.
    pub fn new(fallback_collection_name: impl Into<String>) -> Self {
        Self {
            estimator: FileProgressEstimator::new(),
            aggregator: CollectionProgressAggregator::new(),
            high_water: 0.0,
            fallback_collection_name: fallback_collection_name.into(),
        }
    }

    /// Clear all session state. Call once before the fetch engine starts.
    pub fn reset(&mut self) {
        self.estimator.reset();
        self.aggregator.reset();
        self.high_water = 0.0;
    }

    /// Declare the collection. Returns whether it was applied.
    pub fn declare_collection(&mut self, total_items: u32, name: &str) -> bool {
        let applied = self.aggregator.set_collection_info(total_items, name);
        if applied && total_items > 0 {
            info!(total_items, name, "Collection declared");
        }
        applied
    }

    /// Read-only view of the collection state.
    #[must_use]
    pub const fn state(&self) -> &CollectionState {
        self.aggregator.state()
    }

    /// Run one normalized tick through estimation and aggregation.
    ///
    /// Fills `progress.file_percent` and returns the guarded outcome: outside
    /// an `error` tick the overall percentage never drops below what this
    /// session already reported.
    pub fn advance(&mut self, progress: &mut NormalizedFileProgress) -> AggregateOutcome {
        self.discover_collection(progress);

        let file_percent = self.estimator.estimate(progress);
        let mut outcome = self
            .aggregator
            .observe(file_percent, progress.status, &ItemKey::of(progress));

        if outcome.status != ProgressStatus::Error {
            let guarded = outcome.overall().max(self.high_water);
            self.high_water = guarded;
            match outcome.collection_percent.as_mut() {
                Some(collection) => *collection = guarded,
                None => outcome.file_percent = outcome.file_percent.max(guarded),
            }
        }

        outcome
    }

    /// Whole-collection ETA for the current tick.
    #[must_use]
    pub fn collection_eta(&self, progress: &NormalizedFileProgress) -> Option<u64> {
        self.aggregator
            .estimate_collection_eta(progress.eta_seconds, progress.file_percent)
    }

    /// Enter collection mode from a tick that carries a collection count.
    fn discover_collection(&mut self, progress: &NormalizedFileProgress) {
        if self.state().is_collection_mode {
            return;
        }
        let Some(count) = progress.collection.count else {
            return;
        };

        let name = progress
            .collection
            .name
            .as_deref()
            .unwrap_or(&self.fallback_collection_name)
            .to_string();
        debug!(count, name = %name, "Collection discovered from engine tick");
        self.declare_collection(count, &name);
    }
}
