//! Collection progress aggregation.
//!
//! A pure state machine over [`CollectionState`]: it folds the current item's
//! completion into a whole-collection percentage and advances the item
//! counters exactly once per finished item. No I/O or locking happens here.

use tracing::{debug, warn};
use tunegrab_core::{CollectionState, NormalizedFileProgress, ProgressStatus};

/// Identity of the item a `finished` tick refers to.
///
/// Two consecutive `finished` ticks with the same identity count once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemKey {
    filename: String,
    index: Option<u32>,
}

impl ItemKey {
    /// Build a key from explicit parts.
    pub fn new(filename: impl Into<String>, index: Option<u32>) -> Self {
        Self {
            filename: filename.into(),
            index,
        }
    }

    /// Whether the tick carried neither a filename nor a collection index.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.filename.is_empty() && self.index.is_none()
    }

    /// Key of the item a normalized tick belongs to.
    #[must_use]
    pub fn of(progress: &NormalizedFileProgress) -> Self {
        Self::new(progress.filename.clone(), progress.collection.index)
    }
}

/// Result of folding one tick into the collection state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateOutcome {
    /// Session-level status (a mid-collection `finished` becomes
    /// `downloading`).
    pub status: ProgressStatus,
    /// Completion of the current item.
    pub file_percent: f64,
    /// Completion of the collection; `None` outside collection mode.
    pub collection_percent: Option<f64>,
    /// Whether this tick moved the collection on to its next item.
    pub item_completed: bool,
}

impl AggregateOutcome {
    /// The percentage the UI should show first.
    #[must_use]
    pub fn overall(&self) -> f64 {
        self.collection_percent.unwrap_or(self.file_percent)
    }
}

/// Tracks collection state for one session.
#[derive(Debug, Default)]
pub struct CollectionProgressAggregator {
    state: CollectionState,
    /// Identity of the last counted `finished` tick.
    ///
    /// INVARIANT: cleared by every non-`finished` tick, so only back-to-back
    /// repeats are suppressed.
    last_finished: Option<ItemKey>,
    /// Whether any item transition has been applied this session.
    transitioned: bool,
}

impl CollectionProgressAggregator {
    /// Create an aggregator in the cleared, non-collection state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current collection bookkeeping.
    #[must_use]
    pub const fn state(&self) -> &CollectionState {
        &self.state
    }

    /// Clear everything back to single-item mode.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Declare the collection size and name.
    ///
    /// Accepted until the first item transition; a repeat declaration before
    /// then replaces the earlier one. `total_items == 0` leaves collection
    /// mode off. Returns whether the declaration was applied.
    pub fn set_collection_info(&mut self, total_items: u32, collection_name: &str) -> bool {
        if self.transitioned {
            warn!(
                total_items,
                collection_name, "Collection declared after an item finished, ignoring"
            );
            return false;
        }

        self.state = CollectionState {
            is_collection_mode: total_items > 0,
            total_items,
            completed_items: 0,
            current_item_index: 1,
            collection_name: collection_name.to_string(),
            session_complete: false,
        };
        self.last_finished = None;
        true
    }

    /// Weighted collection completion for the item in flight.
    ///
    /// `None` outside collection mode.
    #[must_use]
    pub fn collection_percent(&self, file_percent: f64) -> Option<f64> {
        if !self.in_collection() {
            return None;
        }
        if self.state.session_complete {
            return Some(100.0);
        }
        let completed = f64::from(self.state.completed_items);
        let total = f64::from(self.state.total_items);
        let file = file_percent.clamp(0.0, 100.0);
        Some((100.0 * (completed + file / 100.0) / total).clamp(0.0, 100.0))
    }

    /// Fold one tick into the collection state.
    ///
    /// `reported_index` is the engine's own 1-based position for the tick;
    /// when it runs ahead of ours the items in between were skipped by the
    /// engine and are counted as done.
    pub fn observe(
        &mut self,
        file_percent: f64,
        status: ProgressStatus,
        item: &ItemKey,
    ) -> AggregateOutcome {
        if !self.in_collection() {
            return AggregateOutcome {
                status,
                file_percent,
                collection_percent: None,
                item_completed: false,
            };
        }

        self.sync_position(item.index);

        if status != ProgressStatus::Finished {
            self.last_finished = None;
            return AggregateOutcome {
                status,
                file_percent,
                collection_percent: self.collection_percent(file_percent),
                item_completed: false,
            };
        }

        if self.last_finished.as_ref() == Some(item) {
            if item.is_anonymous() {
                warn!(
                    completed = self.state.completed_items,
                    total = self.state.total_items,
                    "Repeated finished tick without filename or index, not counted"
                );
            } else {
                debug!(?item, "Duplicate finished tick, not counted");
            }
            return self.settled_outcome();
        }
        self.last_finished = Some(item.clone());

        self.complete_current_item()
    }

    /// Seconds until the whole collection is done.
    ///
    /// The current item's remaining time plus every later item at the current
    /// item's projected full duration, `eta / (1 - f)`, not its remaining
    /// `eta`. `None` outside collection mode or while the current ETA is
    /// unknown.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub fn estimate_collection_eta(&self, eta_seconds: u64, file_percent: f64) -> Option<u64> {
        if !self.in_collection() {
            return None;
        }
        if self.state.session_complete {
            return Some(0);
        }
        if eta_seconds == 0 {
            return None;
        }

        let later_items = self.state.remaining_items().saturating_sub(1);
        let fraction = (file_percent / 100.0).clamp(0.0, 1.0);
        let per_item = if fraction > 0.0 && fraction < 1.0 {
            eta_seconds as f64 / (1.0 - fraction)
        } else {
            eta_seconds as f64
        };

        Some((eta_seconds as f64 + f64::from(later_items) * per_item).round() as u64)
    }

    const fn in_collection(&self) -> bool {
        self.state.is_collection_mode && self.state.total_items > 0
    }

    fn sync_position(&mut self, reported_index: Option<u32>) {
        let Some(index) = reported_index else {
            return;
        };
        let index = index.min(self.state.total_items);
        if self.state.session_complete || index <= self.state.current_item_index {
            return;
        }

        debug!(
            from = self.state.current_item_index,
            to = index,
            "Engine skipped ahead, counting skipped items as done"
        );
        self.state.completed_items = index - 1;
        self.state.current_item_index = index;
        self.last_finished = None;
        self.transitioned = true;
    }

    fn complete_current_item(&mut self) -> AggregateOutcome {
        let total = self.state.total_items;
        self.transitioned = true;

        if self.state.session_complete {
            warn!(total, "Finished tick after the last item, ignoring");
            return self.settled_outcome();
        }

        if self.state.completed_items + 1 < total {
            self.state.completed_items += 1;
            self.state.current_item_index += 1;
            debug!(
                completed = self.state.completed_items,
                total, "Collection item finished"
            );
            return AggregateOutcome {
                status: ProgressStatus::Downloading,
                file_percent: 100.0,
                collection_percent: self.collection_percent(0.0),
                item_completed: true,
            };
        }

        self.state.session_complete = true;
        debug!(total, "Last collection item finished");
        AggregateOutcome {
            status: ProgressStatus::Finished,
            file_percent: 100.0,
            collection_percent: Some(100.0),
            item_completed: true,
        }
    }

    /// Outcome for a `finished` tick that changes nothing.
    fn settled_outcome(&self) -> AggregateOutcome {
        let status = if self.state.session_complete {
            ProgressStatus::Finished
        } else {
            ProgressStatus::Downloading
        };
        AggregateOutcome {
            status,
            file_percent: 100.0,
            collection_percent: self.collection_percent(0.0),
            item_completed: false,
        }
    }
}
