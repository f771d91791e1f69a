//! Strict, fixed-shape progress records.

use serde::{Deserialize, Serialize};

use super::status::ProgressStatus;

/// Display value used when a speed or ETA is unknown.
pub const UNKNOWN_DISPLAY: &str = "N/A";

/// Position of the current item inside a collection, as reported by the
/// fetch engine on a single tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionPosition {
    /// 1-based index of the current item.
    pub index: Option<u32>,
    /// Number of items in the collection.
    pub count: Option<u32>,
    /// Collection display name.
    pub name: Option<String>,
}

impl CollectionPosition {
    /// Whether the tick carried no collection fields at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.index.is_none() && self.count.is_none() && self.name.is_none()
    }
}

/// A raw tick after boundary normalization.
///
/// Every field has a defined value; downstream components never branch on
/// whether the fetch engine sent a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedFileProgress {
    /// Folded status.
    pub status: ProgressStatus,
    /// Bytes downloaded so far.
    pub downloaded_bytes: u64,
    /// Total bytes, `0` when unknown.
    pub total_bytes: u64,
    /// Percentage parsed from the engine's display string, if it parsed.
    pub percent_hint: Option<f64>,
    /// Current-item completion in `[0, 100]`, filled by the estimator.
    pub file_percent: f64,
    /// Speed in bytes per second, `0.0` when unknown.
    pub speed_bps: f64,
    /// Human-readable speed.
    pub speed_display: String,
    /// Remaining seconds for the current item, `0` when unknown.
    pub eta_seconds: u64,
    /// Human-readable remaining time.
    pub eta_display: String,
    /// Display percentage string as sent by the engine (sanitized).
    pub percent_display: String,
    /// Raw filename, empty when absent.
    pub filename: String,
    /// Collection fields carried by this tick.
    pub collection: CollectionPosition,
    /// Free-text message, empty when absent.
    pub message: String,
}

impl Default for NormalizedFileProgress {
    fn default() -> Self {
        Self {
            status: ProgressStatus::Downloading,
            downloaded_bytes: 0,
            total_bytes: 0,
            percent_hint: None,
            file_percent: 0.0,
            speed_bps: 0.0,
            speed_display: UNKNOWN_DISPLAY.to_string(),
            eta_seconds: 0,
            eta_display: UNKNOWN_DISPLAY.to_string(),
            percent_display: String::new(),
            filename: String::new(),
            collection: CollectionPosition::default(),
            message: String::new(),
        }
    }
}

/// Per-session collection bookkeeping.
///
/// Created cleared at session start and mutated only by the aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionState {
    /// Whether a non-empty collection has been declared.
    pub is_collection_mode: bool,
    /// Number of items in the collection.
    pub total_items: u32,
    /// Items fully finished so far.
    ///
    /// INVARIANT: `completed_items <= total_items`.
    pub completed_items: u32,
    /// 1-based index of the item currently in flight.
    pub current_item_index: u32,
    /// Collection display name.
    pub collection_name: String,
    /// Set once the last item has finished.
    pub session_complete: bool,
}

impl Default for CollectionState {
    fn default() -> Self {
        Self {
            is_collection_mode: false,
            total_items: 0,
            completed_items: 0,
            current_item_index: 1,
            collection_name: String::new(),
            session_complete: false,
        }
    }
}

impl CollectionState {
    /// Items not yet finished, including the one in flight.
    #[must_use]
    pub const fn remaining_items(&self) -> u32 {
        self.total_items.saturating_sub(self.completed_items)
    }
}
