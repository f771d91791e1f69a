//! Current-item completion.
//!
//! The engine's percentage string wins when it parses; otherwise the byte
//! ratio is used; with neither the item sits at 0. A per-item watermark keeps
//! the value from moving backwards while the same file is in flight.

use tunegrab_core::{NormalizedFileProgress, ProgressStatus};

/// Completion percentage from the raw inputs, clamped to `[0, 100]`.
///
/// Pure; the watermark in [`FileProgressEstimator`] is applied on top.
#[allow(clippy::cast_precision_loss)]
pub fn compute_file_percent(percent_hint: Option<f64>, downloaded: u64, total: u64) -> f64 {
    if let Some(hint) = percent_hint.filter(|p| p.is_finite()) {
        return hint.clamp(0.0, 100.0);
    }
    if total > 0 {
        return (100.0 * downloaded as f64 / total as f64).clamp(0.0, 100.0);
    }
    0.0
}

#[derive(Debug, Clone, PartialEq)]
struct Watermark {
    filename: String,
    highest: f64,
}

/// Stateful estimator with a per-item high watermark.
///
/// The watermark belongs to one file: it is dropped when the filename changes
/// and after a `finished` tick, so the next item starts from scratch.
#[derive(Debug, Clone, Default)]
pub struct FileProgressEstimator {
    watermark: Option<Watermark>,
}

impl FileProgressEstimator {
    /// Create an estimator with no item in flight.
    #[must_use]
    pub const fn new() -> Self {
        Self { watermark: None }
    }

    /// Forget the current item.
    pub fn reset(&mut self) {
        self.watermark = None;
    }

    /// Compute the current item's completion and write it into `progress`.
    ///
    /// A `finished` tick forces exactly 100 and, when the total is known,
    /// aligns `downloaded_bytes` with it.
    pub fn estimate(&mut self, progress: &mut NormalizedFileProgress) -> f64 {
        if progress.status == ProgressStatus::Finished {
            if progress.total_bytes > 0 {
                progress.downloaded_bytes = progress.total_bytes;
            }
            progress.file_percent = 100.0;
            self.watermark = None;
            return 100.0;
        }

        let mut percent = compute_file_percent(
            progress.percent_hint,
            progress.downloaded_bytes,
            progress.total_bytes,
        );

        match &mut self.watermark {
            Some(mark) if mark.filename == progress.filename => {
                if percent < mark.highest {
                    percent = mark.highest;
                } else {
                    mark.highest = percent;
                }
            }
            _ => {
                self.watermark = Some(Watermark {
                    filename: progress.filename.clone(),
                    highest: percent,
                });
            }
        }

        progress.file_percent = percent;
        percent
    }
}
