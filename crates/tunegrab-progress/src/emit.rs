//! Outward event assembly and delivery.

use std::sync::Arc;

use tracing::warn;
use tunegrab_core::{
    CollectionState, NormalizedFileProgress, OutwardProgressEvent, ProgressEmitterPort,
    ProgressError, ProgressResult,
};

use crate::aggregate::AggregateOutcome;
use crate::format::{basename, format_percent};

/// Assembly switches taken from the settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssemblyOptions {
    /// Attach the whole-collection ETA in collection mode.
    pub collection_eta: bool,
    /// Report only the final path component of the filename.
    pub basename_filenames: bool,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            collection_eta: true,
            basename_filenames: false,
        }
    }
}

/// Builds [`OutwardProgressEvent`]s and hands them to the transport port.
pub struct ProgressEventEmitter {
    port: Arc<dyn ProgressEmitterPort>,
    options: AssemblyOptions,
}

impl std::fmt::Debug for ProgressEventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressEventEmitter")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl ProgressEventEmitter {
    /// Wrap a transport port.
    pub fn new(port: Arc<dyn ProgressEmitterPort>, options: AssemblyOptions) -> Self {
        Self { port, options }
    }

    /// Assemble an event, validating every numeric field.
    pub fn assemble(
        &self,
        progress: &NormalizedFileProgress,
        outcome: &AggregateOutcome,
        state: &CollectionState,
        collection_eta: Option<u64>,
    ) -> ProgressResult<OutwardProgressEvent> {
        if state.completed_items > state.total_items {
            return Err(ProgressError::StateInvariant(format!(
                "completed_items {} exceeds total_items {}",
                state.completed_items, state.total_items
            )));
        }

        let percentage = check_percent("percentage", outcome.overall())?;
        let file_percent = check_percent("file_percent", outcome.file_percent)?;
        let collection_percent =
            check_percent("collection_percent", outcome.collection_percent.unwrap_or(percentage))?;
        let speed = check_finite("speed", progress.speed_bps)?;

        let filename = if self.options.basename_filenames {
            basename(&progress.filename).to_string()
        } else {
            progress.filename.clone()
        };

        let in_collection = state.is_collection_mode && outcome.collection_percent.is_some();
        let (collection_index, collection_count, collection_name, collection_eta) = if in_collection
        {
            (
                Some(state.current_item_index),
                Some(state.total_items),
                Some(state.collection_name.clone()),
                collection_eta.filter(|_| self.options.collection_eta),
            )
        } else {
            (None, None, None, None)
        };

        Ok(OutwardProgressEvent {
            status: outcome.status,
            percentage,
            file_percent,
            collection_percent,
            downloaded_bytes: progress.downloaded_bytes,
            total_bytes: progress.total_bytes,
            speed,
            speed_str: progress.speed_display.clone(),
            eta: progress.eta_seconds,
            eta_str: progress.eta_display.clone(),
            filename,
            percent_str: format_percent(file_percent),
            message: progress.message.clone(),
            is_collection: in_collection,
            collection_index,
            collection_count,
            collection_name,
            collection_eta,
        })
    }

    /// Assemble an event, substituting an `error` event on failure.
    pub fn assemble_or_fallback(
        &self,
        progress: &NormalizedFileProgress,
        outcome: &AggregateOutcome,
        state: &CollectionState,
        collection_eta: Option<u64>,
    ) -> OutwardProgressEvent {
        self.assemble(progress, outcome, state, collection_eta)
            .unwrap_or_else(|err| {
                warn!(error = %err, "Progress assembly failed, emitting fallback");
                fallback_event(&err)
            })
    }

    /// Deliver an event to the transport.
    pub fn deliver(&self, event: OutwardProgressEvent) {
        self.port.emit(event);
    }
}

/// Best-effort `error` event describing a pipeline failure.
#[must_use]
pub fn fallback_event(err: &ProgressError) -> OutwardProgressEvent {
    OutwardProgressEvent::error(err.user_message())
}

fn check_finite(field: &'static str, value: f64) -> ProgressResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ProgressError::NonFinite { field, value })
    }
}

fn check_percent(field: &'static str, value: f64) -> ProgressResult<f64> {
    let value = check_finite(field, value)?;
    if (0.0..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err(ProgressError::OutOfRange { field, value })
    }
}
