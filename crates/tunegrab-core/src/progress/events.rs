//! Outward events - the schema-stable records delivered to the host UI.

use serde::{Deserialize, Serialize};

use super::status::ProgressStatus;
use super::types::UNKNOWN_DISPLAY;

/// Finalized progress record.
///
/// Every field is always present with a typed value so the host never needs
/// defensive parsing. The `collection_*` fields are only serialized in
/// collection mode.
///
/// ```typescript
/// type OutwardProgressEvent = {
///   status: "queued" | "downloading" | "converting" | "finished" | "error";
///   percentage: number; file_percent: number; collection_percent: number;
///   downloaded_bytes: number; total_bytes: number;
///   speed: number; speed_str: string; eta: number; eta_str: string;
///   filename: string; percent_str: string; message: string;
///   is_collection: boolean;
///   collection_index?: number; collection_count?: number;
///   collection_name?: string; collection_eta?: number;
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutwardProgressEvent {
    /// Session-level status (an item finishing mid-collection reports
    /// `downloading`).
    pub status: ProgressStatus,
    /// The primary percentage the UI should show.
    pub percentage: f64,
    /// Completion of the current item.
    pub file_percent: f64,
    /// Completion of the whole collection (equals `percentage` outside
    /// collection mode).
    pub collection_percent: f64,
    /// Bytes downloaded for the current item.
    pub downloaded_bytes: u64,
    /// Total bytes for the current item, `0` when unknown.
    pub total_bytes: u64,
    /// Speed in bytes per second.
    pub speed: f64,
    /// Human-readable speed.
    pub speed_str: String,
    /// Remaining seconds for the current item.
    pub eta: u64,
    /// Human-readable remaining time.
    pub eta_str: String,
    /// Current file.
    pub filename: String,
    /// Percentage rendered as a display string, e.g. `"42.0%"`.
    pub percent_str: String,
    /// Diagnostic or error message, empty when there is none.
    pub message: String,
    /// Whether the session is in collection mode.
    pub is_collection: bool,
    /// 1-based index of the current item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_index: Option<u32>,
    /// Number of items in the collection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_count: Option<u32>,
    /// Collection display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_name: Option<String>,
    /// Estimated seconds until the whole collection is done.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_eta: Option<u64>,
}

impl OutwardProgressEvent {
    /// Best-effort event reporting a failure inside the progress pipeline.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ProgressStatus::Error,
            percentage: 0.0,
            file_percent: 0.0,
            collection_percent: 0.0,
            downloaded_bytes: 0,
            total_bytes: 0,
            speed: 0.0,
            speed_str: UNKNOWN_DISPLAY.to_string(),
            eta: 0,
            eta_str: UNKNOWN_DISPLAY.to_string(),
            filename: String::new(),
            percent_str: "0.0%".to_string(),
            message: message.into(),
            is_collection: false,
            collection_index: None,
            collection_count: None,
            collection_name: None,
            collection_eta: None,
        }
    }
}

/// Final outcome of one download session, reported once at the end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResult {
    /// Whether the session succeeded.
    pub success: bool,
    /// Status or summary message.
    #[serde(default)]
    pub message: Option<String>,
    /// Path of the produced file (or output directory for collections).
    #[serde(default)]
    pub output_path: Option<String>,
    /// Error description when `success` is false.
    #[serde(default)]
    pub error: Option<String>,
}

impl SessionResult {
    /// Successful result.
    pub fn succeeded(message: impl Into<String>, output_path: Option<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            output_path,
            error: None,
        }
    }

    /// Failed result.
    pub fn failed(error: impl Into<String>) -> Self {
        let error = error.into();
        Self {
            success: false,
            message: Some(error.clone()),
            output_path: None,
            error: Some(error),
        }
    }
}

/// One line on the host channel.
///
/// ```json
/// {"type": "progress", "data": {"status": "downloading", "percentage": 42.0, ...}}
/// {"type": "result", "data": {"success": true, "message": "...", "output_path": "...", "error": null}}
/// {"type": "error", "data": "Error formatting progress: ..."}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum HostMessage {
    /// A progress tick.
    Progress(OutwardProgressEvent),
    /// End-of-session result.
    Result(SessionResult),
    /// Transport-level failure that could not be expressed as progress.
    Error(String),
}

impl HostMessage {
    /// Serialize as one NDJSON line (without the trailing newline).
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
