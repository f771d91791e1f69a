//! Raw progress events as delivered by the external fetch engine.
//!
//! The fetch engine reports the same logical tick with different field sets
//! depending on code path and version: byte counts arrive as numbers or
//! strings, the total may only exist as an estimate, and percentages come as
//! decorated display strings. Every field is therefore optional and loosely
//! typed here; `tunegrab-progress` normalizes it into a strict record.

use serde::Deserialize;
use serde_json::Value;

/// One unprocessed progress tick.
///
/// Field names follow the fetch engine's progress-hook dictionary. Aliases
/// cover the names used by older bridge scripts; an alias never shadows a
/// field the engine itself may send alongside it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawProgressEvent {
    /// Status tag (`downloading`, `finished`, ...).
    pub status: Option<Value>,
    /// Bytes downloaded so far.
    pub downloaded_bytes: Option<Value>,
    /// Exact total size in bytes.
    pub total_bytes: Option<Value>,
    /// Estimated total size, used when the exact total is missing.
    pub total_bytes_estimate: Option<Value>,
    /// Display percentage, e.g. `" 42.1%"`.
    #[serde(rename = "_percent_str", alias = "percent_str")]
    pub percent_str: Option<Value>,
    /// Display speed, e.g. `"1.21MiB/s"`.
    #[serde(rename = "_speed_str", alias = "speed_str")]
    pub speed_str: Option<Value>,
    /// Speed in bytes per second.
    pub speed: Option<Value>,
    /// Remaining time in seconds (or a clock string).
    pub eta: Option<Value>,
    /// Display remaining time, e.g. `"01:05"`.
    #[serde(rename = "_eta_str", alias = "eta_str")]
    pub eta_str: Option<Value>,
    /// File currently being written.
    pub filename: Option<Value>,
    /// 1-based position in the collection.
    #[serde(alias = "collection_index")]
    pub playlist_index: Option<Value>,
    /// Number of items in the collection.
    #[serde(alias = "collection_count")]
    pub playlist_count: Option<Value>,
    /// Collection display name.
    #[serde(alias = "collection_name")]
    pub playlist: Option<Value>,
    /// Collection title, reported alongside (or instead of) `playlist`.
    pub playlist_title: Option<Value>,
    /// Free-text message (mostly on `error`).
    pub message: Option<Value>,
}

impl RawProgressEvent {
    /// Create an event carrying only a status.
    pub fn with_status(status: impl Into<String>) -> Self {
        Self {
            status: Some(Value::String(status.into())),
            ..Self::default()
        }
    }

    /// Set downloaded and total byte counts.
    #[must_use]
    pub fn bytes(mut self, downloaded: u64, total: u64) -> Self {
        self.downloaded_bytes = Some(Value::from(downloaded));
        self.total_bytes = Some(Value::from(total));
        self
    }

    /// Set the display percentage string.
    #[must_use]
    pub fn percent_str(mut self, percent: impl Into<String>) -> Self {
        self.percent_str = Some(Value::String(percent.into()));
        self
    }

    /// Set the filename.
    #[must_use]
    pub fn filename(mut self, name: impl Into<String>) -> Self {
        self.filename = Some(Value::String(name.into()));
        self
    }

    /// Set the collection position fields.
    #[must_use]
    pub fn collection(mut self, index: u32, count: u32, name: impl Into<String>) -> Self {
        self.playlist_index = Some(Value::from(index));
        self.playlist_count = Some(Value::from(count));
        self.playlist = Some(Value::String(name.into()));
        self
    }

    /// Set the message.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(Value::String(message.into()));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_hook_dictionary() {
        let line = r#"{"status":"downloading","downloaded_bytes":1024,"total_bytes":null,
            "total_bytes_estimate":4096.0,"_percent_str":" 25.0%","speed":512.5,"eta":6,
            "filename":"/music/song.webm"}"#;
        let raw = serde_json::from_str::<RawProgressEvent>(line).unwrap();

        assert_eq!(raw.status, Some(Value::from("downloading")));
        assert_eq!(raw.downloaded_bytes, Some(Value::from(1024)));
        assert_eq!(raw.total_bytes, None);
        assert_eq!(raw.percent_str, Some(Value::from(" 25.0%")));
        assert_eq!(raw.filename, Some(Value::from("/music/song.webm")));
    }

    #[test]
    fn test_deserialize_bridge_aliases() {
        let line = r#"{"status":"downloading","downloaded_bytes":"50","percent_str":"50%",
            "collection_index":2,"collection_count":3,"collection_name":"Mix"}"#;
        let raw = serde_json::from_str::<RawProgressEvent>(line).unwrap();

        assert_eq!(raw.downloaded_bytes, Some(Value::from("50")));
        assert_eq!(raw.percent_str, Some(Value::from("50%")));
        assert_eq!(raw.playlist_index, Some(Value::from(2)));
        assert_eq!(raw.playlist_count, Some(Value::from(3)));
        assert_eq!(raw.playlist, Some(Value::from("Mix")));
    }

    #[test]
    fn test_playlist_and_title_coexist() {
        let raw = serde_json::from_str::<RawProgressEvent>(r#"{"playlist":"a","playlist_title":"A"}"#).unwrap();
        assert_eq!(raw.playlist, Some(Value::from("a")));
        assert_eq!(raw.playlist_title, Some(Value::from("A")));
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let raw = serde_json::from_str::<RawProgressEvent>(r#"{"status":"finished","info_dict":{"id":"x"}}"#)
            .unwrap();
        assert_eq!(raw, RawProgressEvent::with_status("finished"));
    }
}
