//! Line protocol spoken by the fetch bridge.
//!
//! The bridge process wraps the fetch engine and writes one JSON object per
//! line on stdout. Each line maps 1:1 to a [`BridgeMessage`] variant.
//!
//! # Protocol Schema
//!
//! Control lines carry an `event` discriminator; anything without one is a
//! raw progress hook payload passed through verbatim:
//!
//! ```json
//! {"event": "session_start"}
//! {"event": "collection", "total": 12, "name": "Road trip"}
//! {"status": "downloading", "downloaded_bytes": 1024, "total_bytes": 4096, "_percent_str": "25.0%"}
//! {"event": "result", "success": true, "message": "Done", "output_path": "/music/a.mp3"}
//! ```
//!
//! Lines that do not start with `{` are the engine's own log output and are
//! skipped.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tunegrab_core::{RawProgressEvent, SessionResult};

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur when parsing bridge lines.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Expected a JSON object")]
    NotAnObject,

    #[error("Missing or invalid 'event' field")]
    InvalidEvent,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Unknown event: {0}")]
    UnknownEvent(String),
}

// ============================================================================
// Protocol Messages
// ============================================================================

/// One message from the fetch bridge.
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeMessage {
    /// A new download session begins; state must be reset.
    SessionStart,

    /// The target resolved to a collection.
    Collection {
        /// Number of items.
        total: u32,
        /// Display name (may be empty).
        name: String,
    },

    /// A raw progress hook payload.
    Progress(RawProgressEvent),

    /// Final outcome reported by the bridge.
    Result(SessionResult),
}

// ============================================================================
// Parsing
// ============================================================================

/// Collection announcement envelope.
#[derive(Deserialize)]
struct CollectionEnvelope {
    total: Option<i64>,
    #[serde(default)]
    name: Option<String>,
}

/// Parse a single line of bridge output.
///
/// # Returns
///
/// - `Ok(None)` for blank lines and non-JSON log noise.
/// - `Ok(Some(BridgeMessage))` for a valid protocol line.
/// - `Err(ProtocolError)` if a JSON line is malformed or missing required
///   fields.
///
/// # Examples
///
/// ```ignore
/// let msg = parse_line(r#"{"event": "collection", "total": 3}"#)?;
/// assert!(matches!(msg, Some(BridgeMessage::Collection { total: 3, .. })));
/// ```
pub fn parse_line(line: &str) -> Result<Option<BridgeMessage>, ProtocolError> {
    let line = line.trim();
    if !line.starts_with('{') {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(line)?;
    let Some(object) = value.as_object() else {
        return Err(ProtocolError::NotAnObject);
    };

    let event = match object.get("event") {
        None | Some(Value::Null) => None,
        Some(Value::String(event)) => Some(event.clone()),
        Some(_) => return Err(ProtocolError::InvalidEvent),
    };
    let has_success = object.contains_key("success");

    let Some(event) = event else {
        return Ok(Some(BridgeMessage::Progress(serde_json::from_value(value)?)));
    };

    match event.as_str() {
        "session_start" | "start" => Ok(Some(BridgeMessage::SessionStart)),

        "collection" | "playlist" => {
            let envelope: CollectionEnvelope = serde_json::from_value(value)?;
            let total = envelope.total.ok_or(ProtocolError::MissingField("total"))?;

            Ok(Some(BridgeMessage::Collection {
                // Negative counts mean "no collection"
                total: u32::try_from(total.max(0)).unwrap_or(u32::MAX),
                name: envelope.name.unwrap_or_default(),
            }))
        }

        "progress" => Ok(Some(BridgeMessage::Progress(serde_json::from_value(value)?))),

        "result" => {
            if !has_success {
                return Err(ProtocolError::MissingField("success"));
            }
            Ok(Some(BridgeMessage::Result(serde_json::from_value(value)?)))
        }

        other => Err(ProtocolError::UnknownEvent(other.to_string())),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // Control lines
    // ------------------------------------------------------------------------

    #[test]
    fn test_parse_session_start() {
        let msg = parse_line(r#"{"event": "session_start"}"#).unwrap();
        assert_eq!(msg, Some(BridgeMessage::SessionStart));
    }

    #[test]
    fn test_parse_collection() {
        let msg = parse_line(r#"{"event": "collection", "total": 3, "name": "MyList"}"#).unwrap();
        assert_eq!(
            msg,
            Some(BridgeMessage::Collection {
                total: 3,
                name: "MyList".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_collection_without_name() {
        let msg = parse_line(r#"{"event": "collection", "total": 0}"#).unwrap();
        assert_eq!(
            msg,
            Some(BridgeMessage::Collection {
                total: 0,
                name: String::new(),
            })
        );
    }

    #[test]
    fn test_parse_collection_negative_total_is_zero() {
        let msg = parse_line(r#"{"event": "collection", "total": -4, "name": "x"}"#).unwrap();
        assert_eq!(
            msg,
            Some(BridgeMessage::Collection {
                total: 0,
                name: "x".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_collection_missing_total() {
        let err = parse_line(r#"{"event": "collection", "name": "x"}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::MissingField("total")));
    }

    #[test]
    fn test_parse_result() {
        let line = r#"{"event": "result", "success": false, "error": "HTTP 403"}"#;
        let Some(BridgeMessage::Result(result)) = parse_line(line).unwrap() else {
            panic!("expected result");
        };
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("HTTP 403"));
    }

    #[test]
    fn test_parse_result_missing_success() {
        let err = parse_line(r#"{"event": "result", "message": "?"}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::MissingField("success")));
    }

    // ------------------------------------------------------------------------
    // Progress lines
    // ------------------------------------------------------------------------

    #[test]
    fn test_parse_bare_hook_payload() {
        let line = r#"{"status": "downloading", "downloaded_bytes": 50, "total_bytes": 100}"#;
        let Some(BridgeMessage::Progress(raw)) = parse_line(line).unwrap() else {
            panic!("expected progress");
        };
        assert_eq!(raw, RawProgressEvent::with_status("downloading").bytes(50, 100));
    }

    #[test]
    fn test_parse_tagged_progress() {
        let line = r#"{"event": "progress", "status": "finished"}"#;
        assert!(matches!(
            parse_line(line).unwrap(),
            Some(BridgeMessage::Progress(_))
        ));
    }

    // ------------------------------------------------------------------------
    // Noise and error cases
    // ------------------------------------------------------------------------

    #[test]
    fn test_skips_log_noise() {
        assert_eq!(parse_line("[youtube] abc: Downloading webpage").unwrap(), None);
        assert_eq!(parse_line("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = parse_line("{not json").unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidJson(_)));
    }

    #[test]
    fn test_parse_invalid_event_field() {
        let err = parse_line(r#"{"event": 5}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidEvent));
    }

    #[test]
    fn test_parse_unknown_event() {
        let err = parse_line(r#"{"event": "teleport"}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownEvent(_)));
    }

    #[test]
    fn test_protocol_error_display() {
        let err = ProtocolError::MissingField("total");
        assert!(err.to_string().contains("total"));

        let err = ProtocolError::UnknownEvent("foo".to_string());
        assert!(err.to_string().contains("foo"));
    }
}
