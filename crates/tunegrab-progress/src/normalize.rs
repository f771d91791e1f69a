//! Raw event normalization.
//!
//! Turns one loosely-typed [`RawProgressEvent`] into a strict
//! [`NormalizedFileProgress`]. Nothing in here fails: a field that cannot be
//! coerced degrades to its default and leaves a `debug!` trace.

use serde_json::Value;
use tracing::debug;
use tunegrab_core::{
    CollectionPosition, NormalizedFileProgress, ProgressStatus, RawProgressEvent, UNKNOWN_DISPLAY,
};

use crate::format::{
    clean_display, format_eta, format_speed, parse_eta_to_seconds, parse_percent,
};

/// Normalize one raw tick.
///
/// `file_percent` is left at `0.0`; the estimator fills it.
pub fn normalize(raw: &RawProgressEvent) -> NormalizedFileProgress {
    let status = normalize_status(raw.status.as_ref());

    let downloaded_bytes = coerce_u64("downloaded_bytes", raw.downloaded_bytes.as_ref());
    let total_bytes = match coerce_u64("total_bytes", raw.total_bytes.as_ref()) {
        0 => coerce_u64("total_bytes_estimate", raw.total_bytes_estimate.as_ref()),
        total => total,
    };

    let percent_display = coerce_string(raw.percent_str.as_ref());
    let percent_hint = raw.percent_str.as_ref().and_then(|value| {
        let hint = match value {
            Value::Number(n) => n.as_f64().filter(|p| p.is_finite()),
            Value::String(s) => parse_percent(s),
            _ => None,
        };
        if hint.is_none() {
            debug!(value = %value, "Unparsable percent string, using byte ratio");
        }
        hint
    });

    let speed_bps = coerce_f64("speed", raw.speed.as_ref());
    let speed_display = first_display(raw.speed_str.as_ref()).unwrap_or_else(|| {
        if speed_bps > 0.0 {
            format_speed(speed_bps)
        } else {
            UNKNOWN_DISPLAY.to_string()
        }
    });

    let eta_seconds = normalize_eta(raw.eta.as_ref(), raw.eta_str.as_ref());
    let eta_display = first_display(raw.eta_str.as_ref()).unwrap_or_else(|| {
        if eta_seconds > 0 {
            format_eta(eta_seconds)
        } else {
            UNKNOWN_DISPLAY.to_string()
        }
    });

    NormalizedFileProgress {
        status,
        downloaded_bytes,
        total_bytes,
        percent_hint,
        file_percent: 0.0,
        speed_bps,
        speed_display,
        eta_seconds,
        eta_display,
        percent_display,
        filename: coerce_string(raw.filename.as_ref()),
        collection: normalize_collection(raw),
        message: coerce_string(raw.message.as_ref()),
    }
}

fn normalize_status(value: Option<&Value>) -> ProgressStatus {
    let Some(value) = value else {
        return ProgressStatus::Downloading;
    };

    let parsed = value.as_str().and_then(ProgressStatus::parse);
    parsed.unwrap_or_else(|| {
        debug!(status = %value, "Unknown status, treating as downloading");
        ProgressStatus::Downloading
    })
}

fn normalize_eta(eta: Option<&Value>, eta_str: Option<&Value>) -> u64 {
    let numeric = eta.and_then(|value| match value {
        Value::String(s) => parse_eta_to_seconds(s).or_else(|| number_as_u64(value)),
        _ => number_as_u64(value),
    });

    numeric
        .or_else(|| eta_str.and_then(Value::as_str).and_then(parse_eta_to_seconds))
        .unwrap_or(0)
}

fn normalize_collection(raw: &RawProgressEvent) -> CollectionPosition {
    let positive = |field: &'static str, value: Option<&Value>| {
        let n = coerce_u64(field, value);
        (n > 0).then(|| u32::try_from(n).unwrap_or(u32::MAX))
    };

    let name = [raw.playlist.as_ref(), raw.playlist_title.as_ref()]
        .into_iter()
        .map(coerce_string)
        .find(|name| !name.is_empty());

    CollectionPosition {
        index: positive("playlist_index", raw.playlist_index.as_ref()),
        count: positive("playlist_count", raw.playlist_count.as_ref()),
        name,
    }
}

// ============================================================================
// Coercion
// ============================================================================

/// Finite, non-negative number from a JSON number or numeric string.
fn number_as_f64(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => clean_display(s).parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n.max(0.0))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn number_as_u64(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    number_as_f64(value).map(|n| n.trunc() as u64)
}

fn coerce_u64(field: &'static str, value: Option<&Value>) -> u64 {
    match value {
        None | Some(Value::Null) => 0,
        Some(value) => number_as_u64(value).unwrap_or_else(|| {
            debug!(field, value = %value, "Unparsable count, defaulting to 0");
            0
        }),
    }
}

fn coerce_f64(field: &'static str, value: Option<&Value>) -> f64 {
    match value {
        None | Some(Value::Null) => 0.0,
        Some(value) => number_as_f64(value).unwrap_or_else(|| {
            debug!(field, value = %value, "Unparsable number, defaulting to 0");
            0.0
        }),
    }
}

fn coerce_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => clean_display(s),
        Some(other) => other.to_string(),
    }
}

/// Cleaned display string, `None` when absent, blank or `N/A`-like.
fn first_display(value: Option<&Value>) -> Option<String> {
    let cleaned = coerce_string(value);
    match cleaned.as_str() {
        "" | "N/A" | "Unknown" | "Unknown speed" | "Unknown ETA" => None,
        _ => Some(cleaned),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawProgressEvent {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_missing_everything_degrades_to_defaults() {
        let progress = normalize(&RawProgressEvent::default());

        assert_eq!(progress.status, ProgressStatus::Downloading);
        assert_eq!(progress.downloaded_bytes, 0);
        assert_eq!(progress.total_bytes, 0);
        assert_eq!(progress.percent_hint, None);
        assert_eq!(progress.speed_display, UNKNOWN_DISPLAY);
        assert_eq!(progress.eta_display, UNKNOWN_DISPLAY);
        assert!(progress.collection.is_empty());
    }

    #[test]
    fn test_byte_counts_from_numbers_and_strings() {
        let progress = normalize(&raw(json!({
            "downloaded_bytes": "1024",
            "total_bytes": 4096.0,
        })));
        assert_eq!(progress.downloaded_bytes, 1024);
        assert_eq!(progress.total_bytes, 4096);
    }

    #[test]
    fn test_unparsable_counts_become_zero() {
        let progress = normalize(&raw(json!({
            "downloaded_bytes": "lots",
            "total_bytes": -5,
            "speed": "fast",
        })));
        assert_eq!(progress.downloaded_bytes, 0);
        assert_eq!(progress.total_bytes, 0);
        assert!(progress.speed_bps.abs() < f64::EPSILON);
    }

    #[test]
    fn test_total_falls_back_to_estimate() {
        let progress = normalize(&raw(json!({
            "downloaded_bytes": 10,
            "total_bytes": null,
            "total_bytes_estimate": 200.7,
        })));
        assert_eq!(progress.total_bytes, 200);
    }

    #[test]
    fn test_percent_hint_parsing() {
        let progress = normalize(&RawProgressEvent::default().percent_str(" 12.5%"));
        assert_eq!(progress.percent_hint, Some(12.5));
        assert_eq!(progress.percent_display, "12.5%");

        let progress = normalize(&RawProgressEvent::default().percent_str("N/A%"));
        assert_eq!(progress.percent_hint, None);
    }

    #[test]
    fn test_unknown_status_folds_to_downloading() {
        let progress = normalize(&RawProgressEvent::with_status("teleporting"));
        assert_eq!(progress.status, ProgressStatus::Downloading);

        let progress = normalize(&raw(json!({"status": 7})));
        assert_eq!(progress.status, ProgressStatus::Downloading);
    }

    #[test]
    fn test_eta_sources() {
        assert_eq!(normalize(&raw(json!({"eta": 42}))).eta_seconds, 42);
        assert_eq!(normalize(&raw(json!({"eta": "01:30"}))).eta_seconds, 90);
        assert_eq!(normalize(&raw(json!({"_eta_str": "00:10"}))).eta_seconds, 10);
        assert_eq!(normalize(&raw(json!({"eta": "N/A"}))).eta_seconds, 0);
    }

    #[test]
    fn test_display_strings_prefer_engine_text() {
        let progress = normalize(&raw(json!({
            "_speed_str": "\u{1b}[0;32m 1.21MiB/s\u{1b}[0m",
            "speed": 5.0,
            "eta": 125,
        })));
        assert_eq!(progress.speed_display, "1.21MiB/s");
        assert_eq!(progress.eta_display, "02:05");
    }

    #[test]
    fn test_speed_display_rendered_from_number() {
        let progress = normalize(&raw(json!({"speed": 2048, "_speed_str": "Unknown speed"})));
        assert_eq!(progress.speed_display, "2.00KiB/s");
    }

    #[test]
    fn test_collection_position() {
        let progress = normalize(&raw(json!({
            "playlist_index": 2,
            "playlist_count": "5",
            "playlist": null,
            "playlist_title": "Mix",
        })));
        assert_eq!(progress.collection.index, Some(2));
        assert_eq!(progress.collection.count, Some(5));
        assert_eq!(progress.collection.name.as_deref(), Some("Mix"));
    }

    #[test]
    fn test_zero_collection_fields_are_absent() {
        let progress = normalize(&raw(json!({"playlist_index": 0, "playlist_count": 0})));
        assert!(progress.collection.is_empty());
    }
}
