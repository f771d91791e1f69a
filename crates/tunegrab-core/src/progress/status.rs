//! Progress status tag shared by normalized and outward events.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a progress tick.
///
/// The fetch engine reports free-text statuses; [`ProgressStatus::parse`]
/// folds the known spellings onto this closed set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    /// Waiting to start.
    Queued,
    /// Bytes are being transferred.
    #[default]
    Downloading,
    /// The transfer is done and the transcoder is running.
    Converting,
    /// The item (or, after aggregation, the whole session) is complete.
    Finished,
    /// Something failed; the event carries a message.
    Error,
}

impl ProgressStatus {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Downloading => "downloading",
            Self::Converting => "converting",
            Self::Finished => "finished",
            Self::Error => "error",
        }
    }

    /// Parse a raw status string.
    ///
    /// Returns `None` for values that do not map onto a known status so the
    /// caller can log them before falling back.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "queued" | "ready" | "pending" => Some(Self::Queued),
            "downloading" | "progress" => Some(Self::Downloading),
            "converting" | "processing" | "postprocessing" | "started" => Some(Self::Converting),
            "finished" | "complete" | "completed" | "done" => Some(Self::Finished),
            "error" | "failed" => Some(Self::Error),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_spellings() {
        assert_eq!(ProgressStatus::parse("downloading"), Some(ProgressStatus::Downloading));
        assert_eq!(ProgressStatus::parse(" Finished "), Some(ProgressStatus::Finished));
        assert_eq!(ProgressStatus::parse("processing"), Some(ProgressStatus::Converting));
        assert_eq!(ProgressStatus::parse("ready"), Some(ProgressStatus::Queued));
        assert_eq!(ProgressStatus::parse("error"), Some(ProgressStatus::Error));
    }

    #[test]
    fn test_parse_unknown_is_none() {
        assert_eq!(ProgressStatus::parse("sleeping"), None);
        assert_eq!(ProgressStatus::parse(""), None);
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&ProgressStatus::Converting).unwrap();
        assert_eq!(json, "\"converting\"");
    }
}
