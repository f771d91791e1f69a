//! Settings domain types and validation.
//!
//! Pure domain types; loading them from files and the environment is the
//! adapter's job.

use serde::{Deserialize, Serialize};

/// Default minimum interval between two `downloading` ticks, in milliseconds.
///
/// Zero: every tick reaches the emitter unless a host opts in.
pub const DEFAULT_THROTTLE_MS: u64 = 0;

/// Upper bound accepted for the throttle interval.
pub const MAX_THROTTLE_MS: u64 = 10_000;

/// Progress engine settings.
///
/// All fields are optional to support partial updates and graceful defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Minimum interval between non-terminal progress ticks (0 disables
    /// throttling).
    pub throttle_ms: Option<u64>,

    /// Whether outward events carry a whole-collection ETA.
    pub collection_eta: Option<bool>,

    /// Report only the final path component in `filename`.
    pub basename_filenames: Option<bool>,

    /// Collection name used when the engine reports a collection without one.
    pub fallback_collection_name: Option<String>,
}

impl Settings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            throttle_ms: Some(DEFAULT_THROTTLE_MS),
            collection_eta: Some(true),
            basename_filenames: Some(false),
            fallback_collection_name: None,
        }
    }

    /// Get the effective throttle interval (with default fallback).
    #[must_use]
    pub const fn effective_throttle_ms(&self) -> u64 {
        match self.throttle_ms {
            Some(ms) => ms,
            None => DEFAULT_THROTTLE_MS,
        }
    }

    /// Get whether the collection ETA is reported (default on).
    #[must_use]
    pub const fn effective_collection_eta(&self) -> bool {
        match self.collection_eta {
            Some(enabled) => enabled,
            None => true,
        }
    }

    /// Get whether filenames are reduced to their basename (default off).
    #[must_use]
    pub const fn effective_basename_filenames(&self) -> bool {
        match self.basename_filenames {
            Some(enabled) => enabled,
            None => false,
        }
    }

    /// Merge an update into these settings, only touching fields that are Some.
    pub fn merge(&mut self, other: &SettingsUpdate) {
        if let Some(ref ms) = other.throttle_ms {
            self.throttle_ms = *ms;
        }
        if let Some(ref eta) = other.collection_eta {
            self.collection_eta = *eta;
        }
        if let Some(ref basename) = other.basename_filenames {
            self.basename_filenames = *basename;
        }
        if let Some(ref name) = other.fallback_collection_name {
            self.fallback_collection_name.clone_from(name);
        }
    }
}

/// Partial settings update.
///
/// Each field is `Option<Option<T>>`:
/// - `None` = don't change this field
/// - `Some(None)` = reset the field to its default
/// - `Some(Some(value))` = set field to value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub throttle_ms: Option<Option<u64>>,
    pub collection_eta: Option<Option<bool>>,
    pub basename_filenames: Option<Option<bool>>,
    pub fallback_collection_name: Option<Option<String>>,
}

/// Settings validation error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SettingsError {
    #[error("Throttle interval must be at most {MAX_THROTTLE_MS} ms, got {0}")]
    InvalidThrottle(u64),

    #[error("Fallback collection name cannot be empty")]
    EmptyCollectionName,
}

/// Validate settings values.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    if let Some(ms) = settings.throttle_ms {
        if ms > MAX_THROTTLE_MS {
            return Err(SettingsError::InvalidThrottle(ms));
        }
    }

    if settings
        .fallback_collection_name
        .as_ref()
        .is_some_and(|name| name.trim().is_empty())
    {
        return Err(SettingsError::EmptyCollectionName);
    }

    Ok(())
}
