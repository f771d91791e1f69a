//! Layered settings loading.
//!
//! Lowest to highest priority: built-in defaults, the `--config` JSON file,
//! then environment and command-line flags (clap resolves those two).

use std::path::Path;

use tracing::debug;
use tunegrab_core::{Settings, SettingsUpdate, validate_settings};

use crate::error::CliError;

/// Resolved configuration for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub settings: Settings,
}

impl CliConfig {
    /// Defaults only.
    pub fn with_defaults() -> Self {
        Self {
            settings: Settings::with_defaults(),
        }
    }

    /// Build the layered configuration and validate it.
    pub fn load(config_file: Option<&Path>, overrides: &SettingsUpdate) -> Result<Self, CliError> {
        let mut settings = Settings::with_defaults();

        if let Some(path) = config_file {
            let from_file = read_settings_file(path)?;
            debug!(path = %path.display(), "Loaded settings file");
            settings.merge(&present_fields(&from_file));
        }

        settings.merge(overrides);
        validate_settings(&settings)?;
        Ok(Self { settings })
    }
}

fn read_settings_file(path: &Path) -> Result<Settings, CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::Config(format!("Cannot read {}: {e}", path.display())))?;
    serde_json::from_str(&text)
        .map_err(|e| CliError::Config(format!("Invalid settings in {}: {e}", path.display())))
}

/// Update that sets every field present in `settings` and leaves the rest.
fn present_fields(settings: &Settings) -> SettingsUpdate {
    SettingsUpdate {
        throttle_ms: settings.throttle_ms.map(Some),
        collection_eta: settings.collection_eta.map(Some),
        basename_filenames: settings.basename_filenames.map(Some),
        fallback_collection_name: settings.fallback_collection_name.clone().map(Some),
    }
}
