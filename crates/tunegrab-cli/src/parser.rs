//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use std::path::PathBuf;

use clap::Parser;
use tunegrab_core::SettingsUpdate;

use crate::commands::Commands;

/// Command-line interface for the tunegrab progress host.
///
/// Reads the fetch bridge's line protocol and writes `HostMessage` NDJSON to
/// stdout. Logs go to stderr.
#[derive(Parser)]
#[command(name = "tunegrab")]
#[command(about = "Turn fetch-engine progress into a stable NDJSON progress stream")]
#[command(version)]
pub struct Cli {
    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// JSON settings file
    #[arg(long = "config", global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Minimum milliseconds between plain progress ticks (0 disables)
    #[arg(long = "throttle-ms", global = true, env = "TUNEGRAB_THROTTLE_MS")]
    pub throttle_ms: Option<u64>,

    /// Report only the file name, not the full path
    #[arg(long = "basename", global = true)]
    pub basename: bool,

    /// Omit the whole-collection ETA from progress events
    #[arg(long = "no-collection-eta", global = true)]
    pub no_collection_eta: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Settings overrides given on the command line (or via env).
    pub fn settings_overrides(&self) -> SettingsUpdate {
        SettingsUpdate {
            throttle_ms: self.throttle_ms.map(Some),
            collection_eta: self.no_collection_eta.then_some(Some(false)),
            basename_filenames: self.basename.then_some(Some(true)),
            fallback_collection_name: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        // Verify the CLI parser can be constructed
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_args() {
        let cli = Cli::parse_from([
            "tunegrab",
            "--verbose",
            "--config",
            "/tmp/tunegrab.json",
            "track",
            "-",
            "--basename",
        ]);
        assert!(cli.verbose);
        assert!(cli.basename);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/tunegrab.json")));
    }

    #[test]
    fn test_overrides_only_touch_given_flags() {
        let cli = Cli::parse_from(["tunegrab", "--no-collection-eta", "track"]);
        let update = cli.settings_overrides();

        assert_eq!(update.collection_eta, Some(Some(false)));
        assert_eq!(update.basename_filenames, None);
        assert_eq!(update.fallback_collection_name, None);
    }
}
