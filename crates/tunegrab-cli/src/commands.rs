//! Subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Read bridge output from files (or stdin) and report progress
    ///
    /// Each input file is one download session.
    Track {
        /// Bridge output files; `-` or nothing reads stdin
        inputs: Vec<PathBuf>,

        #[command(flatten)]
        collection: CollectionArgs,
    },

    /// Run the fetch bridge and report its progress
    Exec {
        #[command(flatten)]
        collection: CollectionArgs,

        /// Bridge command line, after `--`
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
}

/// Up-front collection declaration.
///
/// Only needed when the bridge does not announce the collection itself.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionArgs {
    /// Number of items in the collection
    #[arg(long = "collection-total", value_name = "N")]
    pub total: Option<u32>,

    /// Collection display name
    #[arg(long = "collection-name", value_name = "NAME", default_value = "")]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Cli;
    use clap::Parser;

    #[test]
    fn test_exec_takes_trailing_command() {
        let cli = Cli::parse_from([
            "tunegrab",
            "exec",
            "--collection-total",
            "3",
            "--",
            "python3",
            "bridge.py",
            "--format",
            "mp3",
        ]);
        let Commands::Exec { collection, command } = cli.command else {
            panic!("expected exec");
        };
        assert_eq!(collection.total, Some(3));
        assert_eq!(command, ["python3", "bridge.py", "--format", "mp3"]);
    }

    #[test]
    fn test_track_defaults_to_stdin() {
        let cli = Cli::parse_from(["tunegrab", "track"]);
        let Commands::Track { inputs, collection } = cli.command else {
            panic!("expected track");
        };
        assert!(inputs.is_empty());
        assert_eq!(collection, CollectionArgs::default());
    }
}
