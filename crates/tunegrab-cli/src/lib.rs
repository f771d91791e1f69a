#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

#[cfg(test)]
use tempfile as _;

// Used by main.rs
use anyhow as _;
use dotenvy as _;
use tracing_subscriber as _;

pub mod commands;
pub mod config;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod transport;

// Re-export primary types for convenient access
pub use commands::{CollectionArgs, Commands};
pub use config::CliConfig;
pub use error::CliError;
pub use handlers::SessionSummary;
pub use parser::Cli;
pub use transport::NdjsonEmitter;
