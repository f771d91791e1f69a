//! `track` handler.
//!
//! Replays bridge output captured in files, or read live from stdin. Each
//! input is its own session.

use std::io::Write;
use std::path::{Path, PathBuf};

use tokio::io::{AsyncBufRead, BufReader};
use tracing::info;
use tunegrab_core::Settings;

use super::{SessionSummary, conclude, new_driver, pump_lines};
use crate::commands::CollectionArgs;
use crate::error::CliError;
use crate::transport::NdjsonEmitter;

/// Execute the track command.
pub async fn execute<W: Write + Send + 'static>(
    inputs: &[PathBuf],
    collection: &CollectionArgs,
    settings: &Settings,
    transport: &NdjsonEmitter<W>,
) -> Result<SessionSummary, CliError> {
    let mut summary = SessionSummary::default();

    if inputs.is_empty() {
        let stdin = BufReader::new(tokio::io::stdin());
        track_one(stdin, collection, settings, transport, &mut summary).await?;
        return Ok(summary);
    }

    for input in inputs {
        if is_stdin(input) {
            let stdin = BufReader::new(tokio::io::stdin());
            track_one(stdin, collection, settings, transport, &mut summary).await?;
            continue;
        }

        info!(input = %input.display(), "Tracking session");
        let file = tokio::fs::File::open(input)
            .await
            .map_err(|e| CliError::Io(format!("Cannot open {}: {e}", input.display())))?;
        track_one(BufReader::new(file), collection, settings, transport, &mut summary).await?;
    }

    Ok(summary)
}

/// Run one session over `reader`.
pub async fn track_one<R, W>(
    reader: R,
    collection: &CollectionArgs,
    settings: &Settings,
    transport: &NdjsonEmitter<W>,
    summary: &mut SessionSummary,
) -> Result<(), CliError>
where
    R: AsyncBufRead + Unpin,
    W: Write + Send + 'static,
{
    let mut driver = new_driver(settings, transport, collection);
    pump_lines(reader, &mut driver, transport, summary).await?;
    conclude(&mut driver, transport, summary)
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}
