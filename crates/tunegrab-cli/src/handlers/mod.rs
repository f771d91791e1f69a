//! Command handlers.
//!
//! Both commands feed bridge lines through a [`BridgeDriver`] and forward
//! the resulting host messages; they differ only in where the lines come
//! from.

pub mod exec;
pub mod track;

use std::borrow::Cow;
use std::io::{self, Write};
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};
use tunegrab_core::{SessionResult, Settings};
use tunegrab_progress::{BridgeDriver, LineOutcome, ProgressSession, SessionOptions};

use crate::commands::CollectionArgs;
use crate::error::CliError;
use crate::transport::NdjsonEmitter;

/// Outcome counts across the sessions of one invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl SessionSummary {
    /// Count one reported result.
    pub fn record(&mut self, result: &SessionResult) {
        if result.success {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }

    /// Whether every session succeeded.
    pub const fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Fresh driver for one session, wired to the transport.
pub(crate) fn new_driver<W: Write + Send + 'static>(
    settings: &Settings,
    transport: &NdjsonEmitter<W>,
    collection: &CollectionArgs,
) -> BridgeDriver {
    let session = ProgressSession::with_options(
        Arc::new(transport.clone()),
        SessionOptions::from_settings(settings),
    );
    let mut driver = BridgeDriver::new(session);
    if let Some(total) = collection.total {
        driver.session_mut().declare_collection(total, &collection.name);
    }
    driver
}

/// Forward what a line produced. Progress was already delivered by the
/// session; only results need writing here.
pub(crate) fn forward<W: Write + Send + 'static>(
    outcome: LineOutcome,
    transport: &NdjsonEmitter<W>,
    summary: &mut SessionSummary,
) -> Result<(), CliError> {
    if let LineOutcome::Result(result) = outcome {
        summary.record(&result);
        transport.send_result(&result)?;
    }
    Ok(())
}

/// Pump every line of `reader` through the driver.
pub(crate) async fn pump_lines<R, W>(
    mut reader: R,
    driver: &mut BridgeDriver,
    transport: &NdjsonEmitter<W>,
    summary: &mut SessionSummary,
) -> Result<(), CliError>
where
    R: AsyncBufRead + Unpin,
    W: Write + Send + 'static,
{
    let mut buf = Vec::new();
    while let Some(line) = read_line_lossy(&mut reader, &mut buf).await? {
        forward(driver.handle_line(&line), transport, summary)?;
    }
    Ok(())
}

/// Read one line without its terminator. `Ok(None)` at end of stream.
///
/// Invalid UTF-8 is replaced, not an error: engine log lines may echo titles
/// in any encoding.
pub(crate) async fn read_line_lossy<R>(
    reader: &mut R,
    buf: &mut Vec<u8>,
) -> io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    if reader.read_until(b'\n', buf).await? == 0 {
        return Ok(None);
    }

    let line = match String::from_utf8_lossy(buf) {
        Cow::Borrowed(line) => line.to_string(),
        Cow::Owned(line) => {
            debug!("Replaced invalid UTF-8 in bridge output");
            line
        }
    };
    Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
}

/// Report a result for a session the bridge left without one.
pub(crate) fn conclude<W: Write + Send + 'static>(
    driver: &mut BridgeDriver,
    transport: &NdjsonEmitter<W>,
    summary: &mut SessionSummary,
) -> Result<(), CliError> {
    let stats = driver.stats();
    info!(
        events = driver.session().events_observed(),
        lines = stats.lines,
        skipped = stats.skipped,
        rejected = stats.rejected,
        "Bridge stream ended"
    );
    if let Some(result) = driver.conclude() {
        summary.record(&result);
        transport.send_result(&result)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_line_lossy() {
        let mut input: &[u8] = b"plain\r\ncaf\xE9\nlast";
        let mut buf = Vec::new();

        let first = read_line_lossy(&mut input, &mut buf).await.unwrap();
        assert_eq!(first.as_deref(), Some("plain"));

        let second = read_line_lossy(&mut input, &mut buf).await.unwrap();
        assert_eq!(second.as_deref(), Some("caf\u{fffd}"));

        let third = read_line_lossy(&mut input, &mut buf).await.unwrap();
        assert_eq!(third.as_deref(), Some("last"));

        assert_eq!(read_line_lossy(&mut input, &mut buf).await.unwrap(), None);
    }

    #[test]
    fn test_summary_counts_results() {
        let mut summary = SessionSummary::default();
        summary.record(&SessionResult::succeeded("ok", None));
        assert!(summary.is_success());

        summary.record(&SessionResult::failed("nope"));
        assert_eq!(summary.succeeded, 1);
        assert!(!summary.is_success());
    }
}
