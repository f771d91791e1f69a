//! `exec` handler.
//!
//! Spawns the fetch bridge, pumps its stdout through the progress session
//! and forwards its stderr to the log. Ctrl+C (or the cancellation token)
//! kills the bridge and reports a failed result.

use std::io::Write;
use std::process::{ExitStatus, Stdio};

use tokio::io::BufReader;
use tokio::process::{Child, ChildStderr, Command};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tunegrab_core::{SessionResult, Settings};

use super::{SessionSummary, forward, new_driver, read_line_lossy};
use crate::commands::CollectionArgs;
use crate::error::CliError;
use crate::transport::NdjsonEmitter;

const CANCELLED_MSG: &str = "Download cancelled by user";

/// Execute the exec command.
pub async fn execute<W: Write + Send + 'static>(
    command: &[String],
    collection: &CollectionArgs,
    settings: &Settings,
    transport: &NdjsonEmitter<W>,
    cancel: CancellationToken,
) -> Result<SessionSummary, CliError> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| CliError::Arguments("missing bridge command".to_string()))?;

    info!(program = %program, "Starting fetch bridge");
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| CliError::Process(format!("Failed to spawn {program}: {e}")))?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| CliError::Process("Missing stdout".to_string()))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| CliError::Process("Missing stderr".to_string()))?;
    let stderr_task = tokio::spawn(log_stderr(stderr));

    let mut driver = new_driver(settings, transport, collection);
    let mut summary = SessionSummary::default();
    let mut stdout = BufReader::new(stdout);
    let mut buf = Vec::new();
    let mut ctrl_c = Box::pin(signal::ctrl_c());

    // Event loop
    loop {
        tokio::select! {
            // External cancellation
            () = cancel.cancelled() => {
                return cancel_bridge(&mut child, transport).await;
            }

            // Ctrl+C from terminal
            _ = &mut ctrl_c => {
                return cancel_bridge(&mut child, transport).await;
            }

            // Bridge stdout lines
            line = read_line_lossy(&mut stdout, &mut buf) => {
                let Some(line) = line? else { break; };
                forward(driver.handle_line(&line), transport, &mut summary)?;
            }
        }
    }

    let status = child
        .wait()
        .await
        .map_err(|e| CliError::Process(e.to_string()))?;
    let last_stderr = stderr_task.await.unwrap_or_default();
    debug!(%status, "Fetch bridge exited");

    let stats = driver.stats();
    info!(
        events = driver.session().events_observed(),
        lines = stats.lines,
        rejected = stats.rejected,
        "Bridge stream ended"
    );

    if let Some(result) = driver.conclude() {
        let result = reconcile_exit(result, status, last_stderr);
        summary.record(&result);
        transport.send_result(&result)?;
    } else if !status.success() {
        warn!(%status, "Bridge reported a result but exited unsuccessfully");
    }

    Ok(summary)
}

/// Kill the bridge and tell the host the session failed.
async fn cancel_bridge<W: Write + Send + 'static>(
    child: &mut Child,
    transport: &NdjsonEmitter<W>,
) -> Result<SessionSummary, CliError> {
    info!("Cancelling fetch bridge");
    let _ = child.kill().await;
    transport.send_result(&SessionResult::failed(CANCELLED_MSG))?;
    Err(CliError::Cancelled)
}

/// A non-zero exit overrides a synthesized result.
fn reconcile_exit(
    result: SessionResult,
    status: ExitStatus,
    last_stderr: Option<String>,
) -> SessionResult {
    if status.success() {
        return result;
    }
    let reason = last_stderr.unwrap_or_else(|| format!("Bridge exited with status {status}"));
    SessionResult::failed(reason)
}

/// Forward bridge stderr to the log. Returns the last non-empty line.
async fn log_stderr(stderr: ChildStderr) -> Option<String> {
    let mut reader = BufReader::new(stderr);
    let mut buf = Vec::new();
    let mut last = None;
    while let Ok(Some(line)) = read_line_lossy(&mut reader, &mut buf).await {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        debug!(target: "tunegrab::bridge", "{line}");
        last = Some(line.to_string());
    }
    last
}
