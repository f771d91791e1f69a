//! NDJSON transport to the host UI.
//!
//! Every message is one `HostMessage` JSON object followed by a newline,
//! flushed immediately so the host sees ticks as they happen.

use std::io::Write;
use std::sync::{Arc, Mutex};

use tracing::warn;
use tunegrab_core::{HostMessage, OutwardProgressEvent, ProgressEmitterPort, SessionResult};

use crate::error::CliError;

/// Writes host messages as NDJSON to a shared writer.
///
/// Clones share the writer, so the progress port and the handler can both
/// write without interleaving partial lines.
pub struct NdjsonEmitter<W> {
    out: Arc<Mutex<W>>,
}

impl<W> Clone for NdjsonEmitter<W> {
    fn clone(&self) -> Self {
        Self {
            out: Arc::clone(&self.out),
        }
    }
}

impl<W> std::fmt::Debug for NdjsonEmitter<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NdjsonEmitter").finish_non_exhaustive()
    }
}

impl<W: Write + Send + 'static> NdjsonEmitter<W> {
    /// Wrap a writer.
    pub fn new(out: W) -> Self {
        Self {
            out: Arc::new(Mutex::new(out)),
        }
    }

    /// Write one message.
    pub fn send(&self, message: &HostMessage) -> Result<(), CliError> {
        let line = message
            .to_line()
            .map_err(|e| CliError::Io(format!("Cannot serialize host message: {e}")))?;

        let mut out = self
            .out
            .lock()
            .map_err(|_| CliError::Io("Output writer poisoned".to_string()))?;
        writeln!(out, "{line}")?;
        out.flush()?;
        Ok(())
    }

    /// Write the end-of-session result.
    pub fn send_result(&self, result: &SessionResult) -> Result<(), CliError> {
        self.send(&HostMessage::Result(result.clone()))
    }

    /// Run `f` against the underlying writer.
    pub fn with_writer<R>(&self, f: impl FnOnce(&mut W) -> R) -> Option<R> {
        self.out.lock().ok().map(|mut out| f(&mut *out))
    }
}

impl<W: Write + Send + 'static> ProgressEmitterPort for NdjsonEmitter<W> {
    fn emit(&self, event: OutwardProgressEvent) {
        if let Err(e) = self.send(&HostMessage::Progress(event)) {
            warn!(error = %e, "Failed to write progress event");
            // Best effort: tell the host something went wrong
            let _ = self.send(&HostMessage::Error(e.to_string()));
        }
    }

    fn clone_box(&self) -> Box<dyn ProgressEmitterPort> {
        Box::new(self.clone())
    }
}
