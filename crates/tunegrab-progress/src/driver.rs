//! Feeds bridge lines into a [`ProgressSession`].
//!
//! Transport-agnostic: hosts read lines from wherever the bridge writes them
//! (a file, stdin, a child's stdout) and hand each one to
//! [`BridgeDriver::handle_line`].

use tracing::{debug, warn};
use tunegrab_core::{OutwardProgressEvent, ProgressStatus, SessionResult};

use crate::protocol::{BridgeMessage, parse_line};
use crate::session::ProgressSession;

/// What a single line did.
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    /// Blank or log noise.
    Skipped,
    /// Malformed protocol line, logged and dropped.
    Rejected,
    /// The session was reset.
    SessionStarted,
    /// A collection was declared.
    CollectionDeclared,
    /// A progress tick was processed.
    Progress(OutwardProgressEvent),
    /// The bridge reported the session result.
    Result(SessionResult),
}

/// Line counters for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverStats {
    /// Lines seen.
    pub lines: u64,
    /// Lines that were noise.
    pub skipped: u64,
    /// Lines that failed to parse.
    pub rejected: u64,
}

/// Applies bridge messages to one session.
#[derive(Debug)]
pub struct BridgeDriver {
    session: ProgressSession,
    last_event: Option<OutwardProgressEvent>,
    result_reported: bool,
    stats: DriverStats,
}

impl BridgeDriver {
    /// Wrap a session; it is reset before the first line.
    pub fn new(mut session: ProgressSession) -> Self {
        session.reset_session();
        Self {
            session,
            last_event: None,
            result_reported: false,
            stats: DriverStats::default(),
        }
    }

    /// Handle one line of bridge output.
    pub fn handle_line(&mut self, line: &str) -> LineOutcome {
        self.stats.lines += 1;

        let message = match parse_line(line) {
            Ok(Some(message)) => message,
            Ok(None) => {
                self.stats.skipped += 1;
                if !line.trim().is_empty() {
                    debug!(line = line.trim(), "Bridge log");
                }
                return LineOutcome::Skipped;
            }
            Err(e) => {
                self.stats.rejected += 1;
                warn!(error = %e, "Dropping malformed bridge line");
                return LineOutcome::Rejected;
            }
        };

        match message {
            BridgeMessage::SessionStart => {
                self.session.reset_session();
                self.last_event = None;
                self.result_reported = false;
                LineOutcome::SessionStarted
            }
            BridgeMessage::Collection { total, name } => {
                self.session.declare_collection(total, &name);
                LineOutcome::CollectionDeclared
            }
            BridgeMessage::Progress(raw) => {
                let event = self.session.observe_raw_event(&raw);
                self.last_event = Some(event.clone());
                LineOutcome::Progress(event)
            }
            BridgeMessage::Result(result) => {
                self.result_reported = true;
                LineOutcome::Result(result)
            }
        }
    }

    /// Result to report when the stream ended without one.
    ///
    /// `None` if the bridge already reported a result for the current session.
    pub fn conclude(&mut self) -> Option<SessionResult> {
        if self.result_reported {
            return None;
        }
        self.result_reported = true;

        let result = match &self.last_event {
            Some(event) if event.status == ProgressStatus::Finished => {
                SessionResult::succeeded("Download complete", None)
            }
            Some(event) if event.status == ProgressStatus::Error && !event.message.is_empty() => {
                SessionResult::failed(event.message.clone())
            }
            Some(_) => SessionResult::failed("Session ended before completion"),
            None => SessionResult::failed("No progress received"),
        };
        Some(result)
    }

    /// The session being driven.
    #[must_use]
    pub const fn session(&self) -> &ProgressSession {
        &self.session
    }

    /// Mutable access, e.g. to declare a collection up front.
    pub fn session_mut(&mut self) -> &mut ProgressSession {
        &mut self.session
    }

    /// Most recent event produced by the session.
    #[must_use]
    pub const fn last_event(&self) -> Option<&OutwardProgressEvent> {
        self.last_event.as_ref()
    }

    /// Line counters.
    #[must_use]
    pub const fn stats(&self) -> DriverStats {
        self.stats
    }
}
