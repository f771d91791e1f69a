//! Recording emitter.

use std::sync::{Arc, Mutex};

use tunegrab_core::{OutwardProgressEvent, ProgressEmitterPort};
use tunegrab_progress::{ProgressSession, SessionOptions};

/// Emitter that keeps every delivered event.
#[derive(Clone, Default)]
pub struct RecordingEmitter {
    events: Arc<Mutex<Vec<OutwardProgressEvent>>>,
}

impl RecordingEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<OutwardProgressEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

impl ProgressEmitterPort for RecordingEmitter {
    fn emit(&self, event: OutwardProgressEvent) {
        self.events.lock().unwrap().push(event);
    }

    fn clone_box(&self) -> Box<dyn ProgressEmitterPort> {
        Box::new(self.clone())
    }
}

/// Fresh unthrottled session wired to a recorder.
pub fn recorded_session() -> (ProgressSession, RecordingEmitter) {
    let recorder = RecordingEmitter::new();
    let mut session =
        ProgressSession::with_options(Arc::new(recorder.clone()), SessionOptions::unthrottled());
    session.reset_session();
    (session, recorder)
}
