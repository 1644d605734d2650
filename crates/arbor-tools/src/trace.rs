use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use arbor_core::{TraceEvent, TraceLog, TraceSink};

/// A trace sink the host can keep reading after handing a clone of it to a
/// scheduler.
///
/// All clones append to the same log.
#[derive(Debug, Clone, Default)]
pub struct SharedTraceSink {
    log: Arc<Mutex<TraceLog>>,
}

impl SharedTraceSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Boxed clone, ready for `Scheduler::set_trace_sink`.
    pub fn boxed(&self) -> Box<dyn TraceSink> {
        Box::new(self.clone())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of everything recorded so far.
    pub fn snapshot(&self) -> TraceLog {
        self.lock().clone()
    }

    /// Take everything recorded so far, leaving the log empty.
    pub fn drain(&self) -> TraceLog {
        std::mem::take(&mut *self.lock())
    }

    // A panicking emitter can't leave a half-pushed event behind.
    fn lock(&self) -> MutexGuard<'_, TraceLog> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TraceSink for SharedTraceSink {
    fn emit(&mut self, event: TraceEvent) {
        self.lock().push(event);
    }
}
