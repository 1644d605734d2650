use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::Status;

/// A small, allocation-friendly trace event.
///
/// This is intentionally "dumb data" so it can be recorded during a drive and
/// rendered later by tooling. `node` is the arena index of the node that
/// produced the event, when there is one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEvent {
    pub tick: u64,
    pub tag: Cow<'static, str>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

impl TraceEvent {
    pub fn new(tick: u64, tag: impl Into<Cow<'static, str>>) -> Self {
        Self {
            tick,
            tag: tag.into(),
            node: None,
            status: None,
        }
    }

    pub fn with_node(mut self, node: usize) -> Self {
        self.node = Some(node);
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }
}

pub trait TraceSink: Send {
    fn emit(&mut self, event: TraceEvent);
}

#[derive(Debug, Default)]
pub struct NullTraceSink;

impl TraceSink for NullTraceSink {
    fn emit(&mut self, _event: TraceEvent) {}
}

#[derive(Debug, Default)]
pub struct VecTraceSink {
    pub events: Vec<TraceEvent>,
}

impl VecTraceSink {
    pub fn tags(&self) -> Vec<&str> {
        self.events.iter().map(|e| e.tag.as_ref()).collect()
    }
}

impl TraceSink for VecTraceSink {
    fn emit(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceLog {
    pub events: Vec<TraceEvent>,
}

impl TraceLog {
    pub fn push(&mut self, event: TraceEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl TraceSink for TraceLog {
    fn emit(&mut self, event: TraceEvent) {
        self.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_log_json_roundtrip() {
        let log = TraceLog {
            events: vec![
                TraceEvent::new(1, "bt.breakpoint.enter").with_node(3),
                TraceEvent::new(2, "agent.drive").with_status(Status::Running),
            ],
        };

        let json = serde_json::to_string(&log).expect("serialize");
        assert!(!json.contains("\"node\":null"));
        let roundtrip: TraceLog = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(roundtrip, log);
    }
}
