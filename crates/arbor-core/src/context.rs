use serde::{Deserialize, Serialize};

use crate::{AgentRef, Blackboard, TickContext, TraceEvent, TraceSink};

/// Which side of a node a breakpoint is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakPhase {
    Enter,
    Exit,
}

/// A node asked the host to stop and look at the tree.
///
/// Requests are only raised while the context is in debug mode. Nothing in the
/// engine acts on them: the host decides whether to pause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakRequest {
    pub tick: u64,
    pub node: usize,
    pub phase: BreakPhase,
}

/// Everything a node can see while it runs.
///
/// Built by the scheduler for a single drive and threaded through every
/// `run`/`start` call of that drive.
pub struct ExecutionContext<'a> {
    tick: TickContext,
    agent: &'a AgentRef,
    pub blackboard: &'a mut Blackboard,
    debug: bool,
    trace: &'a mut dyn TraceSink,
    breaks: Vec<BreakRequest>,
}

impl<'a> ExecutionContext<'a> {
    pub fn new(
        tick: TickContext,
        agent: &'a AgentRef,
        blackboard: &'a mut Blackboard,
        trace: &'a mut dyn TraceSink,
    ) -> Self {
        Self {
            tick,
            agent,
            blackboard,
            debug: false,
            trace,
            breaks: Vec::new(),
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn tick(&self) -> &TickContext {
        &self.tick
    }

    pub fn agent(&self) -> &AgentRef {
        self.agent
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn emit(&mut self, event: TraceEvent) {
        self.trace.emit(event);
    }

    /// Record a trace event stamped with the current tick.
    pub fn trace(&mut self, tag: &'static str, node: usize) {
        let event = TraceEvent::new(self.tick.tick, tag).with_node(node);
        self.trace.emit(event);
    }

    /// Ask the host to break at `node`. Ignored outside debug mode.
    pub fn request_break(&mut self, node: usize, phase: BreakPhase) -> bool {
        if !self.debug {
            return false;
        }

        tracing::info!(
            agent = self.agent.id,
            tick = self.tick.tick,
            node,
            ?phase,
            "breakpoint hit"
        );
        let tag = match phase {
            BreakPhase::Enter => "bt.breakpoint.enter",
            BreakPhase::Exit => "bt.breakpoint.exit",
        };
        self.trace(tag, node);
        self.breaks.push(BreakRequest {
            tick: self.tick.tick,
            node,
            phase,
        });
        true
    }

    pub fn break_requests(&self) -> &[BreakRequest] {
        &self.breaks
    }

    pub fn into_break_requests(self) -> Vec<BreakRequest> {
        self.breaks
    }
}
