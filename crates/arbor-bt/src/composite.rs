//! Composite nodes: route control across an ordered list of children.
//!
//! Empty composites follow the vacuous-truth convention: sequence-style kinds
//! (`Sequence`, `ReactiveSequence`, `Parallel`) succeed, selector-style kinds
//! (`Selector`, `ReactiveSelector`) fail.

use arbor_core::{ExecutionContext, Status};
use serde::{Deserialize, Serialize};

use crate::node::{NodeId, NodeKind};
use crate::Tree;

/// How many children must reach an outcome for a parallel node to adopt it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Threshold {
    One,
    All,
    AtLeast(usize),
}

impl Threshold {
    /// Number of children required out of `len` (clamped to `1..=len`).
    pub fn required(self, len: usize) -> usize {
        match self {
            Threshold::One => 1,
            Threshold::All => len,
            Threshold::AtLeast(n) => n.clamp(1, len.max(1)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParallelPolicy {
    pub success: Threshold,
    pub failure: Threshold,
}

impl Default for ParallelPolicy {
    fn default() -> Self {
        Self {
            success: Threshold::All,
            failure: Threshold::One,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompositeKind {
    /// Runs children in order, remembering the running child across ticks.
    Sequence,
    /// Tries children in order until one succeeds, remembering the running
    /// child across ticks.
    Selector,
    /// Re-checks earlier children every tick; aborts the running child when
    /// an earlier one takes over.
    ReactiveSequence,
    ReactiveSelector,
    /// Runs every unfinished child each tick and folds the results through
    /// the policy thresholds.
    Parallel(ParallelPolicy),
}

impl CompositeKind {
    pub fn name(&self) -> &'static str {
        match self {
            CompositeKind::Sequence => "sequence",
            CompositeKind::Selector => "selector",
            CompositeKind::ReactiveSequence => "reactive_sequence",
            CompositeKind::ReactiveSelector => "reactive_selector",
            CompositeKind::Parallel(_) => "parallel",
        }
    }
}

#[derive(Debug)]
pub struct Composite {
    kind: CompositeKind,
    children: Vec<NodeId>,
    cursor: usize,
    running: Option<usize>,
}

impl Composite {
    pub(crate) fn new(kind: CompositeKind, children: Vec<NodeId>) -> Self {
        Self {
            kind,
            children,
            cursor: 0,
            running: None,
        }
    }

    pub fn kind(&self) -> &CompositeKind {
        &self.kind
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Index of the child a memory composite resumes at.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) fn push_child(&mut self, child: NodeId) {
        self.children.push(child);
    }

    pub(crate) fn reset_state(&mut self) {
        self.cursor = 0;
        self.running = None;
    }
}

impl Tree {
    fn composite_mut(&mut self, id: NodeId) -> Option<&mut Composite> {
        match &mut self.nodes.get_mut(id.index())?.kind {
            NodeKind::Composite(c) => Some(c),
            _ => None,
        }
    }

    fn composite(&self, id: NodeId) -> Option<&Composite> {
        match &self.nodes.get(id.index())?.kind {
            NodeKind::Composite(c) => Some(c),
            _ => None,
        }
    }

    pub(crate) fn run_composite(&mut self, id: NodeId, ctx: &mut ExecutionContext<'_>) -> Status {
        let Some(kind) = self.composite(id).map(|c| c.kind) else {
            return Status::Failure;
        };

        match kind {
            CompositeKind::Sequence => self.run_memory(id, ctx, Status::Success),
            CompositeKind::Selector => self.run_memory(id, ctx, Status::Failure),
            CompositeKind::ReactiveSequence => self.run_reactive(id, ctx, Status::Success),
            CompositeKind::ReactiveSelector => self.run_reactive(id, ctx, Status::Failure),
            CompositeKind::Parallel(policy) => self.run_parallel(id, ctx, policy),
        }
    }

    /// `advance_on` is the child result that moves on to the next sibling; it
    /// is also the result once every child has produced it.
    fn run_memory(
        &mut self,
        id: NodeId,
        ctx: &mut ExecutionContext<'_>,
        advance_on: Status,
    ) -> Status {
        loop {
            let Some(composite) = self.composite(id) else {
                return Status::Failure;
            };
            let Some(child) = composite.children.get(composite.cursor).copied() else {
                return advance_on;
            };

            let status = self.run_node(child, ctx);
            if status != advance_on {
                return status;
            }
            if let Some(composite) = self.composite_mut(id) {
                composite.cursor += 1;
            }
        }
    }

    fn run_reactive(
        &mut self,
        id: NodeId,
        ctx: &mut ExecutionContext<'_>,
        advance_on: Status,
    ) -> Status {
        let len = self.composite(id).map_or(0, |c| c.children.len());
        for i in 0..len {
            let Some(child) = self.nodes[id.index()].child_at(i) else {
                break;
            };

            let status = self.run_node(child, ctx);
            if status == advance_on {
                continue;
            }

            if status.is_running() {
                let previous = self.composite(id).and_then(|c| c.running);
                if previous != Some(i) {
                    let previous_child =
                        previous.and_then(|p| self.nodes[id.index()].child_at(p));
                    if let Some(prev) = previous_child {
                        self.reset_node(prev);
                    }
                    if let Some(composite) = self.composite_mut(id) {
                        composite.running = Some(i);
                    }
                }
                return Status::Running;
            }

            self.finish_composite(id);
            return status;
        }

        self.finish_composite(id);
        advance_on
    }

    fn run_parallel(
        &mut self,
        id: NodeId,
        ctx: &mut ExecutionContext<'_>,
        policy: ParallelPolicy,
    ) -> Status {
        let len = self.composite(id).map_or(0, |c| c.children.len());
        if len == 0 {
            return Status::Success;
        }

        let mut successes = 0;
        let mut failures = 0;
        let mut running = 0;
        for i in 0..len {
            let Some(child) = self.nodes[id.index()].child_at(i) else {
                continue;
            };

            // Children that already finished in this activation keep their
            // result; the rest are started or resumed.
            let stored = self.status(child);
            let status = if stored.is_terminal() {
                stored
            } else {
                self.run_node(child, ctx)
            };

            match status {
                Status::Success => successes += 1,
                Status::Failure => failures += 1,
                Status::Running | Status::Idle => running += 1,
            }
        }

        let need_success = policy.success.required(len);
        let need_failure = policy.failure.required(len);
        let status = if successes >= need_success {
            Status::Success
        } else if failures >= need_failure || successes + running < need_success {
            Status::Failure
        } else {
            Status::Running
        };

        if status.is_terminal() {
            self.finish_composite(id);
        }
        status
    }

    fn finish_composite(&mut self, id: NodeId) {
        self.halt_running_children(id);
        if let Some(composite) = self.composite_mut(id) {
            composite.running = None;
        }
    }
}
