//! Decorator nodes: wrap one child and transform its status or gate its
//! invocation.
//!
//! A decorator with no attached child reports `Failure`.

use arbor_core::{ExecutionContext, Status};

use crate::node::{NodeId, NodeKind};
use crate::Tree;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DecoratorKind {
    /// Re-runs its child forever and always reports `Running`.
    RepeatForever,
    Inverter,
    /// `Success` for any finished child.
    Succeeder,
    /// `Failure` for any finished child.
    Failer,
    /// Succeeds once the child has succeeded `times` times in this
    /// activation; fails as soon as the child fails.
    Repeat { times: u32 },
    /// Fails, aborting the child, if the child is still running `seconds`
    /// after this activation began.
    TimeLimit { seconds: f64 },
}

impl DecoratorKind {
    pub fn name(&self) -> &'static str {
        match self {
            DecoratorKind::RepeatForever => "repeat_forever",
            DecoratorKind::Inverter => "inverter",
            DecoratorKind::Succeeder => "succeeder",
            DecoratorKind::Failer => "failer",
            DecoratorKind::Repeat { .. } => "repeat",
            DecoratorKind::TimeLimit { .. } => "time_limit",
        }
    }
}

#[derive(Debug)]
pub struct Decorator {
    kind: DecoratorKind,
    child: Option<NodeId>,
    completed: u32,
    started_at: Option<f64>,
}

impl Decorator {
    pub(crate) fn new(kind: DecoratorKind, child: Option<NodeId>) -> Self {
        Self {
            kind,
            child,
            completed: 0,
            started_at: None,
        }
    }

    pub fn kind(&self) -> &DecoratorKind {
        &self.kind
    }

    pub fn child(&self) -> Option<NodeId> {
        self.child
    }

    /// Child successes counted by `Repeat` in this activation.
    pub fn completed(&self) -> u32 {
        self.completed
    }

    pub(crate) fn child_slice(&self) -> &[NodeId] {
        self.child.as_slice()
    }

    pub(crate) fn set_child(&mut self, child: NodeId) {
        self.child = Some(child);
    }

    pub(crate) fn reset_state(&mut self) {
        self.completed = 0;
        self.started_at = None;
    }
}

impl Tree {
    fn decorator_mut(&mut self, id: NodeId) -> Option<&mut Decorator> {
        match &mut self.nodes.get_mut(id.index())?.kind {
            NodeKind::Decorator(d) => Some(d),
            _ => None,
        }
    }

    pub(crate) fn run_decorator(&mut self, id: NodeId, ctx: &mut ExecutionContext<'_>) -> Status {
        let Some((kind, child)) = self.decorator_mut(id).map(|d| (d.kind, d.child)) else {
            return Status::Failure;
        };
        let Some(child) = child else {
            tracing::debug!(node = id.index(), kind = kind.name(), "decorator has no child");
            ctx.trace("bt.decorator.no_child", id.index());
            return Status::Failure;
        };

        match kind {
            DecoratorKind::RepeatForever => {
                // A finished child is reset by `run_node` before it is
                // entered again; an idle or running one is invoked as is.
                self.run_node(child, ctx);
                Status::Running
            }
            DecoratorKind::Inverter => match self.run_node(child, ctx) {
                Status::Success => Status::Failure,
                Status::Failure => Status::Success,
                status => status,
            },
            DecoratorKind::Succeeder => match self.run_node(child, ctx) {
                Status::Running => Status::Running,
                _ => Status::Success,
            },
            DecoratorKind::Failer => match self.run_node(child, ctx) {
                Status::Running => Status::Running,
                _ => Status::Failure,
            },
            DecoratorKind::Repeat { times } => {
                if times == 0 {
                    return Status::Success;
                }
                match self.run_node(child, ctx) {
                    Status::Success => {
                        let completed = match self.decorator_mut(id) {
                            Some(d) => {
                                d.completed += 1;
                                d.completed
                            }
                            None => times,
                        };
                        if completed >= times {
                            Status::Success
                        } else {
                            Status::Running
                        }
                    }
                    status => status,
                }
            }
            DecoratorKind::TimeLimit { seconds } => {
                let now = ctx.tick().time_seconds;
                let started = self
                    .decorator_mut(id)
                    .map_or(now, |d| *d.started_at.get_or_insert(now));

                let status = self.run_node(child, ctx);
                if status.is_running() && ctx.tick().seconds_since(started) >= seconds {
                    self.reset_node(child);
                    ctx.trace("bt.time_limit.expired", id.index());
                    return Status::Failure;
                }
                status
            }
        }
    }
}
