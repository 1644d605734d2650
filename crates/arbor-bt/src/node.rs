use std::fmt;

use arbor_core::Status;
use serde::{Deserialize, Serialize};

use crate::composite::Composite;
use crate::decorator::Decorator;
use crate::leaf::Leaf;

/// Index of a node inside its [`Tree`](crate::Tree) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a node asks the host to break while the agent is in debug mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Breakpoint {
    #[default]
    None,
    OnEnter,
    OnExit,
    Both,
}

impl Breakpoint {
    pub fn on_enter(self) -> bool {
        matches!(self, Breakpoint::OnEnter | Breakpoint::Both)
    }

    pub fn on_exit(self) -> bool {
        matches!(self, Breakpoint::OnExit | Breakpoint::Both)
    }
}

/// The closed set of node shapes. Only leaves are open for extension.
pub enum NodeKind {
    Root { child: Option<NodeId> },
    Composite(Composite),
    Decorator(Decorator),
    Leaf(Box<dyn Leaf>),
}

impl NodeKind {
    pub fn name(&self) -> &str {
        match self {
            NodeKind::Root { .. } => "root",
            NodeKind::Composite(c) => c.kind().name(),
            NodeKind::Decorator(d) => d.kind().name(),
            NodeKind::Leaf(leaf) => leaf.name(),
        }
    }

    pub fn children(&self) -> &[NodeId] {
        match self {
            NodeKind::Root { child } => child.as_slice(),
            NodeKind::Composite(c) => c.children(),
            NodeKind::Decorator(d) => d.child_slice(),
            NodeKind::Leaf(_) => &[],
        }
    }
}

impl fmt::Debug for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Root { child } => f.debug_struct("Root").field("child", child).finish(),
            NodeKind::Composite(c) => fmt::Debug::fmt(c, f),
            NodeKind::Decorator(d) => fmt::Debug::fmt(d, f),
            NodeKind::Leaf(leaf) => f.debug_tuple("Leaf").field(&leaf.name()).finish(),
        }
    }
}

#[derive(Debug)]
pub struct Node {
    pub(crate) status: Status,
    pub(crate) title: Option<String>,
    pub(crate) breakpoint: Breakpoint,
    pub(crate) parent: Option<NodeId>,
    pub(crate) kind: NodeKind,
}

impl Node {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Self {
            status: Status::Idle,
            title: None,
            breakpoint: Breakpoint::None,
            parent: None,
            kind,
        }
    }

    /// Stored status. Only meaningful between a run and the next reset.
    pub fn status(&self) -> Status {
        self.status
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Title when set, otherwise the kind name.
    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or_else(|| self.kind.name())
    }

    pub fn breakpoint(&self) -> Breakpoint {
        self.breakpoint
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn children(&self) -> &[NodeId] {
        self.kind.children()
    }

    pub(crate) fn child_at(&self, index: usize) -> Option<NodeId> {
        self.kind.children().get(index).copied()
    }
}
