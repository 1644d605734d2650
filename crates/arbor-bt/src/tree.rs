//! Arena-backed tree storage and the per-node run protocol.
//!
//! Every node keeps its own stored [`Status`]; that stored value is the whole
//! resumption mechanism. Each drive walks the tree from the root and every
//! composite or decorator decides locally, from its own state and its
//! children's stored statuses, where control re-enters.

use arbor_core::{BreakPhase, ExecutionContext, Status};

use crate::composite::{Composite, CompositeKind};
use crate::decorator::{Decorator, DecoratorKind};
use crate::leaf::Leaf;
use crate::node::{Breakpoint, Node, NodeId, NodeKind};
use crate::TreeError;

pub struct Tree {
    pub(crate) nodes: Vec<Node>,
    root: NodeId,
    read_only: bool,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// A tree holding only its root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Root { child: None })],
            root: NodeId::new(0),
            read_only: false,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_status(&self) -> Status {
        self.status(self.root)
    }

    /// Number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Stored status of `id`; `Idle` for unknown ids.
    pub fn status(&self, id: NodeId) -> Status {
        self.node(id).map(Node::status).unwrap_or_default()
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    pub fn add_leaf(&mut self, leaf: impl Leaf) -> Result<NodeId, TreeError> {
        self.add_boxed_leaf(Box::new(leaf))
    }

    pub fn add_boxed_leaf(&mut self, leaf: Box<dyn Leaf>) -> Result<NodeId, TreeError> {
        self.push(NodeKind::Leaf(leaf))
    }

    /// Add a composite owning `children`, in order. Every child must exist and
    /// be unattached.
    pub fn add_composite(
        &mut self,
        kind: CompositeKind,
        children: impl IntoIterator<Item = NodeId>,
    ) -> Result<NodeId, TreeError> {
        let children: Vec<NodeId> = children.into_iter().collect();
        self.check_writable()?;
        for (i, child) in children.iter().enumerate() {
            self.check_orphan(*child)?;
            if children[..i].contains(child) {
                return Err(TreeError::AlreadyAttached(*child));
            }
        }

        let id = self.push(NodeKind::Composite(Composite::new(kind, children.clone())))?;
        for child in children {
            self.nodes[child.index()].parent = Some(id);
        }
        Ok(id)
    }

    pub fn add_decorator(
        &mut self,
        kind: DecoratorKind,
        child: Option<NodeId>,
    ) -> Result<NodeId, TreeError> {
        self.check_writable()?;
        if let Some(child) = child {
            self.check_orphan(child)?;
        }

        let id = self.push(NodeKind::Decorator(Decorator::new(kind, child)))?;
        if let Some(child) = child {
            self.nodes[child.index()].parent = Some(id);
        }
        Ok(id)
    }

    pub fn set_root_child(&mut self, child: NodeId) -> Result<(), TreeError> {
        self.attach(self.root, child)
    }

    /// Make `child` the last child of `parent`.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.check_writable()?;
        if self.node(parent).is_none() {
            return Err(TreeError::UnknownNode(parent));
        }
        self.check_orphan(child)?;

        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            if id == child {
                return Err(TreeError::Cycle { parent, child });
            }
            cursor = self.nodes[id.index()].parent;
        }

        match &mut self.nodes[parent.index()].kind {
            NodeKind::Root { child: slot } => {
                if slot.is_some() {
                    return Err(TreeError::ChildLimit(parent));
                }
                *slot = Some(child);
            }
            NodeKind::Decorator(d) => {
                if d.child().is_some() {
                    return Err(TreeError::ChildLimit(parent));
                }
                d.set_child(child);
            }
            NodeKind::Composite(c) => c.push_child(child),
            NodeKind::Leaf(_) => return Err(TreeError::LeafHasNoChildren(parent)),
        }

        self.nodes[child.index()].parent = Some(parent);
        Ok(())
    }

    pub fn set_title(&mut self, id: NodeId, title: impl Into<String>) -> Result<(), TreeError> {
        self.check_writable()?;
        let node = self
            .nodes
            .get_mut(id.index())
            .ok_or(TreeError::UnknownNode(id))?;
        node.title = Some(title.into());
        Ok(())
    }

    /// Breakpoints are a debugging toggle and may be changed on read-only
    /// trees.
    pub fn set_breakpoint(&mut self, id: NodeId, breakpoint: Breakpoint) -> Result<(), TreeError> {
        let node = self
            .nodes
            .get_mut(id.index())
            .ok_or(TreeError::UnknownNode(id))?;
        node.breakpoint = breakpoint;
        Ok(())
    }

    /// Depth-first, pre-order walk from the root, with each node's depth.
    pub fn walk(&self) -> Vec<(NodeId, usize)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            out.push((id, depth));
            for child in self.nodes[id.index()].children().iter().rev() {
                stack.push((*child, depth + 1));
            }
        }
        out
    }

    /// Start the subtree at `id`: forwards to the children that will be
    /// invoked first.
    pub fn start_node(&mut self, id: NodeId, ctx: &mut ExecutionContext<'_>) {
        let Some(node) = self.nodes.get_mut(id.index()) else {
            return;
        };

        let first_only = match &mut node.kind {
            NodeKind::Leaf(leaf) => {
                leaf.start(ctx);
                return;
            }
            NodeKind::Composite(c) => !matches!(c.kind(), CompositeKind::Parallel(_)),
            NodeKind::Root { .. } | NodeKind::Decorator(_) => true,
        };

        let count = if first_only {
            node.children().len().min(1)
        } else {
            node.children().len()
        };
        for i in 0..count {
            if let Some(child) = self.nodes[id.index()].child_at(i) {
                self.start_node(child, ctx);
            }
        }
    }

    /// Clear the stored status and per-activation state of `id` and its
    /// whole subtree.
    pub fn reset_node(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get_mut(id.index()) else {
            return;
        };

        node.status = Status::Idle;
        match &mut node.kind {
            NodeKind::Root { .. } => {}
            NodeKind::Composite(c) => c.reset_state(),
            NodeKind::Decorator(d) => d.reset_state(),
            NodeKind::Leaf(leaf) => leaf.reset(),
        }

        let count = node.children().len();
        for i in 0..count {
            if let Some(child) = self.nodes[id.index()].child_at(i) {
                self.reset_node(child);
            }
        }
    }

    /// Run `id` for one tick.
    ///
    /// A `Running` node resumes. A node that finished earlier (stored
    /// `Success`/`Failure`) is reset first so it begins a fresh activation.
    /// The result becomes the node's stored status.
    pub fn run_node(&mut self, id: NodeId, ctx: &mut ExecutionContext<'_>) -> Status {
        let Some(node) = self.nodes.get(id.index()) else {
            return Status::Failure;
        };
        let breakpoint = node.breakpoint;
        let root_child = match &node.kind {
            NodeKind::Root { child } => Some(*child),
            _ => None,
        };

        if node.status.is_terminal() {
            self.reset_node(id);
        }
        if breakpoint.on_enter() {
            ctx.request_break(id.index(), BreakPhase::Enter);
        }

        let status = match root_child {
            Some(child) => self.run_root(id, child, ctx),
            None => self.dispatch(id, ctx),
        };

        self.nodes[id.index()].status = status;
        if breakpoint.on_exit() {
            ctx.request_break(id.index(), BreakPhase::Exit);
        }
        status
    }

    fn dispatch(&mut self, id: NodeId, ctx: &mut ExecutionContext<'_>) -> Status {
        match &mut self.nodes[id.index()].kind {
            NodeKind::Leaf(leaf) => match leaf.tick(ctx) {
                Status::Idle => {
                    tracing::warn!(node = id.index(), leaf = leaf.name(), "leaf returned idle");
                    Status::Failure
                }
                status => status,
            },
            NodeKind::Composite(_) => self.run_composite(id, ctx),
            NodeKind::Decorator(_) => self.run_decorator(id, ctx),
            NodeKind::Root { child } => {
                let child = *child;
                self.run_root(id, child, ctx)
            }
        }
    }

    fn run_root(
        &mut self,
        id: NodeId,
        child: Option<NodeId>,
        ctx: &mut ExecutionContext<'_>,
    ) -> Status {
        match child {
            Some(child) => self.run_node(child, ctx),
            None => {
                ctx.trace("bt.root.no_child", id.index());
                Status::Failure
            }
        }
    }

    /// Reset every direct child of `id` that is still running.
    pub(crate) fn halt_running_children(&mut self, id: NodeId) {
        let count = self.nodes[id.index()].children().len();
        for i in 0..count {
            let Some(child) = self.nodes[id.index()].child_at(i) else {
                continue;
            };
            if self.status(child).is_running() {
                self.reset_node(child);
            }
        }
    }

    fn push(&mut self, kind: NodeKind) -> Result<NodeId, TreeError> {
        self.check_writable()?;
        let index = u32::try_from(self.nodes.len()).map_err(|_| TreeError::Full)?;
        self.nodes.push(Node::new(kind));
        Ok(NodeId::new(index))
    }

    fn check_writable(&self) -> Result<(), TreeError> {
        if self.read_only {
            return Err(TreeError::ReadOnly);
        }
        Ok(())
    }

    fn check_orphan(&self, child: NodeId) -> Result<(), TreeError> {
        let node = self.node(child).ok_or(TreeError::UnknownNode(child))?;
        if child == self.root {
            return Err(TreeError::RootAsChild);
        }
        if node.parent.is_some() {
            return Err(TreeError::AlreadyAttached(child));
        }
        Ok(())
    }
}

impl std::fmt::Debug for Tree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tree")
            .field("root", &self.root)
            .field("read_only", &self.read_only)
            .field("nodes", &self.nodes)
            .finish()
    }
}
