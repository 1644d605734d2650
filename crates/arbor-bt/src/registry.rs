//! Kind registry: maps a record's `kind` string to a node constructor.
//!
//! Composites and decorators are closed sets and are always registered;
//! hosts add their own leaf kinds with [`Registry::register_leaf`].

use std::collections::BTreeMap;
use std::fmt;

use arbor_core::Status;

use crate::composite::{CompositeKind, ParallelPolicy, Threshold};
use crate::decorator::DecoratorKind;
use crate::leaf::{CompareValue, Constant, HasKey, Leaf, Log, SetValue, Wait};
use crate::node::NodeId;
use crate::record::{NodeRecord, TreeRecord};
use crate::{MaterializeError, Tree};

/// What a constructor yields for one record. Children are wired up by the
/// registry.
pub enum NodeSeed {
    Composite(CompositeKind),
    Decorator(DecoratorKind),
    Leaf(Box<dyn Leaf>),
}

impl NodeSeed {
    pub fn leaf(leaf: impl Leaf) -> Self {
        NodeSeed::Leaf(Box::new(leaf))
    }

    fn max_children(&self) -> Option<usize> {
        match self {
            NodeSeed::Composite(_) => None,
            NodeSeed::Decorator(_) => Some(1),
            NodeSeed::Leaf(_) => Some(0),
        }
    }
}

impl fmt::Debug for NodeSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeSeed::Composite(kind) => f.debug_tuple("Composite").field(kind).finish(),
            NodeSeed::Decorator(kind) => f.debug_tuple("Decorator").field(kind).finish(),
            NodeSeed::Leaf(leaf) => f.debug_tuple("Leaf").field(&leaf.name()).finish(),
        }
    }
}

type Constructor = Box<dyn Fn(&NodeRecord) -> Result<NodeSeed, MaterializeError> + Send + Sync>;

pub struct Registry {
    kinds: BTreeMap<String, Constructor>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl Registry {
    /// A registry with no kinds at all.
    pub fn empty() -> Self {
        Self {
            kinds: BTreeMap::new(),
        }
    }

    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();

        registry.register("sequence", |_| Ok(NodeSeed::Composite(CompositeKind::Sequence)));
        registry.register("selector", |_| Ok(NodeSeed::Composite(CompositeKind::Selector)));
        registry.register("reactive_sequence", |_| {
            Ok(NodeSeed::Composite(CompositeKind::ReactiveSequence))
        });
        registry.register("reactive_selector", |_| {
            Ok(NodeSeed::Composite(CompositeKind::ReactiveSelector))
        });
        registry.register("parallel", |record| {
            Ok(NodeSeed::Composite(CompositeKind::Parallel(parallel_policy(record)?)))
        });

        registry.register("repeat_forever", |_| {
            Ok(NodeSeed::Decorator(DecoratorKind::RepeatForever))
        });
        registry.register("inverter", |_| Ok(NodeSeed::Decorator(DecoratorKind::Inverter)));
        registry.register("succeeder", |_| Ok(NodeSeed::Decorator(DecoratorKind::Succeeder)));
        registry.register("failer", |_| Ok(NodeSeed::Decorator(DecoratorKind::Failer)));
        registry.register("repeat", |record| {
            let times = record.require_u32("times")?;
            Ok(NodeSeed::Decorator(DecoratorKind::Repeat { times }))
        });
        registry.register("time_limit", |record| {
            let seconds = record.require_f64("seconds")?;
            Ok(NodeSeed::Decorator(DecoratorKind::TimeLimit { seconds }))
        });

        registry.register_leaf("succeed", |_| Ok(Constant(Status::Success)));
        registry.register_leaf("fail", |_| Ok(Constant(Status::Failure)));
        registry.register_leaf("wait", |record| Ok(Wait::new(record.require_f64("seconds")?)));
        registry.register_leaf("set_value", |record| {
            Ok(SetValue::new(
                record.require_str("key")?,
                record.require("value")?.clone(),
            ))
        });
        registry.register_leaf("has_key", |record| Ok(HasKey::new(record.require_str("key")?)));
        registry.register_leaf("compare_value", |record| {
            Ok(CompareValue::new(
                record.require_str("key")?,
                record.require("value")?.clone(),
            ))
        });
        registry.register_leaf("log", |record| Ok(Log::new(record.require_str("message")?)));

        registry
    }

    /// Register (or replace) the constructor for `kind`.
    pub fn register<F>(&mut self, kind: impl Into<String>, constructor: F)
    where
        F: Fn(&NodeRecord) -> Result<NodeSeed, MaterializeError> + Send + Sync + 'static,
    {
        self.kinds.insert(kind.into(), Box::new(constructor));
    }

    pub fn register_leaf<L, F>(&mut self, kind: impl Into<String>, constructor: F)
    where
        L: Leaf,
        F: Fn(&NodeRecord) -> Result<L, MaterializeError> + Send + Sync + 'static,
    {
        self.register(kind, move |record| {
            constructor(record).map(|leaf| NodeSeed::Leaf(Box::new(leaf)))
        });
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.kinds.contains_key(kind)
    }

    /// Registered kind names, sorted.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.kinds.keys().map(String::as_str)
    }

    /// Build a fresh, independent tree from `record`.
    pub fn materialize(&self, record: &TreeRecord) -> Result<Tree, MaterializeError> {
        let mut tree = Tree::new();
        if let Some(root) = &record.root {
            let child = self.build(&mut tree, root)?;
            tree.set_root_child(child)?;
        }
        Ok(tree)
    }

    fn build(&self, tree: &mut Tree, record: &NodeRecord) -> Result<NodeId, MaterializeError> {
        let constructor = self
            .kinds
            .get(&record.kind)
            .ok_or_else(|| MaterializeError::UnknownKind(record.kind.clone()))?;
        let seed = constructor(record)?;

        if let Some(max) = seed.max_children() {
            if record.children.len() > max {
                return Err(MaterializeError::TooManyChildren {
                    kind: record.kind.clone(),
                    max,
                    found: record.children.len(),
                });
            }
        }

        let children = record
            .children
            .iter()
            .map(|child| self.build(tree, child))
            .collect::<Result<Vec<_>, _>>()?;

        let id = match seed {
            NodeSeed::Composite(kind) => tree.add_composite(kind, children)?,
            NodeSeed::Decorator(kind) => tree.add_decorator(kind, children.first().copied())?,
            NodeSeed::Leaf(leaf) => tree.add_boxed_leaf(leaf)?,
        };
        if let Some(title) = &record.title {
            tree.set_title(id, title.clone())?;
        }
        tree.set_breakpoint(id, record.breakpoint)?;
        Ok(id)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.kinds.keys()).finish()
    }
}

/// `success` and `failure` params take `one`, `all` or `{ at_least: n }`.
fn parallel_policy(record: &NodeRecord) -> Result<ParallelPolicy, MaterializeError> {
    let mut policy = ParallelPolicy::default();
    if let Some(value) = record.param("success") {
        policy.success = threshold(record, "success", value)?;
    }
    if let Some(value) = record.param("failure") {
        policy.failure = threshold(record, "failure", value)?;
    }
    Ok(policy)
}

fn threshold(
    record: &NodeRecord,
    name: &str,
    value: &serde_json::Value,
) -> Result<Threshold, MaterializeError> {
    serde_json::from_value(value.clone()).map_err(|err| record.invalid(name, err.to_string()))
}
