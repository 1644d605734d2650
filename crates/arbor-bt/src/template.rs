//! Shareable tree definitions.
//!
//! A template is immutable and may be shared by any number of agents; every
//! agent gets its own freshly materialized [`Tree`].

use std::path::Path;
use std::sync::Arc;

use arbor_core::{AgentRef, Scheduler, SchedulerConfig};

use crate::record::TreeRecord;
use crate::registry::Registry;
use crate::{MaterializeError, Tree};

pub trait TreeTemplate {
    /// Build a new tree. No node state is shared between two results.
    fn materialize(&self) -> Result<Tree, MaterializeError>;
}

impl<F> TreeTemplate for F
where
    F: Fn() -> Tree,
{
    fn materialize(&self) -> Result<Tree, MaterializeError> {
        Ok(self())
    }
}

/// A saved record bound to the registry that knows its kinds.
#[derive(Debug, Clone)]
pub struct TreeAsset {
    record: TreeRecord,
    registry: Arc<Registry>,
    read_only: bool,
}

impl TreeAsset {
    pub fn new(record: TreeRecord, registry: Arc<Registry>) -> Self {
        Self {
            record,
            registry,
            read_only: false,
        }
    }

    pub fn from_yaml_str(source: &str, registry: Arc<Registry>) -> Result<Self, MaterializeError> {
        Ok(Self::new(TreeRecord::from_yaml_str(source)?, registry))
    }

    /// Load a `.json` file as JSON and anything else as YAML.
    pub fn load(path: &Path, registry: Arc<Registry>) -> Result<Self, MaterializeError> {
        let source = std::fs::read_to_string(path)?;
        let record = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => TreeRecord::from_json_str(&source)?,
            _ => TreeRecord::from_yaml_str(&source)?,
        };
        Ok(Self::new(record, registry))
    }

    /// Mark every materialized tree read-only.
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn record(&self) -> &TreeRecord {
        &self.record
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl TreeTemplate for TreeAsset {
    fn materialize(&self) -> Result<Tree, MaterializeError> {
        let mut tree = self.registry.materialize(&self.record)?;
        tree.set_read_only(self.read_only);
        Ok(tree)
    }
}

/// Create a scheduler for `agent` owning a fresh tree from `template`.
pub fn instantiate_agent<T>(
    template: &T,
    agent: AgentRef,
    config: SchedulerConfig,
) -> Result<Scheduler<Tree>, MaterializeError>
where
    T: TreeTemplate + ?Sized,
{
    let tree = template.materialize()?;
    tracing::debug!(
        agent = agent.id,
        name = %agent.name,
        nodes = tree.node_count(),
        "instantiated agent"
    );
    Ok(Scheduler::new(agent, config).with_policy(tree))
}
