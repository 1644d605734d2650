use thiserror::Error;

use crate::NodeId;

/// Rejected structural change to a [`Tree`](crate::Tree).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("tree is read-only")]
    ReadOnly,

    #[error("node {0} does not exist")]
    UnknownNode(NodeId),

    #[error("the root node can't be attached as a child")]
    RootAsChild,

    #[error("node {0} already has a parent")]
    AlreadyAttached(NodeId),

    #[error("attaching {child} under {parent} would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },

    #[error("node {0} already has its only child")]
    ChildLimit(NodeId),

    #[error("leaf node {0} can't have children")]
    LeafHasNoChildren(NodeId),

    #[error("tree can't hold more than {} nodes", u32::MAX)]
    Full,
}

/// Failure to turn saved records into a runtime tree.
#[derive(Debug, Error)]
pub enum MaterializeError {
    #[error("unknown node kind '{0}'")]
    UnknownKind(String),

    #[error("node kind '{kind}' is missing parameter '{param}'")]
    MissingParam { kind: String, param: String },

    #[error("node kind '{kind}' has invalid parameter '{param}': {reason}")]
    InvalidParam {
        kind: String,
        param: String,
        reason: String,
    },

    #[error("node kind '{kind}' accepts at most {max} children, got {found}")]
    TooManyChildren {
        kind: String,
        max: usize,
        found: usize,
    },

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error("failed to read tree record: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse tree record as YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to parse tree record as JSON: {0}")]
    Json(#[from] serde_json::Error),
}
