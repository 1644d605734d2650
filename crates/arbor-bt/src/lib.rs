//! Behavior tree runtime built on `arbor-core`.
//!
//! Trees live in an arena ([`Tree`]) of closed node kinds: one root, the
//! [`Composite`] and [`Decorator`] families, and open [`Leaf`] implementations
//! at the edges. A [`Tree`] is an [`arbor_core::Policy`], so a
//! [`arbor_core::Scheduler`] drives it directly.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod composite;
pub mod decorator;
pub mod error;
pub mod leaf;
pub mod node;
pub mod policy;
pub mod record;
pub mod registry;
pub mod template;
pub mod tree;

pub use composite::{Composite, CompositeKind, ParallelPolicy, Threshold};
pub use decorator::{Decorator, DecoratorKind};
pub use error::{MaterializeError, TreeError};
pub use leaf::{Action, CompareValue, Condition, Constant, HasKey, Leaf, Log, SetValue, Wait};
pub use node::{Breakpoint, Node, NodeId, NodeKind};
pub use record::{NodeRecord, TreeRecord};
pub use registry::{NodeSeed, Registry};
pub use template::{instantiate_agent, TreeAsset, TreeTemplate};
pub use tree::Tree;
