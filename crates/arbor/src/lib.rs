//! Umbrella crate that re-exports the `arbor-*` building blocks.
//!
//! ```
//! use arbor::prelude::*;
//!
//! let mut tree = Tree::new();
//! let ok = tree.add_leaf(Constant(Status::Success)).unwrap();
//! tree.set_root_child(ok).unwrap();
//!
//! let mut agent = Scheduler::new(AgentRef::new(1u64, "npc"), SchedulerConfig::manual())
//!     .with_policy(tree);
//! agent.tick().unwrap();
//! assert_eq!(agent.last_status(), Status::Success);
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

#[cfg(feature = "core")]
#[cfg_attr(docsrs, doc(cfg(feature = "core")))]
pub use arbor_core as core;

#[cfg(feature = "bt")]
#[cfg_attr(docsrs, doc(cfg(feature = "bt")))]
pub use arbor_bt as bt;

#[cfg(feature = "tools")]
#[cfg_attr(docsrs, doc(cfg(feature = "tools")))]
pub use arbor_tools as tools;

/// The names most hosts need.
pub mod prelude {
    #[cfg(feature = "core")]
    pub use arbor_core::{
        AgentRef, Blackboard, ExecutionContext, Policy, Scheduler, SchedulerConfig, Status,
        UpdateMode, UsageWarning,
    };

    #[cfg(feature = "bt")]
    pub use arbor_bt::{
        instantiate_agent, Action, CompositeKind, Condition, Constant, DecoratorKind, Leaf,
        Registry, Tree, TreeAsset, TreeTemplate,
    };

    #[cfg(feature = "tools")]
    pub use arbor_tools::{SharedTraceSink, TreeSnapshot};
}
