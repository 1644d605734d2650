//! Debugging helpers for arbor trees.
//!
//! Kept out of the runtime crates: nothing here is needed to drive a tree,
//! only to look at one.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod snapshot;
pub mod trace;

pub use snapshot::{NodeSnapshot, TreeSnapshot};
pub use trace::SharedTraceSink;
