//! Engine-agnostic behavior tree kernel primitives.
//!
//! This crate holds everything a tree runs *against*: statuses, the agent's
//! blackboard and identity, the per-drive execution context, trace events, and
//! the [`Scheduler`] that decides when a [`Policy`] gets driven.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod agent;
pub mod blackboard;
pub mod config;
pub mod context;
pub mod error;
pub mod listeners;
pub mod policy;
pub mod scheduler;
pub mod status;
pub mod tick;
pub mod trace;

pub use agent::{AgentId, AgentRef};
pub use blackboard::Blackboard;
pub use config::{SchedulerConfig, UpdateMode};
pub use context::{BreakPhase, BreakRequest, ExecutionContext};
pub use error::{ConfigError, UsageWarning};
pub use listeners::{ListenerId, Listeners};
pub use policy::Policy;
pub use scheduler::{update_agents, Scheduler, MAX_PENDING_BREAKS};
pub use status::{Outcome, Status};
pub use tick::TickContext;
pub use trace::{NullTraceSink, TraceEvent, TraceLog, TraceSink, VecTraceSink};

pub use serde_json::Value;
