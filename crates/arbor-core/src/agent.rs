use core::fmt::Debug;

use serde::{Deserialize, Serialize};

/// Stable identifier for an agent.
///
/// Deterministic multi-agent updates require:
/// - stable ordering (`Ord`)
/// - a stable numeric ID (`stable_id`) for ordering and logs
pub trait AgentId: Copy + Ord + Eq + Debug {
    fn stable_id(self) -> u64;
}

impl AgentId for u64 {
    fn stable_id(self) -> u64 {
        self
    }
}

impl AgentId for u32 {
    fn stable_id(self) -> u64 {
        self as u64
    }
}

impl AgentId for usize {
    fn stable_id(self) -> u64 {
        self as u64
    }
}

/// Identity of the agent that owns a tree, handed to nodes through the
/// execution context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRef {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    /// Optional handle to the controlled body when it differs from the agent
    /// itself.
    #[serde(default)]
    pub body: Option<String>,
}

impl AgentRef {
    pub fn new(id: impl AgentId, name: impl Into<String>) -> Self {
        Self {
            id: id.stable_id(),
            name: name.into(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// The controlled body, falling back to the agent's own name.
    pub fn body(&self) -> &str {
        self.body.as_deref().unwrap_or(&self.name)
    }
}

impl Default for AgentRef {
    fn default() -> Self {
        Self::new(0u64, "agent")
    }
}
