//! Agent configuration for `arbor run`, loaded from YAML.

use std::path::Path;

use anyhow::{bail, Context, Result};
use arbor_core::{AgentRef, Blackboard, SchedulerConfig, Value};
use serde::{Deserialize, Serialize};

/// ```yaml
/// agent: { id: 7, name: guard }
/// scheduler: { update_mode: interval, update_interval: 0.25 }
/// blackboard: { alert: false }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub agent: AgentSection,
    pub scheduler: SchedulerConfig,
    pub blackboard: Blackboard,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSection {
    pub id: u64,
    pub name: String,
}

impl Default for AgentSection {
    fn default() -> Self {
        Self {
            id: default_agent_id(),
            name: default_agent_name(),
        }
    }
}

fn default_agent_id() -> u64 {
    1
}
fn default_agent_name() -> String {
    "agent".to_string()
}

impl RunConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_yaml_str(&source).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_yaml_str(source: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(source)?;
        config.scheduler.validate()?;
        Ok(config)
    }

    pub fn agent_ref(&self) -> AgentRef {
        AgentRef::new(self.agent.id, self.agent.name.clone())
    }
}

/// Parse a `key=value` blackboard assignment. The value is read as JSON when
/// it parses, otherwise kept as a plain string.
pub fn parse_assignment(raw: &str) -> Result<(String, Value)> {
    let Some((key, value)) = raw.split_once('=') else {
        bail!("expected key=value, got '{raw}'");
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("empty blackboard key in '{raw}'");
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_core::UpdateMode;

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config = RunConfig::from_yaml_str("scheduler: { update_mode: manual }").unwrap();
        assert_eq!(config.scheduler.update_mode, UpdateMode::Manual);
        assert_eq!(config.agent.id, 1);
        assert_eq!(config.agent.name, "agent");
        assert!(config.blackboard.is_empty());
    }

    #[test]
    fn negative_interval_is_rejected() {
        let err = RunConfig::from_yaml_str(
            "scheduler: { update_mode: interval, update_interval: -1.0 }",
        )
        .unwrap_err();
        assert!(err.to_string().contains("interval"), "{err}");
    }

    #[test]
    fn assignments_prefer_json_values() {
        assert_eq!(
            parse_assignment("hp=12").unwrap(),
            ("hp".to_string(), Value::from(12))
        );
        assert_eq!(
            parse_assignment("name=bob").unwrap(),
            ("name".to_string(), Value::from("bob"))
        );
        assert_eq!(
            parse_assignment("flag=true").unwrap().1,
            Value::Bool(true)
        );
        assert!(parse_assignment("novalue").is_err());
        assert!(parse_assignment("=3").is_err());
    }
}
