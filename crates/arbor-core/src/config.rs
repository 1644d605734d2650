//! Scheduler configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// How the scheduler decides when to drive the tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateMode {
    /// Drive on every host update.
    #[default]
    EveryFrame,
    /// Drive once the accumulated host time reaches `update_interval`.
    Interval,
    /// Never self-drive; only explicit `tick()` calls run the tree.
    Manual,
}

impl UpdateMode {
    pub fn as_str(self) -> &'static str {
        match self {
            UpdateMode::EveryFrame => "every_frame",
            UpdateMode::Interval => "interval",
            UpdateMode::Manual => "manual",
        }
    }
}

impl fmt::Display for UpdateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-agent scheduling options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub update_mode: UpdateMode,

    /// Seconds between drives. Only consulted in `Interval` mode.
    pub update_interval: f32,

    /// Lets nodes honor breakpoints.
    pub debug_mode: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            update_mode: UpdateMode::EveryFrame,
            update_interval: 0.0,
            debug_mode: false,
        }
    }
}

impl SchedulerConfig {
    pub fn every_frame() -> Self {
        Self::default()
    }

    pub fn interval(seconds: f32) -> Self {
        Self {
            update_mode: UpdateMode::Interval,
            update_interval: seconds,
            ..Self::default()
        }
    }

    pub fn manual() -> Self {
        Self {
            update_mode: UpdateMode::Manual,
            ..Self::default()
        }
    }

    pub fn with_debug(mut self, debug_mode: bool) -> Self {
        self.debug_mode = debug_mode;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.update_interval.is_finite() || self.update_interval < 0.0 {
            return Err(ConfigError::InvalidInterval(self.update_interval));
        }
        Ok(())
    }
}
