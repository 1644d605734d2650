use std::fmt;

use serde::{Deserialize, Serialize};

/// Result of running a node for one tick.
///
/// The value is both what a node returns to its parent and what it keeps as
/// its stored status until the next reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Never started, or cleared by a reset.
    #[default]
    Idle,
    Success,
    Failure,
    /// Suspended mid-work. The next run resumes instead of restarting.
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Success,
    Failure,
}

impl From<Outcome> for Status {
    fn from(value: Outcome) -> Self {
        match value {
            Outcome::Success => Status::Success,
            Outcome::Failure => Status::Failure,
        }
    }
}

impl Status {
    pub fn from_bool(ok: bool) -> Self {
        if ok {
            Status::Success
        } else {
            Status::Failure
        }
    }

    /// `Success` or `Failure`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Status::Success | Status::Failure)
    }

    pub fn is_running(self) -> bool {
        self == Status::Running
    }

    pub fn outcome(self) -> Option<Outcome> {
        match self {
            Status::Success => Some(Outcome::Success),
            Status::Failure => Some(Outcome::Failure),
            Status::Idle | Status::Running => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Idle => "idle",
            Status::Success => "success",
            Status::Failure => "failure",
            Status::Running => "running",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
