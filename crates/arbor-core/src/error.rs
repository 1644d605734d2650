use thiserror::Error;

use crate::UpdateMode;

/// A scheduler control was called in a mode where it has no meaning.
///
/// The call is a no-op. Callers may ignore it; it is also logged as a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UsageWarning {
    #[error("can't pause agent: update mode is set to 'manual'")]
    PauseInManualMode,

    #[error("can't resume agent: update mode is set to 'manual'")]
    ResumeInManualMode,

    #[error("can't stop agent: update mode is set to 'manual'")]
    StopInManualMode,

    #[error("can't tick agent: update mode is '{0}', needs to be 'manual'")]
    TickOutsideManualMode(UpdateMode),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("update interval must be a finite, non-negative number of seconds (got {0})")]
    InvalidInterval(f32),
}
