/// Timing information for one drive of a tree.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickContext {
    /// Number of drives completed before this one.
    pub tick: u64,
    /// Host seconds elapsed since the previous drive (0 for the first one).
    pub dt_seconds: f32,
    /// Host clock in seconds, as fed to the scheduler.
    pub time_seconds: f64,
}

impl TickContext {
    pub fn new(tick: u64, dt_seconds: f32, time_seconds: f64) -> Self {
        Self {
            tick,
            dt_seconds,
            time_seconds,
        }
    }

    /// Seconds of host clock elapsed since `since`.
    pub fn seconds_since(&self, since: f64) -> f64 {
        (self.time_seconds - since).max(0.0)
    }
}
