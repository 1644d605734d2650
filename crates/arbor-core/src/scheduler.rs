//! Per-agent tick loop.
//!
//! The host calls [`Scheduler::update`] from whatever drives its simulation
//! (a frame callback, a fixed-step loop, a test) and the scheduler decides,
//! according to its [`UpdateMode`], whether the tree runs on that update.

use crate::{
    AgentRef, Blackboard, BreakRequest, ExecutionContext, ListenerId, Listeners, NullTraceSink,
    Policy, SchedulerConfig, Status, TickContext, TraceEvent, TraceSink, UpdateMode, UsageWarning,
};

/// Break requests kept for a host that has not drained them yet; older ones
/// are dropped first.
pub const MAX_PENDING_BREAKS: usize = 256;

pub struct Scheduler<P>
where
    P: Policy,
{
    agent: AgentRef,
    config: SchedulerConfig,
    blackboard: Blackboard,
    policy: Option<P>,
    trace: Box<dyn TraceSink>,
    before_tick: Listeners,
    after_tick: Listeners,
    breaks: Vec<BreakRequest>,

    elapsed: f32,
    is_running: bool,
    started: bool,
    drives: u64,
    clock: f64,
    last_drive_clock: Option<f64>,
}

impl<P> Scheduler<P>
where
    P: Policy,
{
    pub fn new(agent: AgentRef, config: SchedulerConfig) -> Self {
        Self {
            agent,
            config,
            blackboard: Blackboard::new(),
            policy: None,
            trace: Box::new(NullTraceSink),
            before_tick: Listeners::new(),
            after_tick: Listeners::new(),
            breaks: Vec::new(),
            elapsed: 0.0,
            is_running: true,
            started: false,
            drives: 0,
            clock: 0.0,
            last_drive_clock: None,
        }
    }

    pub fn with_policy(mut self, policy: P) -> Self {
        self.set_policy(policy);
        self
    }

    pub fn with_blackboard(mut self, blackboard: Blackboard) -> Self {
        self.blackboard = blackboard;
        self
    }

    /// Attach a new policy. It is started again on the next drive.
    pub fn set_policy(&mut self, policy: P) {
        self.policy = Some(policy);
        self.started = false;
    }

    pub fn take_policy(&mut self) -> Option<P> {
        self.started = false;
        self.policy.take()
    }

    pub fn policy(&self) -> Option<&P> {
        self.policy.as_ref()
    }

    pub fn policy_mut(&mut self) -> Option<&mut P> {
        self.policy.as_mut()
    }

    pub fn agent(&self) -> &AgentRef {
        &self.agent
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn blackboard(&self) -> &Blackboard {
        &self.blackboard
    }

    pub fn blackboard_mut(&mut self) -> &mut Blackboard {
        &mut self.blackboard
    }

    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.trace = sink;
    }

    pub fn debug_mode(&self) -> bool {
        self.config.debug_mode
    }

    pub fn set_debug_mode(&mut self, debug_mode: bool) {
        self.config.debug_mode = debug_mode;
    }

    /// Pause flag. Irrelevant in `Manual` mode.
    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Seconds accumulated towards the next interval drive.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Number of times the tree has been driven.
    pub fn drives(&self) -> u64 {
        self.drives
    }

    /// Host clock in seconds: the sum of every `update` delta.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Status the tree reported on its last drive (`Idle` before the first).
    pub fn last_status(&self) -> Status {
        self.policy.as_ref().map(|p| p.status()).unwrap_or_default()
    }

    pub fn on_before_tick(&mut self, callback: impl FnMut() + Send + 'static) -> ListenerId {
        self.before_tick.add(callback)
    }

    pub fn on_after_tick(&mut self, callback: impl FnMut() + Send + 'static) -> ListenerId {
        self.after_tick.add(callback)
    }

    pub fn remove_before_tick(&mut self, id: ListenerId) -> bool {
        self.before_tick.remove(id)
    }

    pub fn remove_after_tick(&mut self, id: ListenerId) -> bool {
        self.after_tick.remove(id)
    }

    /// Drain the breakpoints nodes raised since the last call. At most
    /// [`MAX_PENDING_BREAKS`] are buffered between drains.
    pub fn take_break_requests(&mut self) -> Vec<BreakRequest> {
        std::mem::take(&mut self.breaks)
    }

    /// Start the attached policy. Runs at most once per attached policy; the
    /// first drive calls it when the host did not.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        let tick = self.tick_context();
        let Some(policy) = self.policy.as_mut() else {
            return;
        };

        self.started = true;
        let mut ctx =
            ExecutionContext::new(tick, &self.agent, &mut self.blackboard, &mut *self.trace)
                .with_debug(self.config.debug_mode);
        policy.start(&mut ctx);
        let hits = ctx.into_break_requests();
        self.push_breaks(hits);
        tracing::debug!(agent = self.agent.id, "policy started");
    }

    /// Feed one host update of `dt` seconds. Returns whether the tree ran.
    /// Negative or non-finite deltas are ignored.
    pub fn update(&mut self, dt: f32) -> bool {
        if !dt.is_finite() || dt < 0.0 {
            tracing::warn!(agent = self.agent.id, dt, "ignoring invalid update delta");
            return false;
        }
        self.clock += dt as f64;

        if self.config.update_mode == UpdateMode::Manual || !self.is_running {
            return false;
        }

        self.elapsed += dt;
        if self.config.update_mode == UpdateMode::EveryFrame
            || self.elapsed >= self.config.update_interval
        {
            let ran = self.drive();
            // Overshoot is dropped rather than carried over, so uneven deltas
            // drift later than the nominal interval.
            self.elapsed = 0.0;
            return ran;
        }

        false
    }

    /// Drive the tree once. Only valid in `Manual` mode, where it runs
    /// regardless of the pause flag.
    pub fn tick(&mut self) -> Result<(), UsageWarning> {
        if self.config.update_mode == UpdateMode::Manual {
            self.drive();
            return Ok(());
        }
        self.warn(UsageWarning::TickOutsideManualMode(self.config.update_mode))
    }

    pub fn stop(&mut self) -> Result<(), UsageWarning> {
        if self.config.update_mode != UpdateMode::Manual {
            self.elapsed = 0.0;
            self.is_running = false;
            self.reset_policy();
            return Ok(());
        }

        if self.config.debug_mode {
            // Debug affordance: clear the tree, leave scheduling untouched.
            self.reset_policy();
        }
        self.warn(UsageWarning::StopInManualMode)
    }

    pub fn pause(&mut self) -> Result<(), UsageWarning> {
        if self.config.update_mode != UpdateMode::Manual {
            self.is_running = false;
            return Ok(());
        }
        self.warn(UsageWarning::PauseInManualMode)
    }

    pub fn resume(&mut self) -> Result<(), UsageWarning> {
        if self.config.update_mode != UpdateMode::Manual {
            self.is_running = true;
            return Ok(());
        }
        self.warn(UsageWarning::ResumeInManualMode)
    }

    fn warn(&self, warning: UsageWarning) -> Result<(), UsageWarning> {
        tracing::warn!(agent = self.agent.id, name = %self.agent.name, "{warning}");
        Err(warning)
    }

    fn reset_policy(&mut self) {
        if let Some(policy) = self.policy.as_mut() {
            policy.reset();
            tracing::debug!(agent = self.agent.id, "policy reset");
        }
    }

    fn push_breaks(&mut self, hits: Vec<BreakRequest>) {
        self.breaks.extend(hits);
        let overflow = self.breaks.len().saturating_sub(MAX_PENDING_BREAKS);
        if overflow > 0 {
            self.breaks.drain(..overflow);
            tracing::debug!(agent = self.agent.id, dropped = overflow, "break requests dropped");
        }
    }

    fn tick_context(&self) -> TickContext {
        let dt = match self.last_drive_clock {
            Some(last) => (self.clock - last) as f32,
            None => 0.0,
        };
        TickContext::new(self.drives, dt, self.clock)
    }

    fn drive(&mut self) -> bool {
        if self.policy.is_none() {
            return false;
        }
        self.start();

        let tick = self.tick_context();
        let Some(policy) = self.policy.as_mut() else {
            return false;
        };

        self.before_tick.fire();

        let mut ctx =
            ExecutionContext::new(tick, &self.agent, &mut self.blackboard, &mut *self.trace)
                .with_debug(self.config.debug_mode);

        if policy.status() != Status::Running {
            policy.reset();
            ctx.emit(TraceEvent::new(tick.tick, "agent.reset"));
        }

        let status = policy.run(&mut ctx);
        ctx.emit(TraceEvent::new(tick.tick, "agent.drive").with_status(status));
        let hits = ctx.into_break_requests();
        self.push_breaks(hits);

        self.drives += 1;
        self.last_drive_clock = Some(self.clock);
        tracing::debug!(agent = self.agent.id, tick = tick.tick, %status, "drove policy");

        self.after_tick.fire();
        true
    }
}

impl<P> std::fmt::Debug for Scheduler<P>
where
    P: Policy,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("agent", &self.agent)
            .field("config", &self.config)
            .field("elapsed", &self.elapsed)
            .field("is_running", &self.is_running)
            .field("started", &self.started)
            .field("drives", &self.drives)
            .finish_non_exhaustive()
    }
}

/// Feed one host update to every agent, in stable agent-id order. The slice
/// itself is left in the caller's order.
pub fn update_agents<P>(dt: f32, schedulers: &mut [Scheduler<P>])
where
    P: Policy,
{
    let mut order: Vec<usize> = (0..schedulers.len()).collect();
    order.sort_by_key(|&i| schedulers[i].agent.id);
    for i in order {
        schedulers[i].update(dt);
    }
}
