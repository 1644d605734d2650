//! Leaf nodes: the terminal work units of a tree.
//!
//! Leaves are the one open extension point. Everything else in a tree is one
//! of the closed node kinds.

use arbor_core::{ExecutionContext, Status, Value};

/// A terminal unit of work (action or condition).
///
/// `start` runs once when the scheduler first starts the tree, and only
/// reaches the leaves the tree invokes first: the first child of each
/// sequence or selector, every child of a parallel. Later siblings never see
/// it, so per-activation setup belongs in `tick` or `reset`. `reset` runs
/// before every fresh entry, so a leaf must not rely on anything `tick`
/// stored before it.
pub trait Leaf: Send + 'static {
    fn name(&self) -> &str {
        "leaf"
    }

    fn start(&mut self, _ctx: &mut ExecutionContext<'_>) {}

    /// Returning `Status::Idle` is a malformed result and is recorded as
    /// `Failure`.
    fn tick(&mut self, ctx: &mut ExecutionContext<'_>) -> Status;

    fn reset(&mut self) {}
}

/// Boolean check against the context.
pub struct Condition<F> {
    cond: F,
}

impl<F> Condition<F>
where
    F: FnMut(&ExecutionContext<'_>) -> bool + Send + 'static,
{
    pub fn new(cond: F) -> Self {
        Self { cond }
    }
}

impl<F> Leaf for Condition<F>
where
    F: FnMut(&ExecutionContext<'_>) -> bool + Send + 'static,
{
    fn name(&self) -> &str {
        "condition"
    }

    fn tick(&mut self, ctx: &mut ExecutionContext<'_>) -> Status {
        Status::from_bool((self.cond)(&*ctx))
    }
}

/// Closure-backed action. The closure owns whatever state it needs to resume.
pub struct Action<F> {
    run: F,
}

impl<F> Action<F>
where
    F: FnMut(&mut ExecutionContext<'_>) -> Status + Send + 'static,
{
    pub fn new(run: F) -> Self {
        Self { run }
    }
}

impl<F> Leaf for Action<F>
where
    F: FnMut(&mut ExecutionContext<'_>) -> Status + Send + 'static,
{
    fn name(&self) -> &str {
        "action"
    }

    fn tick(&mut self, ctx: &mut ExecutionContext<'_>) -> Status {
        (self.run)(ctx)
    }
}

/// Always returns the same status.
#[derive(Debug, Clone, Copy)]
pub struct Constant(pub Status);

impl Leaf for Constant {
    fn name(&self) -> &str {
        match self.0 {
            Status::Success => "succeed",
            Status::Failure => "fail",
            Status::Running => "running",
            Status::Idle => "idle",
        }
    }

    fn tick(&mut self, _ctx: &mut ExecutionContext<'_>) -> Status {
        self.0
    }
}

/// Running until `seconds` of host clock have passed since this activation
/// began.
#[derive(Debug, Clone)]
pub struct Wait {
    seconds: f64,
    started_at: Option<f64>,
}

impl Wait {
    pub fn new(seconds: f64) -> Self {
        Self {
            seconds,
            started_at: None,
        }
    }
}

impl Leaf for Wait {
    fn name(&self) -> &str {
        "wait"
    }

    fn tick(&mut self, ctx: &mut ExecutionContext<'_>) -> Status {
        let now = ctx.tick().time_seconds;
        let started = *self.started_at.get_or_insert(now);
        if ctx.tick().seconds_since(started) >= self.seconds {
            Status::Success
        } else {
            Status::Running
        }
    }

    fn reset(&mut self) {
        self.started_at = None;
    }
}

/// Writes a fixed value to the blackboard.
#[derive(Debug, Clone)]
pub struct SetValue {
    key: String,
    value: Value,
}

impl SetValue {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl Leaf for SetValue {
    fn name(&self) -> &str {
        "set_value"
    }

    fn tick(&mut self, ctx: &mut ExecutionContext<'_>) -> Status {
        ctx.blackboard.set(self.key.clone(), self.value.clone());
        Status::Success
    }
}

/// Succeeds when the blackboard holds `key`.
#[derive(Debug, Clone)]
pub struct HasKey {
    key: String,
}

impl HasKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl Leaf for HasKey {
    fn name(&self) -> &str {
        "has_key"
    }

    fn tick(&mut self, ctx: &mut ExecutionContext<'_>) -> Status {
        Status::from_bool(ctx.blackboard.has(&self.key))
    }
}

/// Succeeds when the blackboard value at `key` equals `value`.
#[derive(Debug, Clone)]
pub struct CompareValue {
    key: String,
    value: Value,
}

impl CompareValue {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl Leaf for CompareValue {
    fn name(&self) -> &str {
        "compare_value"
    }

    fn tick(&mut self, ctx: &mut ExecutionContext<'_>) -> Status {
        Status::from_bool(ctx.blackboard.get(&self.key) == Some(&self.value))
    }
}

/// Emits an info log line and succeeds.
#[derive(Debug, Clone)]
pub struct Log {
    message: String,
}

impl Log {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Leaf for Log {
    fn name(&self) -> &str {
        "log"
    }

    fn tick(&mut self, ctx: &mut ExecutionContext<'_>) -> Status {
        tracing::info!(
            agent = ctx.agent().id,
            tick = ctx.tick().tick,
            "{}",
            self.message
        );
        Status::Success
    }
}
