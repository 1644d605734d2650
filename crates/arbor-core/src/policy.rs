use crate::{ExecutionContext, Status};

/// What a scheduler drives once per tick.
///
/// A behavior tree is the usual implementor; the trait keeps the scheduler
/// independent of how the tree is stored.
pub trait Policy: Send + 'static {
    /// Called once per activation, before the first `run`.
    fn start(&mut self, ctx: &mut ExecutionContext<'_>);

    /// Status stored by the top-level node after the last `run`.
    fn status(&self) -> Status;

    /// Clear all in-flight state so the next `run` starts fresh.
    fn reset(&mut self);

    fn run(&mut self, ctx: &mut ExecutionContext<'_>) -> Status;
}
