use arbor_core::{ExecutionContext, Policy, Status};

use crate::Tree;

/// A tree is driven through its root; nothing else is invoked directly by a
/// scheduler.
impl Policy for Tree {
    fn start(&mut self, ctx: &mut ExecutionContext<'_>) {
        let root = self.root();
        self.start_node(root, ctx);
    }

    fn status(&self) -> Status {
        self.root_status()
    }

    fn reset(&mut self) {
        let root = self.root();
        self.reset_node(root);
    }

    fn run(&mut self, ctx: &mut ExecutionContext<'_>) -> Status {
        let root = self.root();
        self.run_node(root, ctx)
    }
}
