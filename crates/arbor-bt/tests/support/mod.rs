#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use arbor_bt::{Leaf, Tree};
use arbor_core::{
    AgentRef, Blackboard, ExecutionContext, Policy, Status, TickContext, VecTraceSink,
};

pub type Log = Arc<Mutex<Vec<String>>>;

pub fn log() -> Log {
    Arc::default()
}

pub fn take(log: &Log) -> Vec<String> {
    std::mem::take(&mut *log.lock().unwrap())
}

/// Returns `steps` one per tick (repeating the last one) and records each
/// tick in the shared log. A reset rewinds the script.
pub struct Script {
    name: &'static str,
    steps: Vec<Status>,
    pos: usize,
    log: Log,
    log_resets: bool,
    log_starts: bool,
}

impl Script {
    pub fn new(name: &'static str, steps: &[Status], log: &Log) -> Self {
        Self {
            name,
            steps: steps.to_vec(),
            pos: 0,
            log: log.clone(),
            log_resets: false,
            log_starts: false,
        }
    }

    pub fn always(name: &'static str, status: Status, log: &Log) -> Self {
        Self::new(name, &[status], log)
    }

    /// Also record `~name` whenever the leaf is reset after having ticked.
    pub fn logging_resets(mut self) -> Self {
        self.log_resets = true;
        self
    }

    /// Also record `start:name` when the leaf is started.
    pub fn logging_starts(mut self) -> Self {
        self.log_starts = true;
        self
    }
}

impl Leaf for Script {
    fn name(&self) -> &str {
        self.name
    }

    fn start(&mut self, _ctx: &mut ExecutionContext<'_>) {
        if self.log_starts {
            self.log.lock().unwrap().push(format!("start:{}", self.name));
        }
    }

    fn tick(&mut self, _ctx: &mut ExecutionContext<'_>) -> Status {
        self.log.lock().unwrap().push(self.name.to_string());
        let status = self.steps[self.pos.min(self.steps.len() - 1)];
        self.pos += 1;
        status
    }

    fn reset(&mut self) {
        if self.log_resets && self.pos > 0 {
            self.log.lock().unwrap().push(format!("~{}", self.name));
        }
        self.pos = 0;
    }
}

/// Drives a bare tree the way a scheduler does, without the scheduling.
pub struct Harness {
    pub agent: AgentRef,
    pub blackboard: Blackboard,
    pub trace: VecTraceSink,
    pub tick: u64,
    pub time: f64,
    pub dt: f64,
    pub debug: bool,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            agent: AgentRef::new(1u64, "tester"),
            blackboard: Blackboard::new(),
            trace: VecTraceSink::default(),
            tick: 0,
            time: 0.0,
            dt: 0.1,
            debug: false,
        }
    }

    pub fn drive(&mut self, tree: &mut Tree) -> Status {
        let tick = TickContext::new(self.tick, self.dt as f32, self.time);
        let mut ctx =
            ExecutionContext::new(tick, &self.agent, &mut self.blackboard, &mut self.trace)
                .with_debug(self.debug);

        if <Tree as Policy>::status(tree) != Status::Running {
            <Tree as Policy>::reset(tree);
        }
        let status = <Tree as Policy>::run(tree, &mut ctx);

        self.tick += 1;
        self.time += self.dt;
        status
    }

    pub fn drive_n(&mut self, tree: &mut Tree, n: usize) -> Vec<Status> {
        (0..n).map(|_| self.drive(tree)).collect()
    }
}
