mod support;

use arbor_bt::{CompositeKind, DecoratorKind, ParallelPolicy, Tree};
use arbor_core::{Policy, Status};
use proptest::prelude::*;

use support::{log, take, Harness, Log, Script};

const NAMES: [&str; 5] = ["a", "b", "c", "d", "e"];

fn status() -> impl Strategy<Value = Status> {
    prop_oneof![
        Just(Status::Success),
        Just(Status::Failure),
        Just(Status::Running),
    ]
}

fn shape() -> impl Strategy<Value = (u8, Vec<Vec<Status>>)> {
    (
        0u8..6,
        prop::collection::vec(prop::collection::vec(status(), 1..4), 0..5),
    )
}

fn build(kind: u8, scripts: &[Vec<Status>], log: &Log) -> Tree {
    let mut tree = Tree::new();
    let children = scripts
        .iter()
        .zip(NAMES)
        .map(|(steps, name)| tree.add_leaf(Script::new(name, steps, log)).unwrap())
        .collect::<Vec<_>>();

    let composite = match kind {
        0 => CompositeKind::Sequence,
        1 => CompositeKind::Selector,
        2 => CompositeKind::ReactiveSequence,
        3 => CompositeKind::ReactiveSelector,
        _ => CompositeKind::Parallel(ParallelPolicy::default()),
    };
    let mut top = tree.add_composite(composite, children).unwrap();
    if kind == 5 {
        top = tree
            .add_decorator(DecoratorKind::RepeatForever, Some(top))
            .unwrap();
    }
    tree.set_root_child(top).unwrap();
    tree
}

proptest! {
    #[test]
    fn reset_then_run_matches_a_fresh_tree(
        (kind, scripts) in shape(),
        warmup in 0usize..5,
        drives in 1usize..6,
    ) {
        let used_log = log();
        let mut used = build(kind, &scripts, &used_log);
        let mut harness = Harness::new();
        harness.drive_n(&mut used, warmup);
        Policy::reset(&mut used);
        take(&used_log);

        let fresh_log = log();
        let mut fresh = build(kind, &scripts, &fresh_log);

        let used_statuses = Harness::new().drive_n(&mut used, drives);
        let fresh_statuses = Harness::new().drive_n(&mut fresh, drives);

        prop_assert_eq!(used_statuses, fresh_statuses);
        prop_assert_eq!(take(&used_log), take(&fresh_log));
        prop_assert_eq!(used.root_status(), fresh.root_status());
    }
}
