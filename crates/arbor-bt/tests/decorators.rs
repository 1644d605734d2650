mod support;

use arbor_bt::{Action, DecoratorKind, Tree};
use arbor_core::Status;

use support::{log, take, Harness, Script};

fn decorated(kind: DecoratorKind, leaf: Script) -> Tree {
    let mut tree = Tree::new();
    let child = tree.add_leaf(leaf).unwrap();
    let decorator = tree.add_decorator(kind, Some(child)).unwrap();
    tree.set_root_child(decorator).unwrap();
    tree
}

#[test]
fn repeat_forever_is_always_running() {
    for child_status in [Status::Success, Status::Failure] {
        let log = log();
        let mut tree = decorated(
            DecoratorKind::RepeatForever,
            Script::always("child", child_status, &log),
        );

        let statuses = Harness::new().drive_n(&mut tree, 4);
        assert_eq!(statuses, [Status::Running; 4]);
        assert_eq!(take(&log), ["child"; 4]);
    }
}

#[test]
fn repeat_forever_hides_alternating_child_outcomes() {
    let mut tree = Tree::new();
    let mut calls = 0u32;
    let flaky = tree
        .add_leaf(Action::new(move |_| {
            calls += 1;
            if calls % 2 == 1 {
                Status::Success
            } else {
                Status::Failure
            }
        }))
        .unwrap();
    let forever = tree
        .add_decorator(DecoratorKind::RepeatForever, Some(flaky))
        .unwrap();
    tree.set_root_child(forever).unwrap();

    let mut harness = Harness::new();
    let mut seen = Vec::new();
    for _ in 0..4 {
        assert_eq!(harness.drive(&mut tree), Status::Running);
        seen.push(tree.status(flaky));
    }
    assert_eq!(
        seen,
        [Status::Success, Status::Failure, Status::Success, Status::Failure]
    );
}

#[test]
fn repeat_forever_resumes_running_child_and_restarts_finished_one() {
    let log = log();
    let mut tree = decorated(
        DecoratorKind::RepeatForever,
        Script::new("child", &[Status::Running, Status::Running, Status::Success], &log)
            .logging_resets(),
    );
    let mut harness = Harness::new();

    harness.drive_n(&mut tree, 3);
    assert_eq!(take(&log), ["child", "child", "child"]);

    harness.drive(&mut tree);
    assert_eq!(take(&log), ["~child", "child"]);
}

#[test]
fn status_mapping_decorators() {
    let cases = [
        (DecoratorKind::Inverter, Status::Success, Status::Failure),
        (DecoratorKind::Inverter, Status::Failure, Status::Success),
        (DecoratorKind::Inverter, Status::Running, Status::Running),
        (DecoratorKind::Succeeder, Status::Failure, Status::Success),
        (DecoratorKind::Succeeder, Status::Running, Status::Running),
        (DecoratorKind::Failer, Status::Success, Status::Failure),
        (DecoratorKind::Failer, Status::Running, Status::Running),
    ];

    for (kind, child, expected) in cases {
        let log = log();
        let mut tree = decorated(kind, Script::always("child", child, &log));
        assert_eq!(
            Harness::new().drive(&mut tree),
            expected,
            "{} over {child}",
            kind.name()
        );
    }
}

#[test]
fn repeat_counts_child_successes() {
    let log = log();
    let mut tree = decorated(
        DecoratorKind::Repeat { times: 3 },
        Script::always("child", Status::Success, &log),
    );

    let statuses = Harness::new().drive_n(&mut tree, 3);
    assert_eq!(statuses, [Status::Running, Status::Running, Status::Success]);
    assert_eq!(take(&log).len(), 3);
}

#[test]
fn repeat_fails_with_child_and_zero_times_succeeds_untouched() {
    let log = log();
    let mut tree = decorated(
        DecoratorKind::Repeat { times: 3 },
        Script::always("child", Status::Failure, &log),
    );
    assert_eq!(Harness::new().drive(&mut tree), Status::Failure);

    let mut tree = decorated(
        DecoratorKind::Repeat { times: 0 },
        Script::always("zero", Status::Failure, &log),
    );
    assert_eq!(Harness::new().drive(&mut tree), Status::Success);
    assert_eq!(take(&log), ["child"]);
}

#[test]
fn time_limit_aborts_slow_child() {
    let log = log();
    let mut tree = decorated(
        DecoratorKind::TimeLimit { seconds: 0.25 },
        Script::always("slow", Status::Running, &log).logging_resets(),
    );
    let mut harness = Harness::new();

    let statuses = harness.drive_n(&mut tree, 4);
    assert_eq!(
        statuses,
        [Status::Running, Status::Running, Status::Running, Status::Failure]
    );
    assert_eq!(take(&log), ["slow", "slow", "slow", "slow", "~slow"]);
    assert!(harness.trace.tags().contains(&"bt.time_limit.expired"));

    // The next activation gets a fresh budget.
    assert_eq!(harness.drive(&mut tree), Status::Running);
}

#[test]
fn time_limit_passes_through_fast_child() {
    let log = log();
    let mut tree = decorated(
        DecoratorKind::TimeLimit { seconds: 1.0 },
        Script::new("fast", &[Status::Running, Status::Success], &log),
    );

    let statuses = Harness::new().drive_n(&mut tree, 2);
    assert_eq!(statuses, [Status::Running, Status::Success]);
}

#[test]
fn childless_decorator_and_root_fail() {
    let mut tree = Tree::new();
    let lonely = tree.add_decorator(DecoratorKind::Inverter, None).unwrap();
    tree.set_root_child(lonely).unwrap();

    let mut harness = Harness::new();
    assert_eq!(harness.drive(&mut tree), Status::Failure);
    assert!(harness.trace.tags().contains(&"bt.decorator.no_child"));

    let mut empty = Tree::new();
    let mut harness = Harness::new();
    assert_eq!(harness.drive(&mut empty), Status::Failure);
    assert_eq!(harness.trace.tags(), ["bt.root.no_child"]);
}
