mod support;

use arbor_bt::{Action, CompositeKind, Condition, ParallelPolicy, Threshold, Tree};
use arbor_core::Status;

use support::{log, take, Harness, Script};

fn tree_with(kind: CompositeKind, leaves: Vec<Script>) -> Tree {
    let mut tree = Tree::new();
    let children = leaves
        .into_iter()
        .map(|leaf| tree.add_leaf(leaf).unwrap())
        .collect::<Vec<_>>();
    let composite = tree.add_composite(kind, children).unwrap();
    tree.set_root_child(composite).unwrap();
    tree
}

#[test]
fn empty_composites_use_vacuous_results() {
    let cases = [
        (CompositeKind::Sequence, Status::Success),
        (CompositeKind::ReactiveSequence, Status::Success),
        (CompositeKind::Parallel(ParallelPolicy::default()), Status::Success),
        (CompositeKind::Selector, Status::Failure),
        (CompositeKind::ReactiveSelector, Status::Failure),
    ];

    for (kind, expected) in cases {
        let mut tree = tree_with(kind, Vec::new());
        assert_eq!(Harness::new().drive(&mut tree), expected, "{}", kind.name());
    }
}

#[test]
fn sequence_resumes_at_the_running_child() {
    let log = log();
    let mut tree = tree_with(
        CompositeKind::Sequence,
        vec![
            Script::always("a", Status::Success, &log),
            Script::new("b", &[Status::Running, Status::Running, Status::Success], &log),
            Script::always("c", Status::Success, &log),
        ],
    );
    let mut harness = Harness::new();

    assert_eq!(harness.drive(&mut tree), Status::Running);
    assert_eq!(take(&log), ["a", "b"]);

    assert_eq!(harness.drive(&mut tree), Status::Running);
    assert_eq!(take(&log), ["b"]);

    assert_eq!(harness.drive(&mut tree), Status::Success);
    assert_eq!(take(&log), ["b", "c"]);

    // A finished tree starts over from the first child.
    assert_eq!(harness.drive(&mut tree), Status::Running);
    assert_eq!(take(&log), ["a", "b"]);
}

#[test]
fn sequence_stops_at_first_failure() {
    let log = log();
    let mut tree = tree_with(
        CompositeKind::Sequence,
        vec![
            Script::always("a", Status::Success, &log),
            Script::always("b", Status::Failure, &log),
            Script::always("c", Status::Success, &log),
        ],
    );

    assert_eq!(Harness::new().drive(&mut tree), Status::Failure);
    assert_eq!(take(&log), ["a", "b"]);
}

#[test]
fn selector_stops_at_first_success() {
    let log = log();
    let mut tree = tree_with(
        CompositeKind::Selector,
        vec![
            Script::always("a", Status::Failure, &log),
            Script::always("b", Status::Success, &log),
            Script::always("c", Status::Success, &log),
        ],
    );

    assert_eq!(Harness::new().drive(&mut tree), Status::Success);
    assert_eq!(take(&log), ["a", "b"]);
}

#[test]
fn memory_sequence_does_not_recheck_finished_children() {
    let log = log();
    let mut tree = tree_with(
        CompositeKind::Sequence,
        vec![
            Script::new("guard", &[Status::Success, Status::Failure], &log),
            Script::always("work", Status::Running, &log),
        ],
    );
    let mut harness = Harness::new();

    harness.drive_n(&mut tree, 3);
    assert_eq!(take(&log), ["guard", "work", "work", "work"]);
}

#[test]
fn reactive_sequence_aborts_running_child_when_guard_fails() {
    let log = log();
    let mut tree = Tree::new();
    let guard = tree
        .add_leaf(Condition::new(|ctx| {
            ctx.blackboard.get_bool("go").unwrap_or(false)
        }))
        .unwrap();
    let work = tree
        .add_leaf(Script::always("work", Status::Running, &log).logging_resets())
        .unwrap();
    let seq = tree
        .add_composite(CompositeKind::ReactiveSequence, [guard, work])
        .unwrap();
    tree.set_root_child(seq).unwrap();

    let mut harness = Harness::new();
    harness.blackboard.set("go", true);
    assert_eq!(harness.drive(&mut tree), Status::Running);
    assert_eq!(harness.drive(&mut tree), Status::Running);
    assert_eq!(take(&log), ["work", "work"]);

    harness.blackboard.set("go", false);
    assert_eq!(harness.drive(&mut tree), Status::Failure);
    assert_eq!(take(&log), ["~work"]);
    assert_eq!(tree.status(work), Status::Idle);
}

#[test]
fn reactive_selector_switches_to_higher_priority_branch() {
    let log = log();
    let mut tree = Tree::new();
    let flee = tree
        .add_leaf(Action::new(|ctx| {
            if ctx.blackboard.get_bool("threat").unwrap_or(false) {
                Status::Running
            } else {
                Status::Failure
            }
        }))
        .unwrap();
    let patrol = tree
        .add_leaf(Script::always("patrol", Status::Running, &log).logging_resets())
        .unwrap();
    let sel = tree
        .add_composite(CompositeKind::ReactiveSelector, [flee, patrol])
        .unwrap();
    tree.set_root_child(sel).unwrap();

    let mut harness = Harness::new();
    assert_eq!(harness.drive(&mut tree), Status::Running);
    assert_eq!(take(&log), ["patrol"]);

    harness.blackboard.set("threat", true);
    assert_eq!(harness.drive(&mut tree), Status::Running);
    assert_eq!(take(&log), ["~patrol"]);
    assert_eq!(tree.status(flee), Status::Running);
    assert_eq!(tree.status(patrol), Status::Idle);
}

#[test]
fn parallel_latches_finished_children() {
    let log = log();
    let mut tree = tree_with(
        CompositeKind::Parallel(ParallelPolicy::default()),
        vec![
            Script::always("a", Status::Success, &log),
            Script::new("b", &[Status::Running, Status::Success], &log),
        ],
    );
    let mut harness = Harness::new();

    assert_eq!(harness.drive(&mut tree), Status::Running);
    assert_eq!(take(&log), ["a", "b"]);

    assert_eq!(harness.drive(&mut tree), Status::Success);
    assert_eq!(take(&log), ["b"]);
}

#[test]
fn parallel_failure_halts_running_siblings() {
    let log = log();
    let mut tree = tree_with(
        CompositeKind::Parallel(ParallelPolicy::default()),
        vec![
            Script::always("a", Status::Failure, &log),
            Script::always("b", Status::Running, &log).logging_resets(),
        ],
    );

    assert_eq!(Harness::new().drive(&mut tree), Status::Failure);
    assert_eq!(take(&log), ["a", "b", "~b"]);
}

#[test]
fn parallel_success_threshold_wins_over_failures() {
    let log = log();
    let policy = ParallelPolicy {
        success: Threshold::One,
        failure: Threshold::One,
    };
    let mut tree = tree_with(
        CompositeKind::Parallel(policy),
        vec![
            Script::always("a", Status::Failure, &log),
            Script::always("b", Status::Success, &log),
        ],
    );

    assert_eq!(Harness::new().drive(&mut tree), Status::Success);
}

#[test]
fn parallel_fails_once_success_is_unreachable() {
    let log = log();
    let policy = ParallelPolicy {
        success: Threshold::All,
        failure: Threshold::AtLeast(2),
    };
    let mut tree = tree_with(
        CompositeKind::Parallel(policy),
        vec![
            Script::always("a", Status::Failure, &log),
            Script::always("b", Status::Running, &log),
            Script::always("c", Status::Running, &log),
        ],
    );

    assert_eq!(Harness::new().drive(&mut tree), Status::Failure);
}

#[test]
fn leaf_reporting_idle_counts_as_failure() {
    let log = log();
    let mut tree = tree_with(
        CompositeKind::Selector,
        vec![
            Script::always("broken", Status::Idle, &log),
            Script::always("fallback", Status::Success, &log),
        ],
    );

    assert_eq!(Harness::new().drive(&mut tree), Status::Success);
    assert_eq!(take(&log), ["broken", "fallback"]);
}
