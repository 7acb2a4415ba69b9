mod common;

use common::{Harness, log};
use strand::tools::{for_each, for_range};
use strand::{Strategy, Tier};

use std::collections::BTreeMap;

#[test]
fn test_for_each_one_item_per_step() {
    let h = Harness::new(Strategy::Concurrent, Tier::Normal);
    let seen = log();

    let sink = seen.clone();
    let id = for_each(&h.scheduler, vec!["ada", "grace", "linus"], move |name| {
        sink.borrow_mut().push(name)
    });

    assert!(seen.borrow().is_empty(), "Nothing runs before the first pulse");

    h.scheduler.pulse();
    assert_eq!(*seen.borrow(), vec!["ada"]);

    h.scheduler.pulse();
    assert_eq!(*seen.borrow(), vec!["ada", "grace"]);

    h.scheduler.pulse();
    h.scheduler.pulse();
    assert_eq!(*seen.borrow(), vec!["ada", "grace", "linus"]);
    assert!(!h.scheduler.contains(id));
}

#[test]
fn test_for_each_over_map() {
    let h = Harness::new(Strategy::Sequential, Tier::Normal);
    let seen = log();

    let scores = BTreeMap::from([("blue", 3), ("red", 5)]);

    let sink = seen.clone();
    for_each(&h.scheduler, scores, move |(team, score)| {
        sink.borrow_mut().push(format!("{team}={score}"))
    });

    h.run_until_idle(5);

    assert_eq!(*seen.borrow(), vec!["blue=3", "red=5"]);
}

fn collect_range(from: i64, to: i64, step: i64) -> Vec<i64> {
    let h = Harness::new(Strategy::Sequential, Tier::Extreme);
    let seen = log();

    let sink = seen.clone();
    for_range(&h.scheduler, from, to, step, move |i| sink.borrow_mut().push(i));
    h.run_until_idle(10);

    seen.borrow().clone()
}

#[test]
fn test_for_range_counts_up() {
    assert_eq!(collect_range(1, 10, 3), vec![1, 4, 7, 10]);
    assert_eq!(collect_range(0, 0, 1), vec![0]);
}

#[test]
fn test_for_range_counts_down() {
    assert_eq!(collect_range(10, 1, -2), vec![10, 8, 6, 4, 2]);
}

#[test]
fn test_for_range_empty() {
    assert!(collect_range(1, 10, 0).is_empty(), "Zero step visits nothing");
    assert!(collect_range(10, 1, 1).is_empty(), "Step moving away from the bound");
}

#[test]
fn test_for_range_does_not_overflow() {
    assert_eq!(
        collect_range(i64::MAX - 1, i64::MAX, 5),
        vec![i64::MAX - 1]
    );
}
