mod common;

use common::{Harness, counter, log};
use strand::pulse::Ticker;
use strand::time::{Clock, ManualClock};
use strand::{Scheduler, Strategy, ThreadOptions, ThreadState, Tier};

use std::rc::Rc;
use std::time::Duration;

fn ticker() -> Rc<Ticker> {
    Rc::new(Ticker::new(Rc::new(ManualClock::new())))
}

#[test]
fn test_create_defaults() {
    let scheduler = Scheduler::create(ticker(), None, None);

    assert_eq!(scheduler.strategy(), Strategy::Concurrent);
    assert_eq!(scheduler.tier(), Tier::Normal);
    assert!(scheduler.is_empty());
    assert!(!scheduler.is_pulsing(), "An empty scheduler should not pulse");
}

#[test]
fn test_create_from_names() {
    let scheduler = Scheduler::create(ticker(), Some("sequential"), Some("extreme"));

    assert_eq!(scheduler.strategy(), Strategy::Sequential);
    assert_eq!(scheduler.tier(), Tier::Extreme);
}

#[test]
fn test_create_falls_back_on_invalid_names() {
    let scheduler = Scheduler::create(ticker(), Some("parallel"), Some("ludicrous"));

    assert_eq!(scheduler.strategy(), Strategy::Concurrent);
    assert_eq!(scheduler.tier(), Tier::Normal);

    let id = scheduler.spawn(|_| async { Ok(()) });
    assert!(scheduler.contains(id), "Fallback scheduler should stay usable");
}

#[test]
fn test_register_assigns_increasing_ids() {
    let h = Harness::new(Strategy::Concurrent, Tier::Normal);

    let a = h.scheduler.spawn(|_| async { Ok(()) });
    let b = h.scheduler.spawn(|_| async { Ok(()) });
    h.scheduler.remove(b);
    let c = h.scheduler.spawn(|_| async { Ok(()) });

    assert!(a < b && b < c, "Ids must increase and never be reused");
    assert_eq!(h.scheduler.ids(), vec![a, c]);
}

#[test]
fn test_register_starts_pulse() {
    let h = Harness::new(Strategy::Concurrent, Tier::Normal);

    h.scheduler.spawn(|_| async { Ok(()) });

    assert!(h.scheduler.is_pulsing());
    assert_eq!(h.scheduler.pulse_interval(), Some(Duration::from_millis(100)));
    assert_eq!(h.ticker.len(), 1);
}

#[test]
fn test_register_does_not_run_thread() {
    let h = Harness::new(Strategy::Concurrent, Tier::Normal);
    let log = log();

    let id = counter(&h.scheduler, &log, 'a', 3, ThreadOptions::new());

    assert!(log.borrow().is_empty(), "Registration must not resume the thread");
    assert!(!h.scheduler.is_started(id));
    assert_eq!(h.scheduler.state(id), Some(ThreadState::Pending));

    h.step();

    assert!(h.scheduler.is_started(id));
    assert_eq!(h.scheduler.state(id), Some(ThreadState::Started));
    assert_eq!(*log.borrow(), vec![('a', 0)]);
}

#[test]
fn test_started_after_first_resumption() {
    let h = Harness::new(Strategy::Concurrent, Tier::Normal);
    let seen = log();

    let sink = seen.clone();
    let id = h.scheduler.spawn(move |ctx| async move {
        for _ in 0..2 {
            if let Some(scheduler) = ctx.scheduler() {
                sink.borrow_mut().push(scheduler.is_started(ctx.id()));
            }
            ctx.yield_now().await;
        }
        Ok(())
    });

    h.scheduler.pulse();
    assert!(h.scheduler.is_started(id));

    h.scheduler.pulse();
    assert_eq!(
        *seen.borrow(),
        vec![false, true],
        "The first step runs before the thread counts as started"
    );
}

#[test]
fn test_arguments_delivered_on_first_resumption() {
    let h = Harness::new(Strategy::Concurrent, Tier::Normal);
    let seen = log();

    let record = seen.clone();
    h.scheduler.register(
        move |ctx, (name, rounds): (String, u32)| async move {
            for _ in 0..rounds {
                record.borrow_mut().push(name.clone());
                ctx.yield_now().await;
            }
            Ok(())
        },
        ThreadOptions::new(),
        ("spawner".to_string(), 2),
    );

    h.run_until_idle(10);

    assert_eq!(*seen.borrow(), vec!["spawner", "spawner"]);
}

#[test]
fn test_remove() {
    let h = Harness::new(Strategy::Concurrent, Tier::Normal);
    let log = log();

    let id = counter(&h.scheduler, &log, 'a', 5, ThreadOptions::new());
    h.step();

    assert!(h.scheduler.remove(id));
    assert!(!h.scheduler.remove(id), "Second removal should fail");
    assert!(!h.scheduler.is_paused(id));
    assert!(!h.scheduler.is_started(id));
    assert_eq!(h.scheduler.state(id), None);

    h.step();
    assert_eq!(log.borrow().len(), 1, "Removed thread must not run again");
    assert!(!h.scheduler.is_pulsing(), "Pulse should stop once idle");
}

#[test]
fn test_remove_drops_suspended_computation() {
    struct Flag(Rc<std::cell::Cell<bool>>);

    impl Drop for Flag {
        fn drop(&mut self) {
            self.0.set(true);
        }
    }

    let h = Harness::new(Strategy::Concurrent, Tier::Normal);
    let dropped = Rc::new(std::cell::Cell::new(false));

    let flag = Flag(dropped.clone());
    let id = h.scheduler.spawn(move |ctx| async move {
        let _flag = flag;
        for _ in 0..u32::MAX {
            ctx.yield_now().await;
        }
        Ok(())
    });

    h.step();
    assert!(!dropped.get());

    h.scheduler.remove(id);
    assert!(dropped.get(), "Removal should drop the suspended future");
}

#[test]
fn test_clear() {
    let h = Harness::new(Strategy::Concurrent, Tier::Normal);
    let log = log();

    assert!(!h.scheduler.clear(), "Clearing an empty scheduler should fail");

    counter(&h.scheduler, &log, 'a', 5, ThreadOptions::new());
    counter(&h.scheduler, &log, 'b', 5, ThreadOptions::new());
    assert!(h.scheduler.is_pulsing());

    assert!(h.scheduler.clear());
    assert!(h.scheduler.is_empty());
    assert!(!h.scheduler.is_pulsing());
    assert!(h.ticker.is_empty(), "Clear should cancel the periodic callback");
}

#[test]
fn test_set_strategy() {
    for initial in Strategy::ALL {
        let h = Harness::new(initial, Tier::Normal);

        assert!(!h.scheduler.set_strategy(initial), "No-op change must fail");
        assert!(!h.scheduler.set_strategy(initial.as_str()));
        assert!(!h.scheduler.set_strategy("round-robin"));
        assert_eq!(h.scheduler.strategy(), initial);

        for next in Strategy::ALL.into_iter().filter(|s| *s != initial) {
            assert!(h.scheduler.set_strategy(next.as_str()));
            assert_eq!(h.scheduler.strategy(), next);
            assert!(h.scheduler.set_strategy(initial));
        }
    }
}

#[test]
fn test_set_tier() {
    for initial in Tier::ALL {
        let h = Harness::new(Strategy::Concurrent, initial);

        assert!(!h.scheduler.set_tier(initial), "No-op change must fail");
        assert!(!h.scheduler.set_tier(initial.as_str()));
        assert!(!h.scheduler.set_tier("turbo"));
        assert_eq!(h.scheduler.tier(), initial);

        for next in Tier::ALL.into_iter().filter(|t| *t != initial) {
            assert!(h.scheduler.set_tier(next.as_str()));
            assert_eq!(h.scheduler.tier(), next);
            assert!(h.scheduler.set_tier(initial));
        }
    }
}

#[test]
fn test_set_tier_restarts_pulse() {
    let h = Harness::new(Strategy::Concurrent, Tier::Normal);
    let log = log();

    let id = counter(&h.scheduler, &log, 'a', 10, ThreadOptions::new());
    h.step();

    assert!(h.scheduler.set_tier("high"));

    assert_eq!(h.scheduler.pulse_interval(), Some(Duration::from_millis(50)));
    assert_eq!(h.ticker.len(), 1, "The old pulse must be cancelled");
    assert_eq!(
        h.ticker.next_deadline(),
        Some(h.clock.now() + Duration::from_millis(50))
    );
    assert!(h.scheduler.is_started(id), "Threads keep their state");

    h.step();
    assert_eq!(log.borrow().len(), 2);
}

#[test]
fn test_set_tier_on_idle_scheduler() {
    let h = Harness::new(Strategy::Concurrent, Tier::Normal);

    assert!(h.scheduler.set_tier(Tier::Low));
    assert!(!h.scheduler.is_pulsing(), "Nothing to run, nothing to pulse");
}

#[test]
fn test_tier_table() {
    let table: Vec<(Tier, u64, usize)> = Tier::ALL
        .into_iter()
        .map(|t| (t, t.profile().interval.as_millis() as u64, t.profile().budget))
        .collect();

    assert_eq!(
        table,
        vec![
            (Tier::Low, 250, 8),
            (Tier::Normal, 100, 15),
            (Tier::High, 50, 25),
            (Tier::Extreme, 0, 50),
        ]
    );
}

#[test]
fn test_drop_cancels_pulse() {
    let Harness {
        ticker, scheduler, ..
    } = Harness::new(Strategy::Concurrent, Tier::Normal);

    scheduler.spawn(|ctx| async move {
        for _ in 0..u32::MAX {
            ctx.yield_now().await;
        }
        Ok(())
    });
    assert_eq!(ticker.len(), 1);

    drop(scheduler);

    assert!(ticker.is_empty(), "Dropping the scheduler should cancel its pulse");
    assert_eq!(ticker.tick(), 0);
}
