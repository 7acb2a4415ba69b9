use strand::pulse::Ticker;
use strand::time::ManualClock;
use strand::{STRATEGY_ENV, Scheduler, Strategy, TIER_ENV, Tier};

use std::rc::Rc;

// Single test in this binary: it mutates the process environment.
#[test]
fn test_builder_from_env() {
    let ticker = Rc::new(Ticker::new(Rc::new(ManualClock::new())));

    // SAFETY: no other thread of this test binary reads or writes the
    // environment.
    unsafe {
        std::env::set_var(STRATEGY_ENV, " priority ");
        std::env::set_var(TIER_ENV, "warp");
    }

    let scheduler = Scheduler::builder(ticker.clone())
        .tier(Tier::High)
        .from_env()
        .build();

    assert_eq!(scheduler.strategy(), Strategy::Priority);
    assert_eq!(
        scheduler.tier(),
        Tier::High,
        "Invalid values keep the configured tier"
    );

    // SAFETY: see above.
    unsafe {
        std::env::remove_var(STRATEGY_ENV);
        std::env::set_var(TIER_ENV, "low");
    }

    let scheduler = Scheduler::builder(ticker).from_env().build();
    assert_eq!(scheduler.strategy(), Strategy::Concurrent);
    assert_eq!(scheduler.tier(), Tier::Low);
}
