#![allow(dead_code)]

use strand::pulse::Ticker;
use strand::time::ManualClock;
use strand::{Scheduler, Strategy, ThreadId, ThreadOptions, Tier};

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// A scheduler wired to a manual clock and a ticker.
pub struct Harness {
    pub clock: Rc<ManualClock>,
    pub ticker: Rc<Ticker>,
    pub scheduler: Scheduler,
}

impl Harness {
    pub fn new(strategy: Strategy, tier: Tier) -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("strand=debug")
            .with_test_writer()
            .try_init();

        let clock = Rc::new(ManualClock::new());
        let ticker = Rc::new(Ticker::new(clock.clone()));
        let scheduler = Scheduler::builder(ticker.clone())
            .clock(clock.clone())
            .strategy(strategy)
            .tier(tier)
            .build();

        Self {
            clock,
            ticker,
            scheduler,
        }
    }

    /// Advances the clock by one pulse interval and ticks.
    ///
    /// Returns the number of pulses that fired.
    pub fn step(&self) -> usize {
        let interval = self.scheduler.tier().profile().interval;
        self.clock.advance(interval.max(Duration::from_millis(1)));
        self.ticker.tick()
    }

    /// Steps until the scheduler stops pulsing. Returns the number of
    /// steps taken.
    pub fn run_until_idle(&self, max_steps: usize) -> usize {
        let mut steps = 0;
        while self.scheduler.is_pulsing() {
            assert!(steps < max_steps, "scheduler still pulsing after {max_steps} steps");
            self.step();
            steps += 1;
        }
        steps
    }
}

/// Shared event log written by test threads.
pub type Log<T> = Rc<RefCell<Vec<T>>>;

pub fn log<T>() -> Log<T> {
    Rc::new(RefCell::new(Vec::new()))
}

/// Registers a thread that records `(tag, step)` and yields, `steps` times.
pub fn counter<T>(
    scheduler: &Scheduler,
    log: &Log<(T, u32)>,
    tag: T,
    steps: u32,
    options: ThreadOptions,
) -> ThreadId
where
    T: Copy + 'static,
{
    let log = log.clone();

    scheduler.register(
        move |ctx, steps: u32| async move {
            for step in 0..steps {
                log.borrow_mut().push((tag, step));
                ctx.yield_now().await;
            }
            Ok(())
        },
        options,
        steps,
    )
}
