use super::core::Scheduler;
use super::strategy::Strategy;
use crate::profile::Tier;
use crate::pulse::PulseService;
use crate::time::{Clock, SystemClock};

use std::env;
use std::rc::Rc;

use tracing::warn;

/// Environment variable read by [`SchedulerBuilder::from_env`] for the
/// execution strategy.
pub const STRATEGY_ENV: &str = "STRAND_STRATEGY";

/// Environment variable read by [`SchedulerBuilder::from_env`] for the
/// priority tier.
pub const TIER_ENV: &str = "STRAND_TIER";

/// Builder for configuring and creating a scheduler.
///
/// `SchedulerBuilder` allows customizing the scheduler before
/// construction:
/// - the execution strategy (default: concurrent),
/// - the priority tier (default: normal),
/// - the time source (default: a [`SystemClock`]).
///
/// # Examples
///
/// ```rust
/// use strand::pulse::Ticker;
/// use strand::time::SystemClock;
/// use strand::{Scheduler, Strategy, Tier};
/// use std::rc::Rc;
///
/// let ticker = Rc::new(Ticker::new(Rc::new(SystemClock::new())));
/// let scheduler = Scheduler::builder(ticker)
///     .strategy(Strategy::Sequential)
///     .tier(Tier::High)
///     .build();
///
/// assert_eq!(scheduler.strategy(), Strategy::Sequential);
/// ```
pub struct SchedulerBuilder {
    /// Service providing the periodic pulse.
    service: Rc<dyn PulseService>,

    /// Time source handed to threads.
    clock: Option<Rc<dyn Clock>>,

    strategy: Strategy,

    tier: Tier,
}

impl SchedulerBuilder {
    /// Creates a builder with the default configuration.
    pub fn new(service: Rc<dyn PulseService>) -> Self {
        Self {
            service,
            clock: None,
            strategy: Strategy::default(),
            tier: Tier::default(),
        }
    }

    /// Sets the execution strategy.
    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the execution strategy by name.
    ///
    /// Unknown names are logged and leave the current setting in place.
    pub fn strategy_name(mut self, name: &str) -> Self {
        match name.parse() {
            Ok(strategy) => self.strategy = strategy,
            Err(err) => warn!(%err, fallback = %self.strategy, "ignoring strategy"),
        }
        self
    }

    /// Sets the priority tier.
    pub fn tier(mut self, tier: Tier) -> Self {
        self.tier = tier;
        self
    }

    /// Sets the priority tier by name.
    ///
    /// Unknown names are logged and leave the current setting in place.
    pub fn tier_name(mut self, name: &str) -> Self {
        match name.parse() {
            Ok(tier) => self.tier = tier,
            Err(err) => warn!(%err, fallback = %self.tier, "ignoring tier"),
        }
        self
    }

    /// Sets the time source.
    ///
    /// Use the same clock as the pulse service so that sleeping threads
    /// and pulses agree on elapsed time.
    pub fn clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Applies `STRAND_STRATEGY` and `STRAND_TIER` when they are set.
    ///
    /// Values are interpreted like [`strategy_name`](Self::strategy_name)
    /// and [`tier_name`](Self::tier_name).
    pub fn from_env(mut self) -> Self {
        if let Ok(name) = env::var(STRATEGY_ENV) {
            self = self.strategy_name(name.trim());
        }
        if let Ok(name) = env::var(TIER_ENV) {
            self = self.tier_name(name.trim());
        }
        self
    }

    /// Builds the scheduler.
    ///
    /// The scheduler starts empty, so no pulse is requested yet.
    pub fn build(self) -> Scheduler {
        let clock: Rc<dyn Clock> = match self.clock {
            Some(clock) => clock,
            None => Rc::new(SystemClock::new()),
        };

        Scheduler::from_parts(self.service, clock, self.strategy, self.tier)
    }
}
