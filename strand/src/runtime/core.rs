use super::builder::SchedulerBuilder;
use super::context::Context;
use super::strategy::Strategy;
use super::thread::{
    BoxRoutine, Entry, Priority, Thread, ThreadHandle, ThreadId, ThreadOptions, ThreadState,
};
use crate::profile::Tier;
use crate::pulse::{PulseId, PulseService};
use crate::time::Clock;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::mem;
use std::rc::Rc;
use std::time::Duration;

use tracing::debug;

pub(crate) type Shared = RefCell<Inner>;

/// Scheduler state shared between [`Scheduler`] handles.
pub(crate) struct Inner {
    /// Registered threads, keyed by id.
    pub(crate) threads: BTreeMap<ThreadId, Thread>,

    /// Last id handed out.
    pub(crate) next_id: u64,

    /// Thread being drained by the sequential strategy.
    pub(crate) current: Option<ThreadId>,

    /// Last thread visited by a concurrent pulse.
    pub(crate) cursor: Option<ThreadId>,

    pub(crate) strategy: Strategy,

    pub(crate) tier: Tier,

    /// Pulse registered with the service, if any.
    pub(crate) pulse: Option<PulseId>,

    /// Set while a pulse is dispatching.
    pub(crate) dispatching: bool,

    pub(crate) clock: Rc<dyn Clock>,

    pub(crate) service: Rc<dyn PulseService>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(id) = self.pulse.take() {
            self.service.cancel(id);
        }
    }
}

/// A cooperative, time-sliced thread scheduler.
///
/// `Scheduler` is responsible for:
/// - owning every registered thread,
/// - asking its [`PulseService`] for a periodic pulse while some thread can
///   make progress,
/// - resuming threads on every pulse according to its [`Strategy`] and the
///   step budget of its [`Tier`],
/// - dropping threads that finish or fail.
///
/// `Scheduler` is a cheap, clonable handle; clones refer to the same
/// scheduler. It is not `Send`: the scheduler lives on the host's single
/// logical thread of control. Dropping the last handle cancels the pulse and
/// drops all threads.
///
/// # Examples
///
/// ```rust
/// use strand::pulse::Ticker;
/// use strand::time::ManualClock;
/// use strand::{Scheduler, ThreadOptions};
/// use std::rc::Rc;
///
/// let clock = Rc::new(ManualClock::new());
/// let ticker = Rc::new(Ticker::new(clock.clone()));
/// let scheduler = Scheduler::builder(ticker.clone()).clock(clock.clone()).build();
///
/// let id = scheduler.register(
///     |ctx, (from, to): (u32, u32)| async move {
///         for _ in from..to {
///             ctx.yield_now().await;
///         }
///         Ok(())
///     },
///     ThreadOptions::new(),
///     (0, 3),
/// );
///
/// assert!(scheduler.contains(id));
/// assert!(scheduler.is_pulsing());
/// ```
#[derive(Clone)]
pub struct Scheduler {
    pub(crate) shared: Rc<Shared>,
}

impl Scheduler {
    /// Creates a scheduler with the default strategy and tier, reading time
    /// from a [`SystemClock`](crate::time::SystemClock).
    pub fn new(service: Rc<dyn PulseService>) -> Self {
        SchedulerBuilder::new(service).build()
    }

    /// Returns a builder for a scheduler pulsed by `service`.
    pub fn builder(service: Rc<dyn PulseService>) -> SchedulerBuilder {
        SchedulerBuilder::new(service)
    }

    /// Creates a scheduler from a strategy name and a tier name.
    ///
    /// Missing or unknown names fall back to `"concurrent"` and `"normal"`;
    /// the scheduler is usable either way.
    pub fn create(
        service: Rc<dyn PulseService>,
        strategy: Option<&str>,
        tier: Option<&str>,
    ) -> Self {
        let mut builder = SchedulerBuilder::new(service);

        if let Some(name) = strategy {
            builder = builder.strategy_name(name);
        }
        if let Some(name) = tier {
            builder = builder.tier_name(name);
        }

        builder.build()
    }

    pub(crate) fn from_parts(
        service: Rc<dyn PulseService>,
        clock: Rc<dyn Clock>,
        strategy: Strategy,
        tier: Tier,
    ) -> Self {
        let inner = Inner {
            threads: BTreeMap::new(),
            next_id: 0,
            current: None,
            cursor: None,
            strategy,
            tier,
            pulse: None,
            dispatching: false,
            clock,
            service,
        };

        Self {
            shared: Rc::new(RefCell::new(inner)),
        }
    }

    pub(crate) fn from_shared(shared: Rc<Shared>) -> Self {
        Self { shared }
    }

    /// Registers a thread and returns its id.
    ///
    /// `routine` is not called here. On the thread's first resumption it
    /// receives the thread's [`Context`] and `args`, and the future it
    /// returns is polled once per resumption from then on. The thread is
    /// dropped when the future resolves; an `Err` or a panic is logged and
    /// reported as a failure.
    ///
    /// A panic is caught, but the process panic hook still runs first. With
    /// the default hook the message is printed to stderr in addition to the
    /// `tracing` event; hosts that want failures reported once should
    /// install their own hook with [`std::panic::set_hook`].
    ///
    /// Without an explicit priority, a thread registered while the
    /// scheduler runs [`Strategy::Priority`] gets [`Priority::DEFAULT`];
    /// otherwise its priority stays unset.
    ///
    /// Starts the pulse if it is not running.
    pub fn register<F, Fut, A>(&self, routine: F, options: ThreadOptions, args: A) -> ThreadId
    where
        F: FnOnce(Context, A) -> Fut + 'static,
        Fut: Future<Output = anyhow::Result<()>> + 'static,
        A: 'static,
    {
        let entry: Entry = Box::new(move |ctx| Box::pin(routine(ctx, args)) as BoxRoutine);

        let id = {
            let mut inner = self.shared.borrow_mut();
            inner.next_id += 1;

            let id = ThreadId::from_u64(inner.next_id);
            let priority = options.priority.or_else(|| {
                (inner.strategy == Strategy::Priority).then_some(Priority::DEFAULT)
            });

            inner.threads.insert(id, Thread::new(entry, priority));
            id
        };

        debug!(thread = %id, "thread registered");

        self.ensure_pulse();
        id
    }

    /// Registers a thread without arguments and with default options.
    pub fn spawn<F, Fut>(&self, routine: F) -> ThreadId
    where
        F: FnOnce(Context) -> Fut + 'static,
        Fut: Future<Output = anyhow::Result<()>> + 'static,
    {
        self.register(move |ctx, ()| routine(ctx), ThreadOptions::new(), ())
    }

    /// Removes a thread, dropping its suspended computation.
    ///
    /// Returns `false` if the thread is unknown. Removing the sequential
    /// strategy's current thread makes the next pulse adopt another one,
    /// restarting the pulse if a paused current thread had stopped it.
    pub fn remove(&self, id: ThreadId) -> bool {
        let Some(thread) = self.detach(id) else {
            return false;
        };

        debug!(thread = %id, "thread removed");
        drop(thread);

        self.ensure_pulse();
        true
    }

    /// Removes every thread and stops the pulse.
    ///
    /// Returns `false` if there was nothing to remove.
    pub fn clear(&self) -> bool {
        let threads = {
            let mut inner = self.shared.borrow_mut();
            if inner.threads.is_empty() {
                return false;
            }

            inner.current = None;
            inner.cursor = None;
            mem::take(&mut inner.threads)
        };

        self.stop_pulse();

        debug!(count = threads.len(), "scheduler cleared");
        drop(threads);
        true
    }

    /// Pauses a thread. Paused threads stay registered but are skipped by
    /// dispatch.
    ///
    /// Returns `false` if the thread is unknown or already paused.
    pub fn pause(&self, id: ThreadId) -> bool {
        self.set_paused(id, true)
    }

    /// Resumes a paused thread and makes sure the pulse is running.
    ///
    /// Returns `false` if the thread is unknown or not paused.
    pub fn resume(&self, id: ThreadId) -> bool {
        let changed = self.set_paused(id, false);
        self.ensure_pulse();
        changed
    }

    fn set_paused(&self, id: ThreadId, paused: bool) -> bool {
        let changed = match self.shared.borrow_mut().threads.get_mut(&id) {
            Some(thread) if thread.paused != paused => {
                thread.paused = paused;
                true
            }
            _ => false,
        };

        if changed {
            debug!(thread = %id, paused, "thread pause state changed");
        }
        changed
    }

    /// Returns `true` if the thread exists and is paused.
    pub fn is_paused(&self, id: ThreadId) -> bool {
        self.shared
            .borrow()
            .threads
            .get(&id)
            .is_some_and(|t| t.paused)
    }

    /// Returns `true` if the thread exists and has completed at least one
    /// resumption. Code running in a thread's first step still sees `false`.
    pub fn is_started(&self, id: ThreadId) -> bool {
        self.shared
            .borrow()
            .threads
            .get(&id)
            .is_some_and(|t| t.started)
    }

    /// Returns the state of a thread, or `None` if it is unknown.
    pub fn state(&self, id: ThreadId) -> Option<ThreadState> {
        self.shared.borrow().threads.get(&id).map(Thread::state)
    }

    /// Returns `true` if the thread is registered.
    pub fn contains(&self, id: ThreadId) -> bool {
        self.shared.borrow().threads.contains_key(&id)
    }

    /// Returns the ids of all registered threads, in ascending order.
    pub fn ids(&self) -> Vec<ThreadId> {
        self.shared.borrow().threads.keys().copied().collect()
    }

    /// Returns the number of registered threads.
    pub fn len(&self) -> usize {
        self.shared.borrow().threads.len()
    }

    /// Returns `true` if no thread is registered.
    pub fn is_empty(&self) -> bool {
        self.shared.borrow().threads.is_empty()
    }

    /// Returns a handle to a registered thread.
    pub fn thread(&self, id: ThreadId) -> Option<ThreadHandle> {
        self.contains(id)
            .then(|| ThreadHandle::new(id, Rc::downgrade(&self.shared)))
    }

    /// Returns the execution strategy.
    pub fn strategy(&self) -> Strategy {
        self.shared.borrow().strategy
    }

    /// Switches the execution strategy.
    ///
    /// Accepts a [`Strategy`] or a strategy name. Returns `false` for
    /// unknown names and when the strategy is already active. Threads keep
    /// their state; only the order of future dispatch changes.
    pub fn set_strategy<S>(&self, strategy: S) -> bool
    where
        S: TryInto<Strategy>,
        S::Error: fmt::Display,
    {
        let strategy = match strategy.try_into() {
            Ok(strategy) => strategy,
            Err(err) => {
                debug!(%err, "strategy change rejected");
                return false;
            }
        };

        {
            let mut inner = self.shared.borrow_mut();
            if inner.strategy == strategy {
                return false;
            }
            inner.strategy = strategy;
        }

        debug!(%strategy, "strategy changed");

        self.ensure_pulse();
        true
    }

    /// Returns the active priority tier.
    pub fn tier(&self) -> Tier {
        self.shared.borrow().tier
    }

    /// Switches the priority tier.
    ///
    /// Accepts a [`Tier`] or a tier name. Returns `false` for unknown names
    /// and when the tier is already active. A running pulse is restarted
    /// at the new tier's interval right away.
    pub fn set_tier<T>(&self, tier: T) -> bool
    where
        T: TryInto<Tier>,
        T::Error: fmt::Display,
    {
        let tier = match tier.try_into() {
            Ok(tier) => tier,
            Err(err) => {
                debug!(%err, "tier change rejected");
                return false;
            }
        };

        {
            let mut inner = self.shared.borrow_mut();
            if inner.tier == tier {
                return false;
            }
            inner.tier = tier;
        }

        debug!(%tier, "tier changed");

        if self.is_pulsing() {
            self.stop_pulse();
            self.start_pulse();
        } else {
            self.ensure_pulse();
        }
        true
    }

    /// Returns `true` while a pulse is registered with the pulse service.
    pub fn is_pulsing(&self) -> bool {
        self.shared.borrow().pulse.is_some()
    }

    /// Returns the interval of the running pulse.
    pub fn pulse_interval(&self) -> Option<Duration> {
        let inner = self.shared.borrow();
        inner.pulse.map(|_| inner.tier.profile().interval)
    }

    /// Returns the scheduler's time source.
    pub fn clock(&self) -> Rc<dyn Clock> {
        self.shared.borrow().clock.clone()
    }

    pub(crate) fn thread_priority(&self, id: ThreadId) -> Option<Priority> {
        self.shared
            .borrow()
            .threads
            .get(&id)
            .and_then(|t| t.priority)
    }

    pub(crate) fn set_thread_priority<P>(&self, id: ThreadId, priority: P) -> bool
    where
        P: TryInto<Priority>,
        P::Error: fmt::Display,
    {
        let priority = match priority.try_into() {
            Ok(priority) => priority,
            Err(err) => {
                debug!(thread = %id, %err, "priority change rejected");
                return false;
            }
        };

        match self.shared.borrow_mut().threads.get_mut(&id) {
            Some(thread) if thread.priority != Some(priority) => {
                thread.priority = Some(priority);
                true
            }
            _ => false,
        }
    }

    /// Takes a thread out of the registry.
    ///
    /// The registry borrow is released before the thread is returned, so
    /// the caller can drop it safely.
    pub(crate) fn detach(&self, id: ThreadId) -> Option<Thread> {
        let mut inner = self.shared.borrow_mut();
        let thread = inner.threads.remove(&id)?;

        if inner.current == Some(id) {
            inner.current = None;
        }
        Some(thread)
    }

    /// Returns `true` if a pulse would resume at least one thread.
    pub(crate) fn can_progress(&self) -> bool {
        let inner = self.shared.borrow();

        match inner.strategy {
            Strategy::Sequential => match inner.current.and_then(|id| inner.threads.get(&id)) {
                Some(current) => !current.paused,
                None => inner.threads.values().any(|t| !t.paused),
            },
            Strategy::Concurrent | Strategy::Priority => {
                inner.threads.values().any(|t| !t.paused)
            }
        }
    }

    /// Starts the pulse unless it is already running or nothing can run.
    pub(crate) fn ensure_pulse(&self) {
        if self.is_pulsing() || !self.can_progress() {
            return;
        }
        self.start_pulse();
    }

    fn start_pulse(&self) {
        let (service, interval) = {
            let inner = self.shared.borrow();
            (inner.service.clone(), inner.tier.profile().interval)
        };

        let scheduler = Rc::downgrade(&self.shared);
        let id = service.start(
            interval,
            Box::new(move || {
                if let Some(shared) = scheduler.upgrade() {
                    Scheduler::from_shared(shared).pulse();
                }
            }),
        );

        self.shared.borrow_mut().pulse = Some(id);
        debug!(%id, ?interval, "pulse started");
    }

    pub(crate) fn stop_pulse(&self) {
        let (service, id) = {
            let mut inner = self.shared.borrow_mut();
            match inner.pulse.take() {
                Some(id) => (inner.service.clone(), id),
                None => return,
            }
        };

        service.cancel(id);
        debug!(%id, "pulse stopped");
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.shared.try_borrow() {
            Ok(inner) => f
                .debug_struct("Scheduler")
                .field("strategy", &inner.strategy)
                .field("tier", &inner.tier)
                .field("threads", &inner.threads.len())
                .field("pulse", &inner.pulse)
                .finish(),
            Err(_) => f.debug_struct("Scheduler").finish_non_exhaustive(),
        }
    }
}
