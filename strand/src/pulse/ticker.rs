use crate::pulse::{PulseFn, PulseId, PulseService};
use crate::time::Clock;

use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use tracing::trace;

/// A pending firing in the ticker queue.
///
/// Stored in a `BinaryHeap` ordered by deadline. Entries of cancelled
/// pulses stay in the heap and are skipped when popped.
struct Due {
    /// Clock reading at which the pulse fires.
    deadline: Duration,

    /// Pulse to fire.
    id: PulseId,
}

impl Eq for Due {}

impl PartialEq for Due {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.id == other.id
    }
}

impl Ord for Due {
    /// Reversed so the heap pops the earliest deadline first. Equal
    /// deadlines fire in start order.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for Due {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A started pulse.
struct Entry {
    interval: Duration,

    /// `None` while the callback is running.
    callback: Option<PulseFn>,
}

#[derive(Default)]
struct State {
    next_id: u64,
    pulses: HashMap<PulseId, Entry>,
    queue: BinaryHeap<Due>,
}

/// Host-side [`PulseService`] driven by explicit ticks.
///
/// The host calls [`tick`](Self::tick) from its own loop (a frame
/// callback, a game-server timer, a test). Every pulse whose deadline has
/// passed fires once and is rescheduled `interval` after the tick.
///
/// # Examples
///
/// ```rust
/// use strand::pulse::{PulseService, Ticker};
/// use strand::time::ManualClock;
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use std::time::Duration;
///
/// let clock = Rc::new(ManualClock::new());
/// let ticker = Ticker::new(clock.clone());
/// let fired = Rc::new(Cell::new(0));
///
/// let counter = fired.clone();
/// ticker.start(Duration::from_millis(100), Box::new(move || counter.set(counter.get() + 1)));
///
/// clock.advance(Duration::from_millis(100));
/// ticker.tick();
/// assert_eq!(fired.get(), 1);
/// ```
pub struct Ticker {
    clock: Rc<dyn Clock>,
    state: RefCell<State>,
}

impl Ticker {
    /// Creates a ticker reading time from `clock`.
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self {
            clock,
            state: RefCell::new(State::default()),
        }
    }

    /// Fires every pulse that is due.
    ///
    /// Each pulse fires at most once per tick, so an interval of zero means
    /// "once per tick". Pulses started while ticking are first considered on
    /// the next tick.
    ///
    /// Returns the number of callbacks invoked.
    pub fn tick(&self) -> usize {
        let now = self.clock.now();

        let due = {
            let mut state = self.state.borrow_mut();
            let mut due = Vec::new();

            while state.queue.peek().is_some_and(|d| d.deadline <= now) {
                if let Some(d) = state.queue.pop() {
                    if state.pulses.contains_key(&d.id) {
                        due.push(d.id);
                    }
                }
            }

            due
        };

        let mut fired = 0;

        for id in due {
            let callback = self
                .state
                .borrow_mut()
                .pulses
                .get_mut(&id)
                .and_then(|entry| entry.callback.take());

            let Some(mut callback) = callback else {
                continue;
            };

            callback();
            fired += 1;

            // The callback may have cancelled its own pulse.
            let orphan = {
                let mut state = self.state.borrow_mut();
                let state = &mut *state;

                match state.pulses.get_mut(&id) {
                    Some(entry) => {
                        entry.callback = Some(callback);
                        state.queue.push(Due {
                            deadline: now + entry.interval,
                            id,
                        });
                        None
                    }
                    None => Some(callback),
                }
            };

            drop(orphan);
        }

        if fired > 0 {
            trace!(fired, ?now, "ticker fired");
        }

        fired
    }

    /// Ticks until no pulse is left, sleeping the current thread between
    /// deadlines.
    ///
    /// The clock must advance with real time (e.g. a
    /// [`SystemClock`](crate::time::SystemClock)); with a clock that never
    /// moves this only returns once every pulse has been cancelled.
    pub fn run_until_idle(&self) {
        while !self.is_empty() {
            self.tick();

            if let Some(deadline) = self.next_deadline() {
                let now = self.clock.now();
                if deadline > now {
                    thread::sleep(deadline - now);
                }
            }
        }
    }

    /// Returns the earliest deadline among live pulses.
    pub fn next_deadline(&self) -> Option<Duration> {
        let state = self.state.borrow();

        state
            .queue
            .iter()
            .filter(|d| state.pulses.contains_key(&d.id))
            .map(|d| d.deadline)
            .min()
    }

    /// Returns the interval of a live pulse.
    pub fn interval(&self, id: PulseId) -> Option<Duration> {
        self.state.borrow().pulses.get(&id).map(|e| e.interval)
    }

    /// Returns `true` if the pulse has been started and not cancelled.
    pub fn contains(&self, id: PulseId) -> bool {
        self.state.borrow().pulses.contains_key(&id)
    }

    /// Returns the number of live pulses.
    pub fn len(&self) -> usize {
        self.state.borrow().pulses.len()
    }

    /// Returns `true` if no pulse is live.
    pub fn is_empty(&self) -> bool {
        self.state.borrow().pulses.is_empty()
    }
}

impl PulseService for Ticker {
    fn start(&self, interval: Duration, pulse: PulseFn) -> PulseId {
        let deadline = self.clock.now() + interval;

        let mut state = self.state.borrow_mut();
        state.next_id += 1;

        let id = PulseId::from_u64(state.next_id);
        state.pulses.insert(
            id,
            Entry {
                interval,
                callback: Some(pulse),
            },
        );
        state.queue.push(Due { deadline, id });

        id
    }

    fn cancel(&self, id: PulseId) {
        let removed = self.state.borrow_mut().pulses.remove(&id);
        drop(removed);
    }
}
