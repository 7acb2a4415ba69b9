use super::context::Context;
use super::core::Scheduler;
use super::strategy::Strategy;
use super::thread::{Failure, Step, ThreadId};

use std::cmp::Reverse;
use std::rc::Rc;

use tracing::{debug, error, trace};

/// What a single pulse did.
///
/// Returned by [`Scheduler::pulse`]. Failures are also logged, so hosts
/// driving the scheduler through a [`PulseService`](crate::pulse::PulseService)
/// do not need to inspect the report.
#[derive(Debug, Default)]
pub struct PulseReport {
    /// Resumptions that ended at a yield point. Each one consumed one unit
    /// of the tier's budget.
    pub resumed: usize,

    /// Threads that ran to completion and were removed.
    pub finished: Vec<ThreadId>,

    /// Threads that failed and were removed.
    pub failed: Vec<(ThreadId, Failure)>,
}

impl PulseReport {
    /// Returns `true` if the pulse resumed no thread at all.
    pub fn is_idle(&self) -> bool {
        self.resumed == 0 && self.finished.is_empty() && self.failed.is_empty()
    }
}

/// Outcome of trying to resume one thread.
enum Resumption {
    /// Ran and yielded.
    Yielded,

    /// Ran and was removed (completed or failed).
    Retired,

    /// Did not run: unknown, paused, or already being resumed.
    Skipped,
}

impl Scheduler {
    /// Runs one dispatch round.
    ///
    /// This is what the pulse callback invokes. Hosts and tests may call it
    /// directly to drive the scheduler without a timer.
    ///
    /// The round resumes threads according to the active [`Strategy`],
    /// spending at most the active tier's step budget on resumptions that
    /// yield. Completed and failed threads are removed along the way. If no
    /// thread can make progress afterwards, the pulse is cancelled until
    /// the next registration, resume, strategy change or tier change.
    ///
    /// Calling `pulse` from inside a thread is a no-op that returns an
    /// empty report.
    pub fn pulse(&self) -> PulseReport {
        let mut report = PulseReport::default();

        let (strategy, budget) = {
            let mut inner = self.shared.borrow_mut();
            if inner.dispatching {
                return report;
            }

            inner.dispatching = true;
            (inner.strategy, inner.tier.profile().budget)
        };

        match strategy {
            Strategy::Concurrent => {
                let order = self.round_robin_order();
                self.interleave(order, budget, &mut report);
            }
            Strategy::Priority => {
                let order = self.priority_order();
                self.interleave(order, budget, &mut report);
            }
            Strategy::Sequential => self.drain_current(budget, &mut report),
        }

        self.shared.borrow_mut().dispatching = false;

        if !self.can_progress() {
            self.stop_pulse();
        }

        trace!(
            %strategy,
            resumed = report.resumed,
            finished = report.finished.len(),
            failed = report.failed.len(),
            "pulse dispatched"
        );

        report
    }

    /// Runnable threads in id order, rotated to start right after the
    /// thread the previous round stopped at.
    fn round_robin_order(&self) -> Vec<ThreadId> {
        let inner = self.shared.borrow();

        let mut order: Vec<ThreadId> = inner
            .threads
            .iter()
            .filter(|(_, t)| !t.paused)
            .map(|(id, _)| *id)
            .collect();

        if let Some(cursor) = inner.cursor {
            let split = order.partition_point(|id| *id <= cursor);
            order.rotate_left(split);
        }

        order
    }

    /// Runnable threads by descending priority, oldest first on ties.
    fn priority_order(&self) -> Vec<ThreadId> {
        let inner = self.shared.borrow();

        let mut order: Vec<(ThreadId, i16)> = inner
            .threads
            .iter()
            .filter(|(_, t)| !t.paused)
            .map(|(id, t)| (*id, t.rank()))
            .collect();

        order.sort_by_key(|&(id, rank)| (Reverse(rank), id));
        order.into_iter().map(|(id, _)| id).collect()
    }

    /// Resumes each thread of `order` once until the budget runs out.
    fn interleave(&self, order: Vec<ThreadId>, budget: usize, report: &mut PulseReport) {
        let mut remaining = budget;

        for id in order {
            if remaining == 0 {
                break;
            }

            if let Resumption::Yielded = self.resume_thread(id, report) {
                remaining -= 1;
            }

            self.shared.borrow_mut().cursor = Some(id);
        }
    }

    /// Resumes the sequential strategy's current thread until the budget
    /// runs out or the thread is gone.
    fn drain_current(&self, budget: usize, report: &mut PulseReport) {
        let Some(id) = self.select_current() else {
            return;
        };

        let mut remaining = budget;

        while remaining > 0 {
            match self.resume_thread(id, report) {
                Resumption::Yielded => remaining -= 1,
                Resumption::Retired | Resumption::Skipped => break,
            }
        }
    }

    /// Returns the current thread, adopting the oldest runnable thread if
    /// the cursor is empty or stale.
    fn select_current(&self) -> Option<ThreadId> {
        let mut inner = self.shared.borrow_mut();

        if let Some(id) = inner.current {
            if inner.threads.contains_key(&id) {
                return Some(id);
            }
        }

        let next = inner
            .threads
            .iter()
            .find(|(_, t)| !t.paused)
            .map(|(id, _)| *id);

        inner.current = next;

        if let Some(id) = next {
            debug!(thread = %id, "sequential cursor adopted thread");
        }
        next
    }

    /// Resumes one thread by one step.
    ///
    /// The routine is taken out of the registry for the duration of the
    /// step, so the thread may call back into the scheduler, including
    /// removing itself.
    fn resume_thread(&self, id: ThreadId, report: &mut PulseReport) -> Resumption {
        let (routine, context) = {
            let mut inner = self.shared.borrow_mut();
            let clock = inner.clock.clone();

            let Some(thread) = inner.threads.get_mut(&id) else {
                return Resumption::Skipped;
            };
            if thread.paused {
                return Resumption::Skipped;
            }
            let Some(routine) = thread.routine.take() else {
                return Resumption::Skipped;
            };

            (routine, Context::new(id, Rc::downgrade(&self.shared), clock))
        };

        match routine.resume(context) {
            Step::Yielded(routine) => {
                let orphan = {
                    let mut inner = self.shared.borrow_mut();
                    match inner.threads.get_mut(&id) {
                        Some(thread) => {
                            thread.routine = Some(routine);
                            thread.started = true;
                            None
                        }
                        None => Some(routine),
                    }
                };

                // Removed during its own step.
                drop(orphan);

                report.resumed += 1;
                Resumption::Yielded
            }
            Step::Finished => {
                debug!(thread = %id, "thread finished");

                drop(self.detach(id));
                report.finished.push(id);
                Resumption::Retired
            }
            Step::Failed(failure) => {
                error!(thread = %id, error = %failure, "thread failed");

                drop(self.detach(id));
                report.failed.push((id, failure));
                Resumption::Retired
            }
        }
    }
}
