use crate::runtime::core::{Scheduler, Shared};
use crate::runtime::thread::{ThreadHandle, ThreadId};
use crate::runtime::yield_now::{YieldNow, yield_now};
use crate::time::{Clock, Sleep, sleep};

use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

/// Execution context handed to a thread on its first resumption.
///
/// The context is the thread's way back into the scheduler that runs it:
/// it can register more threads, pause or remove threads (itself
/// included), and wait on the scheduler's clock.
///
/// The context only holds a weak reference to the scheduler, so a thread
/// that keeps its context does not keep the scheduler alive.
///
/// # Examples
///
/// ```rust,ignore
/// scheduler.spawn(|ctx| async move {
///     for _ in 0..3 {
///         do_some_work();
///         ctx.sleep(Duration::from_millis(100)).await;
///     }
///     Ok(())
/// });
/// ```
#[derive(Clone)]
pub struct Context {
    /// Thread this context belongs to.
    id: ThreadId,

    /// Scheduler running the thread.
    scheduler: Weak<Shared>,

    /// The scheduler's time source.
    clock: Rc<dyn Clock>,
}

impl Context {
    pub(crate) fn new(id: ThreadId, scheduler: Weak<Shared>, clock: Rc<dyn Clock>) -> Self {
        Self {
            id,
            scheduler,
            clock,
        }
    }

    /// Returns the identifier of the running thread.
    pub fn id(&self) -> ThreadId {
        self.id
    }

    /// Returns the scheduler running this thread, if it still exists.
    pub fn scheduler(&self) -> Option<Scheduler> {
        self.scheduler.upgrade().map(Scheduler::from_shared)
    }

    /// Returns a handle to the running thread.
    pub fn handle(&self) -> ThreadHandle {
        ThreadHandle::new(self.id, self.scheduler.clone())
    }

    /// Returns the current reading of the scheduler's clock.
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Yields until `duration` has elapsed on the scheduler's clock.
    ///
    /// Always yields at least once. See [`sleep`](crate::time::sleep).
    pub fn sleep(&self, duration: Duration) -> Sleep {
        sleep(self.clock.clone(), duration)
    }

    /// Yields exactly once.
    pub fn yield_now(&self) -> YieldNow {
        yield_now()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context").field("id", &self.id).finish()
    }
}
