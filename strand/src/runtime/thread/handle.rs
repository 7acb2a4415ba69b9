use super::{Priority, ThreadId, ThreadState};
use crate::runtime::core::{Scheduler, Shared};

use std::fmt;
use std::rc::Weak;

/// A handle to a registered thread.
///
/// The handle does not keep the thread or the scheduler alive. Once the
/// thread is removed every query returns its "unknown thread" answer and
/// every mutation returns `false`.
#[derive(Clone)]
pub struct ThreadHandle {
    id: ThreadId,
    scheduler: Weak<Shared>,
}

impl ThreadHandle {
    pub(crate) fn new(id: ThreadId, scheduler: Weak<Shared>) -> Self {
        Self { id, scheduler }
    }

    /// Returns the thread's identifier.
    pub fn id(&self) -> ThreadId {
        self.id
    }

    /// Returns the thread's priority, or `None` if it has none or no longer
    /// exists.
    pub fn get(&self) -> Option<Priority> {
        self.scheduler().and_then(|s| s.thread_priority(self.id))
    }

    /// Sets the thread's priority.
    ///
    /// Accepts a [`Priority`], an integer or a numeric string. Returns
    /// `false` for values outside `1..=10`, non-numeric input, a priority
    /// equal to the current one, or a thread that no longer exists.
    pub fn set<P>(&self, priority: P) -> bool
    where
        P: TryInto<Priority>,
        P::Error: fmt::Display,
    {
        self.scheduler()
            .is_some_and(|s| s.set_thread_priority(self.id, priority))
    }

    /// Returns the thread's state, or `None` once it is removed.
    pub fn state(&self) -> Option<ThreadState> {
        self.scheduler().and_then(|s| s.state(self.id))
    }

    /// Pauses the thread. See [`Scheduler::pause`].
    pub fn pause(&self) -> bool {
        self.scheduler().is_some_and(|s| s.pause(self.id))
    }

    /// Resumes the thread. See [`Scheduler::resume`].
    pub fn resume(&self) -> bool {
        self.scheduler().is_some_and(|s| s.resume(self.id))
    }

    /// Removes the thread. See [`Scheduler::remove`].
    pub fn remove(&self) -> bool {
        self.scheduler().is_some_and(|s| s.remove(self.id))
    }

    fn scheduler(&self) -> Option<Scheduler> {
        self.scheduler.upgrade().map(Scheduler::from_shared)
    }
}

impl fmt::Debug for ThreadHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadHandle").field("id", &self.id).finish()
    }
}
