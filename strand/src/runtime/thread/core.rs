use super::{Priority, ThreadState};
use crate::runtime::context::Context;

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::task::{self, Poll, Waker};

/// Future driven by the scheduler, one poll per resumption.
pub(crate) type BoxRoutine = Pin<Box<dyn Future<Output = anyhow::Result<()>>>>;

/// Builds the routine on first resumption. Holds the registration
/// arguments until then.
pub(crate) type Entry = Box<dyn FnOnce(Context) -> BoxRoutine>;

/// Identifier of a registered thread.
///
/// Identifiers are handed out in increasing order and never reused by the
/// scheduler that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ThreadId(u64);

impl ThreadId {
    pub(crate) const fn from_u64(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registration options of a thread.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThreadOptions {
    pub(crate) priority: Option<Priority>,
}

impl ThreadOptions {
    /// Default options: no explicit priority.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the dispatch priority, clamped into `1..=10`.
    pub fn priority(mut self, priority: i64) -> Self {
        self.priority = Some(Priority::saturating(priority));
        self
    }
}

/// Why a thread was dropped by the scheduler.
#[derive(Debug)]
pub enum Failure {
    /// The routine returned an error.
    Error(anyhow::Error),

    /// The routine panicked; holds the panic message.
    Panic(String),
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Error(err) => write!(f, "{err:#}"),
            Failure::Panic(msg) => write!(f, "panicked: {msg}"),
        }
    }
}

/// Resumable computation of a thread.
pub(crate) enum Routine {
    /// Not resumed yet.
    Fresh(Entry),

    /// Suspended at a yield point.
    Suspended(BoxRoutine),
}

/// Result of a single resumption.
pub(crate) enum Step {
    /// The routine reached a yield point and hands itself back.
    Yielded(Routine),

    /// The routine ran to completion.
    Finished,

    /// The routine returned an error or panicked.
    Failed(Failure),
}

impl Routine {
    /// Runs the routine up to its next yield point.
    ///
    /// A fresh routine is first built from its entry, receiving `context`.
    /// Panics raised while building or polling are caught and turned into
    /// [`Step::Failed`]; the routine is dropped in that case. The panic hook
    /// has already run by then.
    pub(crate) fn resume(self, context: Context) -> Step {
        let mut cx = task::Context::from_waker(Waker::noop());

        let outcome = panic::catch_unwind(AssertUnwindSafe(move || {
            let mut routine = match self {
                Routine::Fresh(entry) => entry(context),
                Routine::Suspended(routine) => routine,
            };

            match routine.as_mut().poll(&mut cx) {
                Poll::Pending => Step::Yielded(Routine::Suspended(routine)),
                Poll::Ready(Ok(())) => Step::Finished,
                Poll::Ready(Err(err)) => Step::Failed(Failure::Error(err)),
            }
        }));

        outcome.unwrap_or_else(|payload| Step::Failed(Failure::Panic(panic_message(&*payload))))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_owned()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}

/// A registered thread.
///
/// Owned by the scheduler registry. The routine is taken out while it is
/// being resumed so the registry is never borrowed across thread code.
pub(crate) struct Thread {
    /// `None` only while the routine is being resumed.
    pub(crate) routine: Option<Routine>,

    pub(crate) paused: bool,

    pub(crate) started: bool,

    pub(crate) priority: Option<Priority>,
}

impl Thread {
    pub(crate) fn new(entry: Entry, priority: Option<Priority>) -> Self {
        Self {
            routine: Some(Routine::Fresh(entry)),
            paused: false,
            started: false,
            priority,
        }
    }

    pub(crate) fn state(&self) -> ThreadState {
        if self.paused {
            ThreadState::Paused
        } else if self.started {
            ThreadState::Started
        } else {
            ThreadState::Pending
        }
    }

    /// Ordering key under the priority strategy. Unset priorities sort
    /// below every real one.
    pub(crate) fn rank(&self) -> i16 {
        self.priority.map_or(-1, |p| i16::from(p.get()))
    }
}
