use crate::time::Clock;

use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};
use std::time::Duration;

/// Creates a future that yields until `duration` has elapsed on `clock`.
///
/// The wait is measured from the first poll, and the future always yields
/// at least once: a zero duration yields exactly once and then completes.
///
/// Inside a thread, [`Context::sleep`](crate::Context::sleep) is the usual
/// entry point; it uses the scheduler's clock.
///
/// # Examples
///
/// ```rust,ignore
/// async move {
///     sleep(clock, Duration::from_millis(500)).await;
/// }
/// ```
pub fn sleep(clock: Rc<dyn Clock>, duration: Duration) -> Sleep {
    Sleep::new(clock, duration)
}

/// A future that completes once a given amount of clock time has passed.
///
/// `Sleep` does not register anything with the host: each poll simply
/// compares the clock against the start reading. Under the scheduler that
/// means one check per pulse.
pub struct Sleep {
    /// Time source used to measure the wait.
    clock: Rc<dyn Clock>,

    /// Requested wait.
    duration: Duration,

    /// Clock reading at the first poll.
    started_at: Option<Duration>,
}

impl Sleep {
    pub(crate) fn new(clock: Rc<dyn Clock>, duration: Duration) -> Self {
        Self {
            clock,
            duration,
            started_at: None,
        }
    }

    /// Returns the requested wait.
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl Future for Sleep {
    type Output = ();

    /// Polls the sleep future.
    ///
    /// The first poll records the start time and yields. Later polls
    /// complete once the elapsed time reaches the requested duration.
    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let now = this.clock.now();

        match this.started_at {
            None => {
                this.started_at = Some(now);
            }
            Some(start) if now.saturating_sub(start) >= this.duration => {
                return Poll::Ready(());
            }
            Some(_) => {}
        }

        cx.waker().wake_by_ref();
        Poll::Pending
    }
}
