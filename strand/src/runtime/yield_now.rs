use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Future returned by [`yield_now`].
///
/// Pending on its first poll, ready on the next one.
#[derive(Debug, Default)]
#[must_use = "futures do nothing unless awaited"]
pub struct YieldNow {
    yielded: bool,
}

impl Future for YieldNow {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if this.yielded {
            return Poll::Ready(());
        }

        // Ends the current resumption.
        this.yielded = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

/// Yields back to the scheduler.
///
/// Every yield ends one resumption step of the current thread and costs
/// one unit of the pulse budget. The thread continues on its next
/// resumption, which may be later in the same pulse or in a later one.
///
/// # Examples
///
/// ```rust,ignore
/// scheduler.spawn(|_| async move {
///     for chunk in work.chunks(64) {
///         process(chunk);
///         yield_now().await;
///     }
///     Ok(())
/// });
/// ```
pub fn yield_now() -> YieldNow {
    YieldNow::default()
}
