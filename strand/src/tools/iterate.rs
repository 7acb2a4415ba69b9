use crate::runtime::Scheduler;
use crate::runtime::thread::{ThreadId, ThreadOptions};

use std::iter;

/// Registers a thread that calls `f` on every item of `items`, one item
/// per resumption step.
///
/// Works with anything iterable: vectors and arrays, maps (items are
/// key/value pairs), ranges. The thread finishes after the last item.
///
/// # Examples
///
/// ```rust,ignore
/// let players = vec!["ada", "grace", "linus"];
/// for_each(&scheduler, players, |name| greet(name));
/// ```
pub fn for_each<I, F>(scheduler: &Scheduler, items: I, f: F) -> ThreadId
where
    I: IntoIterator + 'static,
    F: FnMut(I::Item) + 'static,
{
    scheduler.register(
        |ctx, (items, mut f): (I, F)| async move {
            for item in items {
                f(item);
                ctx.yield_now().await;
            }
            Ok(())
        },
        ThreadOptions::new(),
        (items, f),
    )
}

/// Registers a thread that counts from `from` to `to` (inclusive) by
/// `step`, calling `f` with each value, one value per resumption step.
///
/// A negative `step` counts down. A zero `step`, or bounds that the step
/// moves away from, visit nothing.
///
/// # Examples
///
/// ```rust,ignore
/// // 10, 8, 6, 4, 2
/// for_range(&scheduler, 10, 1, -2, |i| spawn_wave(i));
/// ```
pub fn for_range<F>(scheduler: &Scheduler, from: i64, to: i64, step: i64, f: F) -> ThreadId
where
    F: FnMut(i64) + 'static,
{
    let values = iter::successors(Some(from), move |&i| i.checked_add(step)).take_while(
        move |&i| match step {
            0 => false,
            s if s > 0 => i <= to,
            _ => i >= to,
        },
    );

    for_each(scheduler, values, f)
}
