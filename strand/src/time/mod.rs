//! Time source and suspension utilities.
//!
//! This module provides:
//! - the [`Clock`] port the scheduler and its helpers read time from,
//! - [`SystemClock`] and [`ManualClock`] implementations,
//! - [`sleep`], a wait that keeps yielding until enough clock time has passed.

mod clock;
mod sleep;

#[doc(inline)]
pub use clock::{Clock, ManualClock, SystemClock};

#[doc(inline)]
pub use sleep::{Sleep, sleep};
