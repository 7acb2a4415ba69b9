//! Run units.
//!
//! A thread is a resumable computation registered with a scheduler,
//! together with its dispatch flags:
//! - whether it is paused,
//! - whether it has been resumed at least once,
//! - its dispatch priority.
//!
//! The computation is a future. Each resumption polls it once; every
//! `Poll::Pending` is a yield point.

mod core;
mod handle;
mod priority;
mod state;

pub(crate) use self::core::{BoxRoutine, Entry, Step, Thread};

pub use self::core::{Failure, ThreadId, ThreadOptions};
pub use handle::ThreadHandle;
pub use priority::Priority;
pub use state::ThreadState;
