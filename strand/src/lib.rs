//! # Strand
//!
//! **Strand** is a cooperative, time-sliced thread scheduler for hosts that
//! run a single-threaded main loop, such as game servers.
//!
//! Host code registers long-running units of work ("threads"). They are not
//! OS threads: each one is a future that the scheduler polls a few steps at a
//! time on every timer pulse, so no single unit of work can stall the host.
//!
//! Strand provides:
//!
//! - A **scheduler** with three strategies: round-robin (`concurrent`),
//!   one-at-a-time (`sequential`) and priority-ordered (`priority`)
//! - **Priority tiers** mapping to a pulse interval and a per-pulse step
//!   budget
//! - **Pause, resume and removal** of individual threads
//! - **Failure isolation**: a thread that errors or panics is logged and
//!   dropped, everything else keeps running
//! - **Suspension helpers** (`sleep`, `yield_now`) and iteration helpers
//!
//! ## Panics in threads
//!
//! A panicking thread is caught and reported like an error, but Rust runs
//! the process panic hook before the scheduler sees the panic. The default
//! hook prints the message to stderr, so the failure shows up twice: once
//! there and once as a `tracing` error event. Hosts that route everything
//! through `tracing` should replace the hook:
//!
//! ```rust
//! std::panic::set_hook(Box::new(|info| {
//!     tracing::error!(%info, "panic");
//! }));
//! # let _ = std::panic::take_hook();
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use strand::pulse::Ticker;
//! use strand::time::ManualClock;
//! use strand::Scheduler;
//! use std::rc::Rc;
//! use std::time::Duration;
//!
//! let clock = Rc::new(ManualClock::new());
//! let ticker = Rc::new(Ticker::new(clock.clone()));
//! let scheduler = Scheduler::builder(ticker.clone()).clock(clock.clone()).build();
//!
//! scheduler.spawn(|ctx| async move {
//!     for wave in 1..=3 {
//!         println!("spawning wave {wave}");
//!         ctx.sleep(Duration::from_millis(500)).await;
//!     }
//!     Ok(())
//! });
//!
//! // The host loop: advance time and let due pulses fire.
//! while scheduler.is_pulsing() {
//!     clock.advance(Duration::from_millis(100));
//!     ticker.tick();
//! }
//! assert!(scheduler.is_empty());
//! ```
//!
//! ## Modules
//!
//! - [`pulse`]: The periodic callback port and the [`Ticker`](pulse::Ticker) host driver
//! - [`time`]: Clocks and `sleep`
//! - [`tools`]: Iteration helpers
//! - [`profile`]: The priority tier table

mod error;
mod runtime;

pub mod profile;
pub mod pulse;
pub mod time;
pub mod tools;

pub use error::{Error, Result};
pub use profile::{Profile, Tier};
pub use runtime::thread::{
    Failure, Priority, ThreadHandle, ThreadId, ThreadOptions, ThreadState,
};
pub use runtime::yield_now::{YieldNow, yield_now};
pub use runtime::{
    Context, PulseReport, STRATEGY_ENV, Scheduler, SchedulerBuilder, Strategy, TIER_ENV,
};
