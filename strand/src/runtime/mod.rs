//! Scheduler runtime.
//!
//! This module contains the scheduler and the pieces it is built from:
//! - the thread registry and per-thread state,
//! - the three dispatch strategies,
//! - the context handed to running threads,
//! - cooperative yielding.

mod core;
mod dispatch;

pub(crate) mod builder;
pub(crate) mod context;
pub(crate) mod strategy;
pub(crate) mod yield_now;

pub mod thread;

pub use self::core::Scheduler;
pub use builder::{STRATEGY_ENV, SchedulerBuilder, TIER_ENV};
pub use context::Context;
pub use dispatch::PulseReport;
pub use strategy::Strategy;
