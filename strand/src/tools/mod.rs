//! Helpers built on top of the scheduler.
//!
//! This module provides:
//! - [`for_each`], which walks any collection one item per step,
//! - [`for_range`], a numeric `for` loop spread over pulses.

mod iterate;

#[doc(inline)]
pub use iterate::{for_each, for_range};
