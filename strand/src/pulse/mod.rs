//! Periodic callback port.
//!
//! The scheduler does not own a timer. It asks a [`PulseService`] to call
//! it back every `interval`, and cancels that request once no thread can
//! make progress. [`Ticker`] is the implementation hosts plug into their
//! own frame or timer loop.

mod ticker;

use std::fmt;
use std::time::Duration;

#[doc(inline)]
pub use ticker::Ticker;

/// A callback invoked on every pulse.
pub type PulseFn = Box<dyn FnMut()>;

/// Identifier of a started pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PulseId(u64);

impl PulseId {
    /// Creates an identifier from its raw value.
    pub const fn from_u64(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PulseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pulse#{}", self.0)
    }
}

/// A facility that invokes callbacks periodically.
///
/// Implementations must tolerate `start` and `cancel` being called from
/// inside a running callback, including a callback cancelling itself.
pub trait PulseService {
    /// Starts invoking `pulse` every `interval`.
    ///
    /// A zero interval means "as often as the host loop allows".
    fn start(&self, interval: Duration, pulse: PulseFn) -> PulseId;

    /// Stops a pulse. Unknown or already cancelled ids are ignored.
    fn cancel(&self, id: PulseId);
}
