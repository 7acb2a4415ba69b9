use crate::error::Error;

use std::fmt;
use std::str::FromStr;

/// Dispatch priority of a thread, in `1..=10`.
///
/// Only consulted when the scheduler runs [`Strategy::Priority`]; higher
/// values are visited first.
///
/// [`Strategy::Priority`]: crate::Strategy::Priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Priority(u8);

impl Priority {
    /// Lowest priority.
    pub const MIN: Priority = Priority(1);

    /// Highest priority.
    pub const MAX: Priority = Priority(10);

    /// Priority given to threads registered under the priority strategy
    /// without an explicit one.
    pub const DEFAULT: Priority = Priority(5);

    /// Creates a priority, or `None` if `value` is outside `1..=10`.
    pub const fn new(value: u8) -> Option<Self> {
        if value >= Self::MIN.0 && value <= Self::MAX.0 {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Creates a priority, clamping `value` into `1..=10`.
    pub fn saturating(value: i64) -> Self {
        Self(value.clamp(Self::MIN.0 as i64, Self::MAX.0 as i64) as u8)
    }

    /// Returns the numeric value.
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map_err(|_| Error::InvalidPriority(s.to_owned()))
            .and_then(Priority::try_from)
    }
}

impl TryFrom<i64> for Priority {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .and_then(Priority::new)
            .ok_or_else(|| Error::InvalidPriority(value.to_string()))
    }
}

impl TryFrom<i32> for Priority {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Priority::try_from(i64::from(value))
    }
}

impl TryFrom<u8> for Priority {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Priority::try_from(i64::from(value))
    }
}

impl TryFrom<&str> for Priority {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}
