//! Priority profile table.
//!
//! A [`Tier`] selects how often the scheduler pulses and how many
//! resumption steps a single pulse may spend. The table is fixed; only the
//! scheduler's active tier changes at runtime.

use crate::error::Error;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Throughput tier of a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tier {
    /// Pulse every 250ms, 8 steps per pulse.
    Low,

    /// Pulse every 100ms, 15 steps per pulse.
    #[default]
    Normal,

    /// Pulse every 50ms, 25 steps per pulse.
    High,

    /// Pulse on every host tick, 50 steps per pulse.
    Extreme,
}

/// Pulse interval and step budget of a [`Tier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    /// Delay between two pulses. Zero means "every host tick".
    pub interval: Duration,

    /// Maximum number of resumptions a single pulse may perform.
    pub budget: usize,
}

/// The profile table, in ascending throughput order.
pub const PROFILES: [(Tier, Profile); 4] = [
    (Tier::Low, Profile::new(250, 8)),
    (Tier::Normal, Profile::new(100, 15)),
    (Tier::High, Profile::new(50, 25)),
    (Tier::Extreme, Profile::new(0, 50)),
];

impl Profile {
    const fn new(interval_ms: u64, budget: usize) -> Self {
        Self {
            interval: Duration::from_millis(interval_ms),
            budget,
        }
    }
}

impl Tier {
    /// All tiers, in ascending throughput order.
    pub const ALL: [Tier; 4] = [Tier::Low, Tier::Normal, Tier::High, Tier::Extreme];

    /// Returns the interval and budget of this tier.
    pub const fn profile(self) -> Profile {
        match self {
            Tier::Low => PROFILES[0].1,
            Tier::Normal => PROFILES[1].1,
            Tier::High => PROFILES[2].1,
            Tier::Extreme => PROFILES[3].1,
        }
    }

    /// Returns the tier's name as accepted by [`FromStr`].
    pub const fn as_str(self) -> &'static str {
        match self {
            Tier::Low => "low",
            Tier::Normal => "normal",
            Tier::High => "high",
            Tier::Extreme => "extreme",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tier::ALL
            .into_iter()
            .find(|tier| tier.as_str() == s)
            .ok_or_else(|| Error::UnknownTier(s.to_owned()))
    }
}

impl TryFrom<&str> for Tier {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl TryFrom<String> for Tier {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
