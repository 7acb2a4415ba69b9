use crate::error::Error;

use std::fmt;
use std::str::FromStr;

/// Execution strategy of a scheduler.
///
/// The strategy only decides which threads a pulse resumes and in what
/// order. Switching strategies never resets a thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strategy {
    /// Round-robin: every runnable thread is resumed once per pulse, until
    /// the pulse budget runs out.
    #[default]
    Concurrent,

    /// One thread at a time: the current thread is resumed repeatedly until
    /// it finishes, then the next one is adopted.
    Sequential,

    /// Like [`Concurrent`](Strategy::Concurrent), but threads are visited
    /// by descending priority.
    Priority,
}

impl Strategy {
    /// All strategies.
    pub const ALL: [Strategy; 3] = [
        Strategy::Concurrent,
        Strategy::Sequential,
        Strategy::Priority,
    ];

    /// Returns the strategy's name as accepted by [`FromStr`].
    pub const fn as_str(self) -> &'static str {
        match self {
            Strategy::Concurrent => "concurrent",
            Strategy::Sequential => "sequential",
            Strategy::Priority => "priority",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| Error::UnknownStrategy(s.to_owned()))
    }
}

impl TryFrom<&str> for Strategy {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl TryFrom<String> for Strategy {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
