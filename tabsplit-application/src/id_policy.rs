use std::{fmt, str::FromStr};

use thiserror::Error;

/// How new person and purchase ids are chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IdPolicy {
    /// Ids only ever grow; a deleted id is never handed out again.
    #[default]
    Monotonic,
    /// The lowest free id is reused, matching data written by older versions.
    FillLowestGap,
}

impl IdPolicy {
    /// Picks the next id.
    ///
    /// `sorted_ids` must be ascending. `counter` is the persisted high-water mark and is only
    /// consulted by [`IdPolicy::Monotonic`].
    pub fn next_id<I>(self, sorted_ids: I, counter: u64) -> u64
    where
        I: IntoIterator<Item = u64>,
    {
        match self {
            Self::Monotonic => {
                let after_max = sorted_ids.into_iter().last().map_or(1, |max| max + 1);
                after_max.max(counter).max(1)
            }
            Self::FillLowestGap => {
                let mut len = 0;
                for (idx, id) in sorted_ids.into_iter().enumerate() {
                    let expected = idx as u64 + 1;
                    if id != expected {
                        return expected;
                    }
                    len = expected;
                }
                len + 1
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monotonic => "monotonic",
            Self::FillLowestGap => "fill-gap",
        }
    }
}

impl fmt::Display for IdPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown id policy '{0}' (expected 'monotonic' or 'fill-gap')")]
pub struct UnknownIdPolicy(pub String);

impl FromStr for IdPolicy {
    type Err = UnknownIdPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monotonic" => Ok(Self::Monotonic),
            "fill-gap" | "fill-lowest-gap" => Ok(Self::FillLowestGap),
            _ => Err(UnknownIdPolicy(s.to_string())),
        }
    }
}
