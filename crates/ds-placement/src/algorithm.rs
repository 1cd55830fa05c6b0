//! Algorithm selection.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlacementError {
    #[error("unknown scheduler '{0}' (expected one of: fff, ff, fc, bf, wf, lrr)")]
    UnknownAlgorithm(String),
}

/// A placement algorithm, named on the command line by its short form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// First fit now, else the ever-capable server with the lowest core load.
    #[default]
    FairFirstFit,
    /// First fit now, else first ever-capable.
    FirstFit,
    /// First ever-capable; the job is left unplaced if there is none.
    FirstCapable,
    /// Fits now with the fewest free cores, else first ever-capable.
    BestFit,
    /// Fits now with the most free cores, else the largest ever-capable.
    WorstFit,
    /// Rotate through the servers of the largest type.
    LargestRoundRobin,
}

impl Algorithm {
    pub const ALL: [Algorithm; 6] = [
        Algorithm::FairFirstFit,
        Algorithm::FirstFit,
        Algorithm::FirstCapable,
        Algorithm::BestFit,
        Algorithm::WorstFit,
        Algorithm::LargestRoundRobin,
    ];

    pub fn short_name(self) -> &'static str {
        match self {
            Algorithm::FairFirstFit => "fff",
            Algorithm::FirstFit => "ff",
            Algorithm::FirstCapable => "fc",
            Algorithm::BestFit => "bf",
            Algorithm::WorstFit => "wf",
            Algorithm::LargestRoundRobin => "lrr",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for Algorithm {
    type Err = PlacementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|a| a.short_name() == s)
            .ok_or_else(|| PlacementError::UnknownAlgorithm(s.to_string()))
    }
}
