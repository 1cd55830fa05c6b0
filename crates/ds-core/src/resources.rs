//! Resource vectors: `(cores, memory, disk)` triples.
//!
//! Used both for a server's capacity and for a job's requirement. The two
//! orderings below are deliberately separate: strict dominance answers
//! "fits with room to spare", weak dominance answers "fits at all".

use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// A capacity or requirement triple.
///
/// Components are signed: assigning a job that does not fit drives a
/// server's free vector negative instead of panicking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ResourceVector {
    pub cores: i64,
    pub memory: i64,
    pub disk: i64,
}

impl ResourceVector {
    pub const ZERO: Self = Self::new(0, 0, 0);

    pub const fn new(cores: i64, memory: i64, disk: i64) -> Self {
        Self {
            cores,
            memory,
            disk,
        }
    }

    /// `true` iff every component of `self` exceeds the matching one of `other`.
    pub fn dominates_strict(&self, other: &Self) -> bool {
        self.cores > other.cores && self.memory > other.memory && self.disk > other.disk
    }

    /// `true` iff every component of `self` is at least the matching one of `other`.
    pub fn dominates_weak(&self, other: &Self) -> bool {
        self.cores >= other.cores && self.memory >= other.memory && self.disk >= other.disk
    }

    /// `true` if no component is below zero.
    pub fn is_non_negative(&self) -> bool {
        self.dominates_weak(&Self::ZERO)
    }
}

impl Add for ResourceVector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.cores + rhs.cores,
            self.memory + rhs.memory,
            self.disk + rhs.disk,
        )
    }
}

impl AddAssign for ResourceVector {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for ResourceVector {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(
            self.cores - rhs.cores,
            self.memory - rhs.memory,
            self.disk - rhs.disk,
        )
    }
}

impl SubAssign for ResourceVector {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl std::iter::Sum for ResourceVector {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for ResourceVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.cores, self.memory, self.disk)
    }
}

/// Which ordering a "fits now" check uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dominance {
    /// All components strictly greater.
    Strict,
    /// All components greater or equal.
    #[default]
    Weak,
}

impl Dominance {
    /// Does `capacity` dominate `requirement` under this ordering?
    pub fn holds(self, capacity: &ResourceVector, requirement: &ResourceVector) -> bool {
        match self {
            Dominance::Strict => capacity.dominates_strict(requirement),
            Dominance::Weak => capacity.dominates_weak(requirement),
        }
    }
}
