use serde::{Deserialize, Serialize};

use crate::prelude::*;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// Type safe wrapper for game phase
/// The value is scaled from 0 (midgame) to 256 (full endgame)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Phase(pub i32);

impl Phase {
    /// Weight of the middlegame component, in `[0, 1]`.
    pub fn midgame_weight(&self) -> f32 {
        (ENDGAME_PHASE - self.0) as f32 / ENDGAME_PHASE as f32
    }

    pub fn endgame_weight(&self) -> f32 {
        1.0 - self.midgame_weight()
    }
}

/// Score that holds seperate values for midgame and endgame
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash, Serialize, Deserialize,
)]
pub struct Score {
    // MidGame score
    pub mg: i32,
    // EndGame score
    pub eg: i32,
}

impl Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MG: {}, EG: {}", self.mg, self.eg)
    }
}

impl Score {
    #[inline(always)]
    /// Creates a new score with distinct midgame and endgame values
    pub const fn new(mg: i32, eg: i32) -> Self {
        Self { mg, eg }
    }

    /// Creates a score where midgame and endgame values are the same
    /// Useful for evaluation terms that are not phase-dependent
    #[inline(always)]
    pub const fn splat(score: i32) -> Self {
        Self {
            mg: score,
            eg: score,
        }
    }

    /// Only counts while there is middlegame material on the board
    #[inline(always)]
    pub const fn midgame(score: i32) -> Self {
        Self { mg: score, eg: 0 }
    }

    /// Only counts as the board empties out
    #[inline(always)]
    pub const fn endgame(score: i32) -> Self {
        Self { mg: 0, eg: score }
    }

    /// Blends both components linearly by phase. Integer division truncates
    /// toward zero, so `(-s).taper(p) == -(s.taper(p))`.
    #[inline]
    pub const fn taper(&self, phase: Phase) -> i32 {
        let mg_w = ENDGAME_PHASE - phase.0;
        let eg_w = phase.0;
        ((self.mg * mg_w) + (self.eg * eg_w)) / ENDGAME_PHASE
    }
}

impl Add for Score {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            mg: self.mg + rhs.mg,
            eg: self.eg + rhs.eg,
        }
    }
}

impl AddAssign for Score {
    fn add_assign(&mut self, rhs: Self) {
        self.mg += rhs.mg;
        self.eg += rhs.eg;
    }
}

impl Sub for Score {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            mg: self.mg - rhs.mg,
            eg: self.eg - rhs.eg,
        }
    }
}

impl SubAssign for Score {
    fn sub_assign(&mut self, rhs: Self) {
        self.mg -= rhs.mg;
        self.eg -= rhs.eg;
    }
}

impl Neg for Score {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            mg: -self.mg,
            eg: -self.eg,
        }
    }
}

impl Mul<i32> for Score {
    type Output = Self;

    fn mul(self, rhs: i32) -> Self::Output {
        Self {
            mg: self.mg * rhs,
            eg: self.eg * rhs,
        }
    }
}
