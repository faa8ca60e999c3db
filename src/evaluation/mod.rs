use crate::{
    evaluation::accumulator::{EvalTrace, ScoreAccumulator, TraceAccumulator},
    prelude::*,
};

pub mod score;

pub mod accumulator;
pub mod king;
pub mod material;
pub mod params;
pub mod pawn_structure;
pub mod position;

#[cfg(test)]
mod tests;

use king::eval_king;
use material::eval_material;
use pawn_structure::eval_pawn_structure;
use position::{eval_development, eval_position};

pub use material::{MaterialEvaluator, game_phase};

/// Static evaluation seen by the search.
pub trait Evaluator {
    /// Centipawns from the side to move's point of view.
    fn evaluate<P: Position>(&self, pos: &P) -> i32;
    fn name(&self) -> &str;
}

/// Iterates the set squares of a bitboard, lowest first.
#[inline]
pub(crate) fn squares(mut bb: u64) -> impl Iterator<Item = usize> {
    std::iter::from_fn(move || {
        if bb == 0 {
            return None;
        }
        let sq = bb.trailing_zeros() as usize;
        bb &= bb - 1;
        Some(sq)
    })
}

// Generic driver function
fn eval_all<P: Position>(pos: &P, acc: &mut impl accumulator::EvalAccumulator) {
    eval_material(pos, acc);
    eval_position(pos, acc);
    eval_pawn_structure(pos, acc);
    eval_development(pos, acc);
    eval_king(pos, acc);
}

/// Material, piece-square tables, pawn structure, development and king
/// activity, blended by game phase.
///
/// Every term is accumulated from White's side and tapered with integer
/// arithmetic before the sign flip, so a position and the same position
/// with the other side to move always evaluate to exact negatives.
#[derive(Debug, Clone)]
pub struct PhasedEvaluator {
    name: String,
    params: EvalParams,
}

impl Default for PhasedEvaluator {
    fn default() -> Self {
        Self::new(EvalParams::default())
    }
}

impl PhasedEvaluator {
    pub fn new(params: EvalParams) -> Self {
        Self {
            name: "Phased".to_string(),
            params,
        }
    }

    pub fn params(&self) -> &EvalParams {
        &self.params
    }

    /// White-relative tapered score.
    pub fn evaluate_white<P: Position>(&self, pos: &P) -> i32 {
        let mut acc = ScoreAccumulator::new(&self.params);
        eval_all(pos, &mut acc);
        acc.score.taper(game_phase(pos, &self.params))
    }

    /// Per-term breakdown of the evaluation, White-relative.
    pub fn trace<P: Position>(&self, pos: &P) -> EvalTrace {
        let mut trace = EvalTrace {
            phase: game_phase(pos, &self.params),
            ..Default::default()
        };
        let mut acc = TraceAccumulator {
            params: &self.params,
            trace: &mut trace,
        };
        eval_all(pos, &mut acc);
        trace
    }
}

impl Evaluator for PhasedEvaluator {
    fn evaluate<P: Position>(&self, pos: &P) -> i32 {
        let score = self.evaluate_white(pos);
        if pos.side_to_move() == Side::White {
            score
        } else {
            -score
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
