use super::accumulator::{EvalAccumulator, Term};
use crate::prelude::*;

/// Distance of a square from the centre, in half-squares: `|7 - 2r| + |7 - 2f|`.
/// 2 on d4/e4/d5/e5, 14 in a corner.
#[inline(always)]
pub const fn center_distance(file: u8, rank: u8) -> i32 {
    (7 - 2 * rank as i32).abs() + (7 - 2 * file as i32).abs()
}

/// Kings hide while there is material around and walk to the centre once it
/// is gone. The same term is a bonus in the middlegame and a penalty in the
/// endgame.
pub(crate) fn eval_king<P: Position>(pos: &P, acc: &mut impl EvalAccumulator) {
    for side in Side::SIDES {
        let (file, rank) = pos.king_square(side);
        let v = center_distance(file, rank) * acc.params().king_center_weight / 2;
        acc.add(Term::KingActivity, Score::new(v, -v), side);
    }
}
