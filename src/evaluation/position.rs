use super::{
    accumulator::{EvalAccumulator, Term},
    squares,
};
use crate::prelude::*;

const RIM: u64 = FILE_MASKS[0] | FILE_MASKS[7];

// Home squares, indexed by side
const BISHOP_HOME: [u64; NUM_SIDES] = [(1 << 2) | (1 << 5), (1 << 58) | (1 << 61)];
const KNIGHT_HOME: [u64; NUM_SIDES] = [(1 << 1) | (1 << 6), (1 << 57) | (1 << 62)];
const QUEEN_HOME: [u64; NUM_SIDES] = [1 << 3, 1 << 59];

pub(crate) fn eval_position<P: Position>(pos: &P, acc: &mut impl EvalAccumulator) {
    for side in Side::SIDES {
        for piece in Piece::all_pieces() {
            for sq in squares(pos.piece_bitboard(piece, side)) {
                acc.add_pst(piece, side, sq);
            }
        }
    }
}

/// Opening hygiene: knights on the rim, bishops still at home, and a queen
/// out early while the minors are not developed.
pub(crate) fn eval_development<P: Position>(pos: &P, acc: &mut impl EvalAccumulator) {
    for side in Side::SIDES {
        let params = acc.params();
        let knights = pos.piece_bitboard(Piece::Knight, side);
        let bishops = pos.piece_bitboard(Piece::Bishop, side);
        let queens = pos.piece_bitboard(Piece::Queen, side);

        let rim_knights = (knights & RIM).count_ones() as i32;
        let home_bishops = (bishops & BISHOP_HOME[side.index()]).count_ones() as i32;
        let home_knights = (knights & KNIGHT_HOME[side.index()]).count_ones() as i32;

        let mut mg = rim_knights * params.knight_on_rim_penalty
            + home_bishops * params.undeveloped_bishop_penalty;

        let queen_out = queens != 0 && queens & QUEEN_HOME[side.index()] == 0;
        if queen_out && home_bishops + home_knights >= 2 {
            mg += params.early_queen_penalty;
        }

        acc.add(Term::Development, Score::midgame(mg), side);
    }
}
