use super::{
    accumulator::{EvalAccumulator, Term},
    squares,
};
use crate::prelude::*;

/// d4, e4, d5, e5
pub const CENTER_MASK: u64 = (1 << 27) | (1 << 28) | (1 << 35) | (1 << 36);

pub(crate) fn eval_pawn_structure<P: Position>(pos: &P, acc: &mut impl EvalAccumulator) {
    for side in Side::SIDES {
        let pawns = pos.piece_bitboard(Piece::Pawn, side);
        if pawns == 0 {
            continue;
        }
        let params = acc.params();

        let central = (pawns & CENTER_MASK).count_ones() as i32;

        let mut file_counts = [0i32; NUM_FILES];
        for sq in squares(pawns) {
            file_counts[sq % NUM_FILES] += 1;
        }

        let mut doubled = 0;
        let mut isolated = 0;
        for (file, &count) in file_counts.iter().enumerate() {
            if count == 0 {
                continue;
            }
            // Every pawn beyond the first on a file
            doubled += count - 1;

            let left = file > 0 && file_counts[file - 1] > 0;
            let right = file + 1 < NUM_FILES && file_counts[file + 1] > 0;
            if !left && !right {
                isolated += count;
            }
        }

        // Ranks past the fourth from this side's view, negative while behind it
        let advance: i32 = squares(pawns)
            .map(|sq| side.relative_rank(sq / NUM_FILES) as i32 - 3)
            .sum();

        let mg = central * params.central_pawn_bonus
            + doubled * params.doubled_pawn_penalty
            + isolated * params.isolated_pawn_penalty;
        let eg = advance * params.pawn_advance_bonus;

        acc.add(Term::PawnStructure, Score::new(mg, eg), side);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::accumulator::{EvalTrace, TraceAccumulator};

    fn pawn_score(fen: &str) -> Score {
        let board = Board::from_fen(fen).unwrap();
        let params = EvalParams::default();
        let mut trace = EvalTrace::default();
        let mut acc = TraceAccumulator {
            params: &params,
            trace: &mut trace,
        };
        eval_pawn_structure(&board, &mut acc);
        trace.term(Term::PawnStructure)
    }

    #[test]
    fn central_pawns_are_rewarded() {
        // e4 + d2 (connected, so nothing else fires) against d7 + e7
        let s = pawn_score("4k3/3pp3/8/8/4P3/8/3P4/4K3 w - - 0 1");
        assert_eq!(s.mg, 20);
    }

    #[test]
    fn doubled_and_isolated_pawns_are_penalised() {
        // White: a2, a3 doubled and isolated. Black: a7 alone, isolated.
        let s = pawn_score("4k3/p7/8/8/8/P7/P7/4K3 w - - 0 1");
        // White -15 doubled, -30 isolated; Black -15 isolated
        assert_eq!(s.mg, -15 - 30 + 15);
    }

    #[test]
    fn advanced_pawns_score_in_the_endgame() {
        // White pawn on the 6th (relative rank 5): +2 ranks. Black on its 7th: -2.
        let s = pawn_score("4k3/7p/P7/8/8/8/8/4K3 w - - 0 1");
        assert_eq!(s.eg, (2 * 5) - (-2 * 5));
    }

    #[test]
    fn mirrored_structures_cancel() {
        let s = pawn_score("4k3/pp3ppp/2p5/8/8/2P5/PP3PPP/4K3 w - - 0 1");
        assert_eq!(s, Score::default());
    }
}
