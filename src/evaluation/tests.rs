use proptest::prelude::*;

use crate::board::tests::playout;
use crate::prelude::*;

/// Same position with colours swapped and the board flipped top to bottom.
/// Castling and en passant are dropped; neither affects the evaluation.
fn mirror_fen(fen: &str) -> String {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    let placement: Vec<String> = fields[0]
        .split('/')
        .rev()
        .map(|rank| {
            rank.chars()
                .map(|c| {
                    if c.is_ascii_uppercase() {
                        c.to_ascii_lowercase()
                    } else {
                        c.to_ascii_uppercase()
                    }
                })
                .collect()
        })
        .collect();
    let stm = if fields[1] == "w" { "b" } else { "w" };
    format!("{} {stm} - - 0 1", placement.join("/"))
}

fn with_side_to_move_flipped(fen: &str) -> String {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    let stm = if fields[1] == "w" { "b" } else { "w" };
    format!("{} {stm} {} - 0 1", fields[0], fields[2])
}

#[test]
fn start_position_evaluates_to_zero() {
    let eval = PhasedEvaluator::default();
    assert_eq!(eval.evaluate(&Board::new()), 0);
}

#[test]
fn extra_queen_dominates() {
    let eval = PhasedEvaluator::default();
    let board =
        Board::from_fen("rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();
    assert!(eval.evaluate(&board) > 800);
}

#[test]
fn mirror_fen_round_trips() {
    assert_eq!(
        mirror_fen(&mirror_fen(KIWIPETE)),
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w - - 0 1"
    );
}

#[test]
fn trace_matches_evaluation() {
    let eval = PhasedEvaluator::default();
    let board = Board::from_fen(KIWIPETE).unwrap();
    let trace = eval.trace(&board);
    assert_eq!(trace.total().taper(trace.phase), eval.evaluate_white(&board));
    assert_eq!(eval.evaluate(&board), eval.evaluate_white(&board));
}

#[test]
fn king_walks_to_the_centre_in_the_endgame() {
    let eval = PhasedEvaluator::default();
    let centre = Board::from_fen("7k/8/8/8/3K4/8/4P3/8 b - - 0 1").unwrap();
    let corner = Board::from_fen("7k/8/8/8/8/8/4P3/K7 b - - 0 1").unwrap();
    // Black to move, so a better White king is worse for the mover
    assert!(eval.evaluate(&centre) < eval.evaluate(&corner));
}

proptest! {
    #[test]
    fn side_to_move_flip_negates(choices in prop::collection::vec(0usize..64, 0..24)) {
        let eval = PhasedEvaluator::default();
        let board = playout(START_FEN, &choices);
        let flipped = Board::from_fen(&with_side_to_move_flipped(&board.to_fen()));
        // Skipped when the flip would leave the side not to move in check
        prop_assume!(flipped.is_ok());
        let flipped = flipped.unwrap();

        prop_assert_eq!(eval.evaluate(&board), -eval.evaluate(&flipped));
    }

    #[test]
    fn colour_mirror_is_symmetric(choices in prop::collection::vec(0usize..64, 0..24)) {
        let eval = PhasedEvaluator::default();
        let board = playout(KIWIPETE, &choices);
        let mirrored = Board::from_fen(&mirror_fen(&board.to_fen())).unwrap();

        prop_assert_eq!(eval.evaluate(&board), eval.evaluate(&mirrored));
        prop_assert_eq!(eval.evaluate_white(&board), -eval.evaluate_white(&mirrored));
    }
}
