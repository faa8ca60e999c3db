use std::collections::HashSet;

use proptest::prelude::*;

use crate::board::chess_board::GameOutcome;
use crate::prelude::*;

/// Plays a pseudo-random line from `fen`, picking `choice % len` each ply.
pub(crate) fn playout(fen: &str, choices: &[usize]) -> Board {
    let mut board = Board::from_fen(fen).expect("valid test FEN");
    for &choice in choices {
        let moves = board.legal_moves();
        if moves.is_empty() {
            break;
        }
        board.make_move(moves[choice % moves.len()]);
    }
    board
}

#[test]
fn from_fen_keeps_move_counters() {
    let board = Board::from_fen(KIWIPETE).unwrap();
    assert_eq!(board.to_fen(), KIWIPETE);

    let board = Board::from_fen("8/8/8/4k3/8/8/8/4K2R w K - 37 80").unwrap();
    assert_eq!(board.halfmove_clock(), 37);
    assert!(board.to_fen().ends_with("37 80"));
}

#[test]
fn invalid_fen_is_an_error() {
    assert!(Board::from_fen("not a fen").is_err());
}

#[test]
fn make_undo_restores_start_position() {
    let mut board = Board::new();
    let before = board.to_fen();
    let key = board.zobrist_key();

    let e4 = board.play_uci("e2e4").unwrap();
    assert_ne!(board.zobrist_key(), key);
    assert_eq!(board.side_to_move(), Side::Black);
    board.undo_move(e4);

    assert_eq!(board.zobrist_key(), key);
    assert_eq!(board.to_fen(), before);
    assert_eq!(board.history_len(), 0);
}

#[test]
fn scoped_move_is_undone_on_drop() {
    let mut board = Board::new();
    let key = board.zobrist_key();
    let mv = board.parse_move("g1f3").unwrap();
    {
        let child = board.play(mv);
        assert_eq!(child.side_to_move(), Side::Black);
        assert_ne!(child.zobrist_key(), key);
    }
    assert_eq!(board.zobrist_key(), key);
}

#[test]
fn capture_and_promotion_flags() {
    // White can capture d5 with e4 and promote on b8
    let board = Board::from_fen("4k3/1P6/8/3p4/4P3/8/8/4K3 w - - 0 1").unwrap();
    let capture = board.parse_move("e4d5").unwrap();
    let push = board.parse_move("e4e5").unwrap();
    let promo = board.parse_move("b7b8q").unwrap();

    assert!(board.is_capture(capture));
    assert!(!board.is_capture(push));
    assert!(board.is_promotion(promo));
    assert!(!board.is_promotion(capture));
}

#[test]
fn en_passant_counts_as_capture() {
    let board = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").unwrap();
    let ep = board.parse_move("e5d6").unwrap();
    assert!(board.is_capture(ep));
}

#[test]
fn checkmate_and_stalemate_queries() {
    let mated =
        Board::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3").unwrap();
    assert!(mated.is_checkmate());
    assert!(!mated.is_draw());
    assert_eq!(
        mated.outcome(),
        Some(GameOutcome::Checkmate {
            winner: Side::Black
        })
    );

    let stalemate = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    assert!(!stalemate.is_checkmate());
    assert!(stalemate.is_draw());
    assert_eq!(stalemate.outcome(), Some(GameOutcome::Stalemate));
}

#[test]
fn insufficient_material_and_fifty_moves() {
    let bare = Board::from_fen("8/8/8/4k3/8/8/8/4K3 w - - 0 1").unwrap();
    assert!(bare.has_insufficient_material());
    assert!(bare.is_draw());

    let knight = Board::from_fen("8/8/8/4k3/8/8/8/4KN2 w - - 0 1").unwrap();
    assert!(knight.has_insufficient_material());

    let rook = Board::from_fen("8/8/8/4k3/8/8/8/4K2R w - - 0 1").unwrap();
    assert!(!rook.has_insufficient_material());
    assert!(!rook.is_draw());

    let fifty = Board::from_fen("8/8/8/4k3/8/8/8/4K2R w - - 100 90").unwrap();
    assert!(fifty.is_draw());
    assert_eq!(fifty.outcome(), Some(GameOutcome::FiftyMoves));
}

#[test]
fn repetition_is_a_draw_for_search_before_the_game_ends() {
    let mut board = Board::new();
    for uci in ["g1f3", "g8f6", "f3g1", "f6g8"] {
        board.play_uci(uci).unwrap();
    }
    // Start position seen twice: search treats it as drawn, the game goes on
    assert_eq!(board.repetitions(), 1);
    assert!(board.is_draw());
    assert_eq!(board.outcome(), None);

    for uci in ["g1f3", "g8f6", "f3g1", "f6g8"] {
        board.play_uci(uci).unwrap();
    }
    assert_eq!(board.outcome(), Some(GameOutcome::Repetition));
}

#[test]
fn occupancy_queries() {
    let board = Board::new();
    assert_eq!(board.piece_count(Piece::Pawn, Side::White), 8);
    assert_eq!(board.piece_count(Piece::Queen, Side::Black), 1);
    assert_eq!(board.piece_bitboard(Piece::Pawn, Side::White), RANK_MASKS[1]);
    assert_eq!(board.king_square(Side::White), (4, 0));
    assert_eq!(board.king_square(Side::Black), (4, 7));
}

#[test]
fn parse_move_rejects_illegal_moves() {
    let board = Board::new();
    assert!(board.parse_move("e2e5").is_err());
    assert!(board.parse_move("E2E4").is_ok());
}

proptest! {
    #[test]
    fn undo_restores_hash_and_moves(choices in prop::collection::vec(0usize..64, 0..16)) {
        let mut board = playout(START_FEN, &choices);
        let key = board.zobrist_key();
        let fen = board.to_fen();
        let moves: HashSet<String> = board.legal_moves().iter().map(|m| m.to_string()).collect();

        for mv in board.legal_moves() {
            board.make_move(mv);
            board.undo_move(mv);

            prop_assert_eq!(board.zobrist_key(), key);
            prop_assert_eq!(&board.to_fen(), &fen);
            let after: HashSet<String> =
                board.legal_moves().iter().map(|m| m.to_string()).collect();
            prop_assert_eq!(&after, &moves);
        }
    }
}
