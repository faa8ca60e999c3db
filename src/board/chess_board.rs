use std::fmt;

use chess::{BitBoard, BoardStatus, ChessMove, Color, File, MoveGen, Rank, Square};
use miette::miette;

use crate::prelude::*;

/// Snapshot pushed by every `make_move`. The `chess` crate is copy-make, so
/// undoing is just restoring the previous copy.
#[derive(Debug, Clone, Copy)]
struct Undo {
    board: chess::Board,
    halfmove_clock: u32,
    fullmove_number: u32,
    mv: ChessMove,
}

/// How a finished game ended, as a match host adjudicates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Checkmate { winner: Side },
    Stalemate,
    Repetition,
    FiftyMoves,
    InsufficientMaterial,
}

impl Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameOutcome::Checkmate { winner } => write!(f, "{winner} wins by checkmate"),
            GameOutcome::Stalemate => write!(f, "draw by stalemate"),
            GameOutcome::Repetition => write!(f, "draw by threefold repetition"),
            GameOutcome::FiftyMoves => write!(f, "draw by fifty-move rule"),
            GameOutcome::InsufficientMaterial => write!(f, "draw by insufficient material"),
        }
    }
}

/// Game board: a `chess::Board` plus the state the rules engine does not
/// keep itself (undo stack, half-move clock, position history).
#[derive(Debug, Clone)]
pub struct Board {
    inner: chess::Board,
    halfmove_clock: u32,
    fullmove_number: u32,
    undo_stack: Vec<Undo>,
    /// Hash of every position before the current one, oldest first.
    key_history: Vec<u64>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            inner: chess::Board::default(),
            halfmove_clock: 0,
            fullmove_number: 1,
            undo_stack: Vec::with_capacity(MAX_DEPTH as usize),
            key_history: Vec::with_capacity(MAX_DEPTH as usize),
        }
    }

    pub fn from_fen(fen: &str) -> miette::Result<Self> {
        let inner = chess::Board::from_str(fen.trim())
            .map_err(|e| miette!("Invalid FEN '{fen}': {e:?}"))?;

        let mut fields = fen.split_ascii_whitespace().skip(4);
        let halfmove_clock = fields.next().and_then(|s| s.parse().ok()).unwrap_or(0);
        let fullmove_number = fields
            .next()
            .and_then(|s| s.parse().ok())
            .unwrap_or(1)
            .max(1);

        Ok(Self {
            inner,
            halfmove_clock,
            fullmove_number,
            ..Self::new()
        })
    }

    pub fn to_fen(&self) -> String {
        let fen = self.inner.to_string();
        let placement: Vec<&str> = fen.split_ascii_whitespace().take(4).collect();
        format!(
            "{} {} {}",
            placement.join(" "),
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    pub fn inner(&self) -> &chess::Board {
        &self.inner
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    /// Number of moves that can currently be undone.
    pub fn history_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn last_move(&self) -> Option<ChessMove> {
        self.undo_stack.last().map(|u| u.mv)
    }

    pub fn is_in_check(&self) -> bool {
        *self.inner.checkers() != chess::EMPTY
    }

    /// Finds the legal move written in UCI long algebraic notation.
    pub fn parse_move(&self, uci: &str) -> miette::Result<ChessMove> {
        let wanted = uci.trim().to_ascii_lowercase();
        MoveGen::new_legal(&self.inner)
            .find(|mv| mv.to_string() == wanted)
            .ok_or_else(|| miette!("'{uci}' is not a legal move in {}", self.to_fen()))
    }

    pub fn play_uci(&mut self, uci: &str) -> miette::Result<ChessMove> {
        let mv = self.parse_move(uci)?;
        self.make_move(mv);
        Ok(mv)
    }

    pub fn is_legal(&self, mv: ChessMove) -> bool {
        self.inner.legal(mv)
    }

    /// Times the current position occurred earlier since the last
    /// irreversible move.
    pub fn repetitions(&self) -> usize {
        let key = self.inner.get_hash();
        self.key_history
            .iter()
            .rev()
            .take(self.halfmove_clock as usize)
            .filter(|&&k| k == key)
            .count()
    }

    /// No side can possibly deliver mate: bare kings or a single minor piece.
    pub fn has_insufficient_material(&self) -> bool {
        let b = &self.inner;
        let heavy = *b.pieces(chess::Piece::Pawn)
            | *b.pieces(chess::Piece::Rook)
            | *b.pieces(chess::Piece::Queen);
        if heavy != chess::EMPTY {
            return false;
        }
        let minors = *b.pieces(chess::Piece::Knight) | *b.pieces(chess::Piece::Bishop);
        minors.popcnt() <= 1
    }

    /// Result of the game as a match host sees it. Unlike [`Position::is_draw`]
    /// this needs a threefold repetition.
    pub fn outcome(&self) -> Option<GameOutcome> {
        match self.inner.status() {
            BoardStatus::Checkmate => {
                return Some(GameOutcome::Checkmate {
                    winner: self.side_to_move().flip(),
                });
            }
            BoardStatus::Stalemate => return Some(GameOutcome::Stalemate),
            BoardStatus::Ongoing => {}
        }
        if self.has_insufficient_material() {
            Some(GameOutcome::InsufficientMaterial)
        } else if self.halfmove_clock >= 100 {
            Some(GameOutcome::FiftyMoves)
        } else if self.repetitions() >= 2 {
            Some(GameOutcome::Repetition)
        } else {
            None
        }
    }

    fn is_pawn_move(&self, mv: ChessMove) -> bool {
        self.inner.piece_on(mv.get_source()) == Some(chess::Piece::Pawn)
    }
}

impl Position for Board {
    type Move = ChessMove;

    fn legal_moves(&self) -> Vec<ChessMove> {
        MoveGen::new_legal(&self.inner).collect()
    }

    fn make_move(&mut self, mv: ChessMove) {
        let irreversible = self.is_pawn_move(mv) || self.is_capture(mv);
        self.undo_stack.push(Undo {
            board: self.inner,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            mv,
        });
        self.key_history.push(self.inner.get_hash());

        if self.inner.side_to_move() == Color::Black {
            self.fullmove_number += 1;
        }
        self.halfmove_clock = if irreversible {
            0
        } else {
            self.halfmove_clock + 1
        };
        self.inner = self.inner.make_move_new(mv);
    }

    fn undo_move(&mut self, mv: ChessMove) {
        let Some(undo) = self.undo_stack.pop() else {
            debug_assert!(false, "undo_move({mv}) with an empty undo stack");
            error!("undo_move({mv}) called with nothing to undo");
            return;
        };
        debug_assert_eq!(undo.mv, mv, "moves must be undone in reverse order");
        self.key_history.pop();
        self.inner = undo.board;
        self.halfmove_clock = undo.halfmove_clock;
        self.fullmove_number = undo.fullmove_number;
    }

    fn side_to_move(&self) -> Side {
        match self.inner.side_to_move() {
            Color::White => Side::White,
            Color::Black => Side::Black,
        }
    }

    fn is_checkmate(&self) -> bool {
        self.inner.status() == BoardStatus::Checkmate
    }

    /// A single earlier occurrence already counts as a repetition here,
    /// which keeps the search from walking into repeated lines.
    fn is_draw(&self) -> bool {
        self.inner.status() == BoardStatus::Stalemate
            || self.halfmove_clock >= 100
            || self.has_insufficient_material()
            || self.repetitions() >= 1
    }

    fn zobrist_key(&self) -> u64 {
        self.inner.get_hash()
    }

    fn piece_bitboard(&self, piece: Piece, side: Side) -> u64 {
        let bb: BitBoard =
            *self.inner.pieces(to_chess_piece(piece)) & *self.inner.color_combined(to_color(side));
        bb.0
    }

    fn king_square(&self, side: Side) -> (u8, u8) {
        let sq = self.inner.king_square(to_color(side));
        (sq.get_file().to_index() as u8, sq.get_rank().to_index() as u8)
    }

    fn is_capture(&self, mv: ChessMove) -> bool {
        if self.inner.piece_on(mv.get_dest()).is_some() {
            return true;
        }
        // En passant: a pawn changing file onto an empty square
        self.is_pawn_move(mv) && mv.get_source().get_file() != mv.get_dest().get_file()
    }

    fn is_promotion(&self, mv: ChessMove) -> bool {
        mv.get_promotion().is_some()
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..NUM_RANKS).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..NUM_FILES {
                let sq = Square::make_square(Rank::from_index(rank), File::from_index(file));
                let c = match (self.inner.piece_on(sq), self.inner.color_on(sq)) {
                    (Some(piece), Some(color)) => {
                        from_chess_piece(piece).to_char(from_color(color))
                    }
                    _ => '.',
                };
                write!(f, " {c}")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "   a b c d e f g h")?;
        write!(f, "{} to move, fen: {}", self.side_to_move(), self.to_fen())
    }
}

pub(crate) const fn to_color(side: Side) -> Color {
    match side {
        Side::White => Color::White,
        Side::Black => Color::Black,
    }
}

const fn from_color(color: Color) -> Side {
    match color {
        Color::White => Side::White,
        Color::Black => Side::Black,
    }
}

pub(crate) const fn to_chess_piece(piece: Piece) -> chess::Piece {
    match piece {
        Piece::Pawn => chess::Piece::Pawn,
        Piece::Knight => chess::Piece::Knight,
        Piece::Bishop => chess::Piece::Bishop,
        Piece::Rook => chess::Piece::Rook,
        Piece::Queen => chess::Piece::Queen,
        Piece::King => chess::Piece::King,
    }
}

const fn from_chess_piece(piece: chess::Piece) -> Piece {
    match piece {
        chess::Piece::Pawn => Piece::Pawn,
        chess::Piece::Knight => Piece::Knight,
        chess::Piece::Bishop => Piece::Bishop,
        chess::Piece::Rook => Piece::Rook,
        chess::Piece::Queen => Piece::Queen,
        chess::Piece::King => Piece::King,
    }
}
