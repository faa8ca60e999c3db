//! Position oracle.
//!
//! The search never looks inside a board. Everything it needs (legal moves,
//! make/undo, terminal state, hashing, occupancy) goes through [`Position`].
//! [`Board`] implements it on top of the `chess` crate.

use std::fmt::Debug;
use std::ops::{Deref, DerefMut};

use crate::prelude::*;

pub mod chess_board;
pub mod components;

#[cfg(test)]
pub(crate) mod tests;

pub use chess_board::Board;
pub use components::{Piece, Side};

/// Everything the search core consumes from the rules engine.
///
/// The position is used as a mutable stack-like cursor: every
/// [`Position::make_move`] must be followed by exactly one matching
/// [`Position::undo_move`], after which the position and its hash are
/// bit-identical to what they were before the move.
pub trait Position {
    type Move: Copy + Eq + Debug + Display;

    fn legal_moves(&self) -> Vec<Self::Move>;

    fn make_move(&mut self, mv: Self::Move);

    fn undo_move(&mut self, mv: Self::Move);

    fn side_to_move(&self) -> Side;

    fn is_checkmate(&self) -> bool;

    /// Draw by rule: stalemate, repetition, fifty-move rule or insufficient
    /// material, as the oracle defines them.
    fn is_draw(&self) -> bool;

    fn zobrist_key(&self) -> u64;

    /// Occupancy mask for `piece` of `side`, bit `rank * 8 + file` (a1 = 0).
    fn piece_bitboard(&self, piece: Piece, side: Side) -> u64;

    fn piece_count(&self, piece: Piece, side: Side) -> u32 {
        self.piece_bitboard(piece, side).count_ones()
    }

    /// `(file, rank)`, both in `0..8`.
    fn king_square(&self, side: Side) -> (u8, u8);

    fn is_capture(&self, mv: Self::Move) -> bool;

    fn is_promotion(&self, mv: Self::Move) -> bool;

    /// Makes `mv` and returns a guard that undoes it when dropped, so every
    /// exit path of the caller restores the position.
    fn play(&mut self, mv: Self::Move) -> MadeMove<'_, Self>
    where
        Self: Sized,
    {
        self.make_move(mv);
        MadeMove { pos: self, mv }
    }
}

/// A move that has been made on a position and is undone on drop.
pub struct MadeMove<'a, P: Position> {
    pos: &'a mut P,
    mv: P::Move,
}

impl<P: Position> Deref for MadeMove<'_, P> {
    type Target = P;

    fn deref(&self) -> &Self::Target {
        self.pos
    }
}

impl<P: Position> DerefMut for MadeMove<'_, P> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.pos
    }
}

impl<P: Position> Drop for MadeMove<'_, P> {
    fn drop(&mut self) {
        self.pos.undo_move(self.mv);
    }
}
