use std::{fs, path::Path};

use miette::IntoDiagnostic;
use serde::{Deserialize, Serialize};
use serde_big_array::BigArray;

use crate::prelude::{NUM_PIECES, NUM_SQUARES, Piece, Score};

// PSTs (6 pieces * 64 squares = 384 params)
pub const NUM_PST_PARAMS: usize = NUM_PIECES * NUM_SQUARES;

/// Every constant the evaluation uses. Penalties are stored as negative
/// numbers and simply added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalParams {
    // Index 0=Pawn, 1=Knight, 2=Bishop, 3=Rook, 4=Queen
    pub piece_values: [i32; 5],

    // Phase ramp, in non-king material summed over both sides
    /// At or above this the position is scored as a pure middlegame
    pub midgame_material: i32,
    /// At or below this the position is scored as a pure endgame
    pub endgame_material: i32,

    // Middlegame terms
    pub central_pawn_bonus: i32,
    pub doubled_pawn_penalty: i32,
    pub isolated_pawn_penalty: i32,
    pub knight_on_rim_penalty: i32,
    pub undeveloped_bishop_penalty: i32,
    pub early_queen_penalty: i32,

    // Endgame terms
    /// Per rank a pawn stands beyond its fourth rank (negative behind it)
    pub pawn_advance_bonus: i32,

    // Both phases, with opposite signs
    /// Per half-square of king distance from the centre
    pub king_center_weight: i32,

    // Indexed by piece * 64 + square from White's side (a1 = 0)
    #[serde(with = "BigArray")]
    pub psts: [Score; NUM_PST_PARAMS],
}

impl Default for EvalParams {
    fn default() -> Self {
        // Tables are laid out as seen from White, rank 8 on top
        #[rustfmt::skip]
        let pawn_table = [
             0,  0,  0,  0,  0,  0,  0,  0,
            50, 50, 50, 50, 50, 50, 50, 50,
            10, 10, 20, 30, 30, 20, 10, 10,
             5,  5, 10, 25, 25, 10,  5,  5,
             0,  0,  0, 20, 20,  0,  0,  0,
             5, -5,-10,  0,  0,-10, -5,  5,
             5, 10, 10,-20,-20, 10, 10,  5,
             0,  0,  0,  0,  0,  0,  0,  0,
        ];

        // Go towards the center
        #[rustfmt::skip]
        let knight_table = [
            -50,-40,-30,-30,-30,-30,-40,-50,
            -40,-20,  0,  0,  0,  0,-20,-40,
            -30,  0, 10, 15, 15, 10,  0,-30,
            -30,  5, 15, 20, 20, 15,  5,-30,
            -30,  0, 15, 20, 20, 15,  0,-30,
            -30,  5, 10, 15, 15, 10,  5,-30,
            -40,-20,  0,  5,  5,  0,-20,-40,
            -50,-40,-30,-30,-30,-30,-40,-50,
        ];

        // Avoid corners and borders
        #[rustfmt::skip]
        let bishop_table = [
            -20,-10,-10,-10,-10,-10,-10,-20,
            -10,  0,  0,  0,  0,  0,  0,-10,
            -10,  0,  5, 10, 10,  5,  0,-10,
            -10,  5,  5, 10, 10,  5,  5,-10,
            -10,  0, 10, 10, 10, 10,  0,-10,
            -10, 10, 10, 10, 10, 10, 10,-10,
            -10,  5,  0,  0,  0,  0,  5,-10,
            -20,-10,-10,-10,-10,-10,-10,-20,
        ];

        #[rustfmt::skip]
        let rook_table = [
             0,  0,  0,  0,  0,  0,  0,  0,
             5, 10, 10, 10, 10, 10, 10,  5,
            -5,  0,  0,  0,  0,  0,  0, -5,
            -5,  0,  0,  0,  0,  0,  0, -5,
            -5,  0,  0,  0,  0,  0,  0, -5,
            -5,  0,  0,  0,  0,  0,  0, -5,
            -5,  0,  0,  0,  0,  0,  0, -5,
             0,  0,  0,  5,  5,  0,  0,  0,
        ];

        #[rustfmt::skip]
        let queen_table = [
            -20,-10,-10, -5, -5,-10,-10,-20,
            -10,  0,  0,  0,  0,  0,  0,-10,
            -10,  0,  5,  5,  5,  5,  0,-10,
             -5,  0,  5,  5,  5,  5,  0, -5,
             -5,  0,  5,  5,  5,  5,  0, -5,
            -10,  5,  5,  5,  5,  5,  0,-10,
            -10,  0,  5,  0,  0,  0,  0,-10,
            -20,-10,-10, -5, -5,-10,-10,-20,
        ];

        // Stay behind the pawns while there is material around
        #[rustfmt::skip]
        let king_table = [
            -30,-40,-40,-50,-50,-40,-40,-30,
            -30,-40,-40,-50,-50,-40,-40,-30,
            -30,-40,-40,-50,-50,-40,-40,-30,
            -30,-40,-40,-50,-50,-40,-40,-30,
            -20,-30,-30,-40,-40,-30,-30,-20,
            -10,-20,-20,-20,-20,-20,-20,-10,
             20, 20,  0,  0,  0,  0, 20, 20,
             20, 30, 10,  0,  0, 10, 30, 20,
        ];

        let tables = [
            pawn_table,
            knight_table,
            bishop_table,
            rook_table,
            queen_table,
            king_table,
        ];

        let mut psts = [Score::default(); NUM_PST_PARAMS];
        for piece in Piece::all_pieces() {
            let table = &tables[piece.index()];
            for sq in 0..NUM_SQUARES {
                let value = table[sq ^ 56];
                // Pawns and the king get their endgame shape from the
                // advancement and centralisation terms instead
                let eg = match piece {
                    Piece::Pawn | Piece::King => 0,
                    _ => value,
                };
                psts[piece.index() * NUM_SQUARES + sq] = Score::new(value, eg);
            }
        }

        Self {
            piece_values: [100, 320, 330, 500, 900],
            midgame_material: 3250,
            endgame_material: 2250,
            central_pawn_bonus: 20,
            doubled_pawn_penalty: -15,
            isolated_pawn_penalty: -15,
            knight_on_rim_penalty: -20,
            undeveloped_bishop_penalty: -15,
            early_queen_penalty: -25,
            pawn_advance_bonus: 5,
            king_center_weight: 5,
            psts,
        }
    }
}

impl EvalParams {
    #[inline(always)]
    pub fn piece_value(&self, piece: Piece) -> i32 {
        match piece {
            Piece::King => 0,
            _ => self.piece_values[piece.index()],
        }
    }

    /// Piece-square value for a piece of White on `sq`. Callers mirror the
    /// square for Black.
    #[inline(always)]
    pub fn pst(&self, piece: Piece, sq: usize) -> Score {
        self.psts[piece.index() * NUM_SQUARES + sq]
    }

    /// Save to TOML File
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> miette::Result<()> {
        let toml_string = toml::to_string_pretty(self).into_diagnostic()?;
        fs::write(path, toml_string).into_diagnostic()?;
        Ok(())
    }

    /// Load from a TOML File
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> miette::Result<Self> {
        let file_content = fs::read_to_string(path).into_diagnostic()?;
        let params: Self = toml::from_str(&file_content).into_diagnostic()?;
        Ok(params)
    }
}
