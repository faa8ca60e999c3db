use super::accumulator::{EvalAccumulator, Term};
use crate::prelude::*;

/// Non-king material of `side`.
pub fn side_material<P: Position>(pos: &P, side: Side, params: &EvalParams) -> i32 {
    Piece::MATERIAL
        .iter()
        .map(|&piece| pos.piece_count(piece, side) as i32 * params.piece_value(piece))
        .sum()
}

/// Maps the non-king material of both sides onto `0..=256`. Anything at or
/// above `midgame_material` is a pure middlegame, anything at or below
/// `endgame_material` a pure endgame, linear in between.
pub fn game_phase<P: Position>(pos: &P, params: &EvalParams) -> Phase {
    let total: i32 = Side::SIDES
        .iter()
        .map(|&side| side_material(pos, side, params))
        .sum();

    let span = (params.midgame_material - params.endgame_material).max(1);
    let phase = (params.midgame_material - total) * ENDGAME_PHASE / span;
    Phase(phase.clamp(MIDGAME_PHASE, ENDGAME_PHASE))
}

pub(crate) fn eval_material<P: Position>(pos: &P, acc: &mut impl EvalAccumulator) {
    for side in Side::SIDES {
        let material = side_material(pos, side, acc.params());
        acc.add(Term::Material, Score::splat(material), side);
    }
}

/// Plain material count from the side to move's view. Used by the baseline
/// opponent and as a sanity reference in tests.
#[derive(Debug, Clone)]
pub struct MaterialEvaluator {
    name: String,
    params: EvalParams,
}

impl Default for MaterialEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialEvaluator {
    pub fn new() -> Self {
        Self {
            name: "Material".to_string(),
            params: EvalParams::default(),
        }
    }
}

impl Evaluator for MaterialEvaluator {
    fn evaluate<P: Position>(&self, pos: &P) -> i32 {
        let stm = pos.side_to_move();
        side_material(pos, stm, &self.params) - side_material(pos, !stm, &self.params)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_position_is_full_middlegame() {
        let board = Board::new();
        let params = EvalParams::default();
        assert_eq!(side_material(&board, Side::White, &params), 4000);
        assert_eq!(game_phase(&board, &params), Phase(MIDGAME_PHASE));
    }

    #[test]
    fn phase_ramps_with_material() {
        let params = EvalParams::default();
        // 1000 + 400, well below the endgame line
        let ending = Board::from_fen("4k3/pppp4/8/8/8/8/PPPPP3/R3K3 w - - 0 1").unwrap();
        assert_eq!(game_phase(&ending, &params), Phase(ENDGAME_PHASE));
        // Rook and five pawns each: 2000
        let rooks = Board::from_fen("r3k3/ppppp3/8/8/8/8/PPPPP3/R3K3 w - - 0 1").unwrap();
        assert_eq!(game_phase(&rooks, &params), Phase(ENDGAME_PHASE));

        // 2 * (900 + 500 + 500 + 800) = 5400 -> middlegame
        let heavy =
            Board::from_fen("r2qk2r/pppppppp/8/8/8/8/PPPPPPPP/R2QK2R w - - 0 1").unwrap();
        assert_eq!(game_phase(&heavy, &params), Phase(MIDGAME_PHASE));

        let mixed = Board::from_fen("3qk3/ppp5/8/8/8/8/PPP5/R2QK3 w - - 0 1").unwrap();
        // White 500 + 900 + 300 = 1700, Black 900 + 300 = 1200, total 2900
        assert_eq!(game_phase(&mixed, &params), Phase((3250 - 2900) * 256 / 1000));
    }

    #[test]
    fn material_evaluator_is_relative_to_side_to_move() {
        let eval = MaterialEvaluator::new();
        let white = Board::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        let black = Board::from_fen("4k3/8/8/8/8/8/8/R3K3 b - - 0 1").unwrap();
        assert_eq!(eval.evaluate(&white), 500);
        assert_eq!(eval.evaluate(&black), -500);
        assert_eq!(eval.evaluate(&Board::new()), 0);
    }
}
