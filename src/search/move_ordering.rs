use crate::board::Position;

/// Moves every capture and promotion in front of the quiet moves with a
/// single swap pass. Order inside each group is not preserved. Returns the
/// number of tactical moves.
pub fn order_moves<P: Position>(pos: &P, moves: &mut [P::Move]) -> usize {
    let mut tactical = 0;
    for i in 0..moves.len() {
        let mv = moves[i];
        if pos.is_capture(mv) || pos.is_promotion(mv) {
            moves.swap(tactical, i);
            tactical += 1;
        }
    }
    tactical
}

/// Moves `first` to the front, shifting the moves before it back by one.
/// Returns false if `first` is not in the list.
pub fn promote_to_front<M: Copy + Eq>(moves: &mut [M], first: M) -> bool {
    match moves.iter().position(|&m| m == first) {
        Some(idx) => {
            moves[..=idx].rotate_right(1);
            true
        }
        None => false,
    }
}
