use crate::board::{Board, Color, PIECES};

/// Static material evaluation in centipawns, from White's point of
/// view. Pure: never mutates the position.
pub fn evaluate(board: &Board) -> i32 {
    material(board, Color::White) - material(board, Color::Black)
}

fn material(board: &Board, color: Color) -> i32 {
    PIECES
        .into_iter()
        .map(|piece| board.bb(color, piece).count_ones() as i32 * piece.value())
        .sum()
}
