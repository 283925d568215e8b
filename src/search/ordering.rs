use crate::board::{Board, Piece};
use crate::moves::types::{Move, MoveList};
use crate::search::tt::TranspositionTable;

const HASH_MOVE_BONUS: i32 = 10_000;

/// A cheap priority estimate: MVV/LVA for captures, the promotion
/// piece's worth, and a large boost for the table's stored best move.
fn estimate(board: &Board, mv: Move, hash_move: Move) -> i32 {
    let mut value = 0;

    let them = board.side_to_move.opposite();
    if let Some(victim) = board.piece_on(them, mv.to()) {
        // attacker is always present: the move came from this position
        let attacker = board
            .piece_on(board.side_to_move, mv.from())
            .map_or(0, Piece::value);
        value += victim.value() - attacker / 10;
    }

    if let Some(promoted) = mv.promoted_piece() {
        value += promoted.value();
    }

    if mv == hash_move && !hash_move.is_null() {
        value += HASH_MOVE_BONUS;
    }

    value
}

/// Sort a move list best-first. The sort is stable, so moves of equal
/// priority keep their generation order.
pub fn order_moves(moves: &mut MoveList, board: &Board, tt: &TranspositionTable) {
    let hash_move = tt.hash_move(board.zobrist);
    moves.sort_by_cached_key(|&mv| -estimate(board, mv, hash_move));
}
