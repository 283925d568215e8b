//! Perft: deterministic leaf counting over the legal move tree, the
//! canonical move-generator test.

use crate::board::Board;
use crate::moves::movegen::legal_moves;
use crate::moves::types::Move;
use tracing::instrument;

fn perft_inner(board: &mut Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = legal_moves(board);
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for mv in moves {
        board
            .make(mv)
            .expect("legal generator produced an unplayable move");
        nodes += perft_inner(board, depth - 1);
        board.unmake();
    }
    nodes
}

/// Leaf count of the legal move tree to `depth`.
#[instrument(skip(board), fields(fen = %board.to_fen()))]
pub fn perft(board: &mut Board, depth: u32) -> u64 {
    perft_inner(board, depth)
}

/// Per-root-move node counts, plus their total.
pub fn perft_divide(board: &mut Board, depth: u32) -> (Vec<(Move, u64)>, u64) {
    let moves = legal_moves(board);
    let mut rows = Vec::with_capacity(moves.len());
    let mut total = 0;

    for mv in moves {
        board
            .make(mv)
            .expect("legal generator produced an unplayable move");
        let nodes = if depth <= 1 {
            1
        } else {
            perft_inner(board, depth - 1)
        };
        board.unmake();
        rows.push((mv, nodes));
        total += nodes;
    }
    (rows, total)
}
