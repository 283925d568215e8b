//! End-to-end search scenarios: material advantages are recognised,
//! mates are found and preferred, and the searcher honours its budget
//! without ever withholding a legal move.

use luft::board::Board;
use luft::moves::movegen::legal_moves;
use luft::moves::types::notate;
use luft::search::{CHECKMATE_SCORE, Searcher};

#[test]
fn white_up_a_pawn_scores_at_least_a_pawn() {
    let mut board = Board::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").unwrap();
    let mut searcher = Searcher::new(100, true);
    let best = searcher.best_move(&mut board);

    assert!(!best.is_null());
    assert!(
        searcher.last_eval() >= 100,
        "expected at least +100, got {}",
        searcher.last_eval()
    );
}

#[test]
fn white_up_a_rook_scores_at_least_a_rook() {
    let mut board = Board::from_fen("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1").unwrap();
    let mut searcher = Searcher::new(100, true);
    let best = searcher.best_move(&mut board);

    assert!(!best.is_null());
    assert!(
        searcher.last_eval() >= 500,
        "expected at least +500, got {}",
        searcher.last_eval()
    );
}

#[test]
fn mate_in_one_is_found_and_scored_as_mate() {
    let mut board = Board::from_fen("6k1/5ppp/8/8/8/8/5PPP/4R1K1 w - - 0 1").unwrap();
    let mut searcher = Searcher::new(100, true);
    let best = searcher.best_move(&mut board);

    assert_eq!(notate(best), "e1e8", "the rook mates on e8");
    // winner-side mate scores sit just above -CHECKMATE_SCORE
    assert!(
        searcher.last_eval() >= -CHECKMATE_SCORE,
        "expected a mate score, got {}",
        searcher.last_eval()
    );
}

#[test]
fn mate_in_one_found_without_quiescence_too() {
    let mut board = Board::from_fen("6k1/5ppp/8/8/8/8/5PPP/4R1K1 w - - 0 1").unwrap();
    let mut searcher = Searcher::new(100, false);
    let best = searcher.best_move(&mut board);
    assert_eq!(notate(best), "e1e8");
}

#[test]
fn quiescence_resolves_a_losing_exchange() {
    // depth 1 without quiescence would happily grab the defended pawn;
    // the capture extension sees the recapture coming
    let mut board =
        Board::from_fen("4k3/5p2/4p3/8/8/8/4Q3/4K3 w - - 0 1").unwrap();
    let mut searcher = Searcher::new(100, true);
    let best = searcher.best_move(&mut board);
    assert_ne!(
        notate(best),
        "e2e6",
        "queen takes the defended pawn and is lost"
    );
}

#[test]
fn warm_table_reproduces_the_cold_result() {
    // a bare-kings position evaluates to zero at every depth, warm or cold
    let mut searcher = Searcher::new(50, true);
    let mut board = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    let first = searcher.best_move(&mut board);
    let first_eval = searcher.last_eval();

    let second = searcher.best_move(&mut board);
    let second_eval = searcher.last_eval();

    assert!(!first.is_null() && !second.is_null());
    assert_eq!(first_eval, 0);
    assert_eq!(second_eval, first_eval);
}

#[test]
fn warm_table_still_finds_the_mate() {
    let mut searcher = Searcher::new(100, true);

    let mut board = Board::from_fen("6k1/5ppp/8/8/8/8/5PPP/4R1K1 w - - 0 1").unwrap();
    let cold = searcher.best_move(&mut board);
    let cold_eval = searcher.last_eval();

    let warm = searcher.best_move(&mut board);
    let warm_eval = searcher.last_eval();

    assert_eq!(notate(cold), "e1e8");
    assert_eq!(notate(warm), "e1e8");
    assert!(cold_eval >= -CHECKMATE_SCORE && warm_eval >= -CHECKMATE_SCORE);

    // and a cleared table behaves like a fresh searcher
    searcher.clear_tt();
    let cleared = searcher.best_move(&mut board);
    assert_eq!(notate(cleared), "e1e8");
}

#[test]
fn zero_budget_never_returns_null_with_moves_available() {
    let mut board = Board::starting();
    let mut searcher = Searcher::new(0, true);
    let best = searcher.best_move(&mut board);

    assert!(!best.is_null());
    assert!(legal_moves(&Board::starting()).contains(&best));
}

#[test]
fn terminal_positions_return_null() {
    // stalemate
    let mut board = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    let mut searcher = Searcher::new(20, true);
    assert!(searcher.best_move(&mut board).is_null());

    // checkmate
    let mut board = Board::from_fen("4R1k1/5ppp/8/8/8/8/5PPP/6K1 b - - 0 1").unwrap();
    assert!(searcher.best_move(&mut board).is_null());
}

#[test]
fn searching_does_not_disturb_the_position() {
    let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3";
    let mut board = Board::from_fen(fen).unwrap();
    let before = board.clone();

    let mut searcher = Searcher::new(80, true);
    searcher.best_move(&mut board);

    assert_eq!(board, before);
    assert_eq!(board.to_fen(), fen);
}

#[test]
fn deeper_search_counts_more_nodes() {
    let mut board = Board::starting();

    let mut quick = Searcher::new(10, false);
    quick.best_move(&mut board);
    let quick_nodes = quick.nodes;

    let mut slow = Searcher::new(300, false);
    slow.best_move(&mut board);

    assert!(slow.nodes > quick_nodes);
    assert!(slow.eval_count > 0);
}
