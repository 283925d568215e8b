use indicatif::{ProgressBar, ProgressStyle};
use luft::board::Board;
use luft::logger::init_logging;
use luft::moves::movegen::{is_check, legal_moves};
use luft::moves::perft::perft;
use luft::moves::types::{Move, notate};
use luft::search::Searcher;
use std::io::{self, BufRead};
use std::time::Instant;

fn main() {
    init_logging("logs/luft.log", "luft=info");

    let mut board = Board::starting();

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l.trim().to_string(),
            Err(_) => break,
        };
        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts[0] {
            "position" => handle_position(&parts, &mut board),
            "moves" => {
                let moves = legal_moves(&board);
                let texts: Vec<String> = moves.iter().map(|m| notate(*m)).collect();
                println!("{} legal: {}", moves.len(), texts.join(" "));
            }
            "go" => handle_go(&parts, &mut board),
            "perft" => handle_perft(&parts, &mut board, false),
            "divide" => handle_perft(&parts, &mut board, true),
            "display" | "d" => {
                print!("{}", board.ascii());
                println!("fen: {}", board);
                if is_check(&board) {
                    println!("(side to move is in check)");
                }
            }
            "quit" | "exit" => break,
            other => println!("unknown command: {}", other),
        }
    }
}

fn handle_position(parts: &[&str], board: &mut Board) {
    if parts.len() < 2 {
        println!("usage: position startpos | position fen <fen> [moves <m1> ...]");
        return;
    }

    let mut new_board = if parts[1] == "startpos" {
        Board::starting()
    } else if parts[1] == "fen" {
        let fen_end = parts
            .iter()
            .position(|&p| p == "moves")
            .unwrap_or(parts.len());
        let fen = parts[2..fen_end].join(" ");
        match Board::from_fen(&fen) {
            Ok(b) => b,
            Err(err) => {
                println!("bad fen: {}", err);
                return;
            }
        }
    } else {
        println!("usage: position startpos | position fen <fen> [moves <m1> ...]");
        return;
    };

    if let Some(moves_idx) = parts.iter().position(|&p| p == "moves") {
        for text in &parts[moves_idx + 1..] {
            match find_move(&new_board, text) {
                Some(mv) => {
                    if let Err(err) = new_board.make(mv) {
                        println!("cannot play {}: {}", text, err);
                        return;
                    }
                }
                None => {
                    println!("illegal move: {}", text);
                    return;
                }
            }
        }
    }

    *board = new_board;
}

/// Match coordinate text ("e2e4", "e7e8q") against the legal moves, so
/// flags come out right without the caller spelling them.
fn find_move(board: &Board, text: &str) -> Option<Move> {
    legal_moves(board).into_iter().find(|m| notate(*m) == text)
}

fn handle_go(parts: &[&str], board: &mut Board) {
    let mut budget_ms: u64 = 1000;
    let mut quiescence = true;
    let mut i = 1;
    while i < parts.len() {
        match parts[i] {
            "movetime" if i + 1 < parts.len() => {
                budget_ms = parts[i + 1].parse().unwrap_or(1000);
                i += 2;
            }
            "noquiescence" => {
                quiescence = false;
                i += 1;
            }
            _ => i += 1,
        }
    }

    let mut searcher = Searcher::new(budget_ms, quiescence);
    let start = Instant::now();
    let best = searcher.best_move(board);
    let elapsed = start.elapsed();

    if best.is_null() {
        let outcome = if is_check(board) { "checkmate" } else { "stalemate" };
        println!("no legal moves ({})", outcome);
        return;
    }

    println!("bestmove {}", notate(best));
    println!(
        "eval {} nodes {} evals {} time {}ms",
        searcher.last_eval(),
        searcher.nodes,
        searcher.eval_count,
        elapsed.as_millis()
    );
}

fn handle_perft(parts: &[&str], board: &mut Board, divide: bool) {
    let depth: u32 = parts.get(1).and_then(|d| d.parse().ok()).unwrap_or(5);
    let start = Instant::now();

    if divide {
        let root_moves = legal_moves(board);
        let bar = ProgressBar::new(root_moves.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}")
                .expect("static progress template"),
        );

        let mut total = 0u64;
        for mv in root_moves {
            board.make(mv).expect("legal root move");
            let nodes = if depth <= 1 {
                1
            } else {
                perft(board, depth - 1)
            };
            board.unmake();
            bar.inc(1);
            bar.set_message(notate(mv));
            println!("{}: {}", notate(mv), nodes);
            total += nodes;
        }
        bar.finish_and_clear();
        let secs = start.elapsed().as_secs_f64().max(1e-9);
        println!("total {} ({:.3}s)", total, secs);
    } else {
        let nodes = perft(board, depth);
        let secs = start.elapsed().as_secs_f64().max(1e-9);
        println!(
            "perft({}) = {} ({:.3}s, {:.0} nps)",
            depth,
            nodes,
            secs,
            nodes as f64 / secs
        );
    }
}
