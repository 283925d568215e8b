//! Incremental make/unmake. Every `make` pushes one [`Undo`] snapshot;
//! `unmake` pops it and restores the position bit for bit, including
//! the Zobrist hash.

use super::{Board, CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ, Color, Piece};
use crate::hash::zobrist::{xor_castling_rights_delta, zobrist_keys};
use crate::moves::types::{FLAG_EN_PASSANT, FLAG_NONE, FLAG_PROMOTION, Move};
use crate::square::Square;
use std::error::Error;
use std::fmt;

/// Snapshot of the fields a move alone cannot reconstruct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Undo {
    pub mv: Move,
    pub captured: Option<Piece>,
    pub prev_en_passant: Option<Square>,
    pub prev_castling_rights: u8,
    pub prev_halfmove_clock: u32,
    pub prev_zobrist: u64,
}

/// `make` was handed a move whose from-square does not hold a piece of
/// the side to move. A programmer error; the position is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    EmptyFromSquare(Square),
    NotSideToMove(Square),
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::EmptyFromSquare(sq) => write!(f, "no piece on {}", sq),
            MoveError::NotSideToMove(sq) => {
                write!(f, "piece on {} does not belong to the side to move", sq)
            }
        }
    }
}

impl Error for MoveError {}

/// The castling right lost when a rook leaves (or is captured on) a
/// starting corner.
#[inline(always)]
fn castle_right_for_rook_square(color: Color, sq: Square) -> u8 {
    match (color, sq.index()) {
        (Color::White, 0) => CASTLE_WQ,  // a1
        (Color::White, 7) => CASTLE_WK,  // h1
        (Color::Black, 56) => CASTLE_BQ, // a8
        (Color::Black, 63) => CASTLE_BK, // h8
        _ => 0,
    }
}

/// Rook relocation for a castle, keyed by the king's destination.
#[inline(always)]
fn castle_rook_squares(king_to: Square) -> (Square, Square) {
    let to = king_to.index();
    if to % 8 == 6 {
        // king side: h-rook to f-file
        (Square::from_index(to + 1), Square::from_index(to - 1))
    } else {
        // queen side: a-rook to d-file
        (Square::from_index(to - 2), Square::from_index(to + 1))
    }
}

impl Board {
    /// Apply a move. The move must come from the legal generator (or
    /// otherwise be well formed); the only check performed is that the
    /// from-square holds a piece of the side to move.
    pub fn make(&mut self, mv: Move) -> Result<(), MoveError> {
        let color = self.side_to_move;
        let enemy = color.opposite();
        let from = mv.from();
        let to = mv.to();

        let piece = self.piece_on(color, from).ok_or_else(|| {
            if self.occ_all & from.bit() == 0 {
                MoveError::EmptyFromSquare(from)
            } else {
                MoveError::NotSideToMove(from)
            }
        })?;

        // find the captured piece before touching anything
        let (captured, capture_sq) = if mv.is_en_passant() {
            let behind = match color {
                Color::White => Square::from_index(to.index() - 8),
                Color::Black => Square::from_index(to.index() + 8),
            };
            (Some(Piece::Pawn), behind)
        } else {
            (self.piece_on(enemy, to), to)
        };

        self.history.push(Undo {
            mv,
            captured,
            prev_en_passant: self.en_passant,
            prev_castling_rights: self.castling_rights,
            prev_halfmove_clock: self.halfmove_clock,
            prev_zobrist: self.zobrist,
        });

        if let Some(victim) = captured {
            self.remove_piece(enemy, victim, capture_sq);
        }

        match mv.flag() {
            FLAG_NONE => {
                self.remove_piece(color, piece, from);
                self.place_piece(color, piece, to);
            }
            FLAG_EN_PASSANT => {
                self.remove_piece(color, Piece::Pawn, from);
                self.place_piece(color, Piece::Pawn, to);
            }
            FLAG_PROMOTION => {
                let promoted = mv.promoted_piece().unwrap_or(Piece::Queen);
                self.remove_piece(color, Piece::Pawn, from);
                self.place_piece(color, promoted, to);
            }
            _ => {
                // castle: king plus its rook
                self.remove_piece(color, Piece::King, from);
                self.place_piece(color, Piece::King, to);
                let (rook_from, rook_to) = castle_rook_squares(to);
                self.remove_piece(color, Piece::Rook, rook_from);
                self.place_piece(color, Piece::Rook, rook_to);
            }
        }

        // castling rights: king moves clear both, rook moves and rook
        // captures clear the matching side
        let old_rights = self.castling_rights;
        let mut clear = 0u8;
        if piece == Piece::King {
            clear |= match color {
                Color::White => CASTLE_WK | CASTLE_WQ,
                Color::Black => CASTLE_BK | CASTLE_BQ,
            };
        }
        if piece == Piece::Rook {
            clear |= castle_right_for_rook_square(color, from);
        }
        if captured == Some(Piece::Rook) {
            clear |= castle_right_for_rook_square(enemy, capture_sq);
        }
        let new_rights = old_rights & !clear;
        if new_rights != old_rights {
            self.castling_rights = new_rights;
            xor_castling_rights_delta(&mut self.zobrist, zobrist_keys(), old_rights, new_rights);
        }

        // en-passant target: always cleared, set again on a double push
        if let Some(ep) = self.en_passant.take() {
            self.zobrist ^= zobrist_keys().ep_file[ep.file() as usize];
        }
        if piece == Piece::Pawn && from.index().abs_diff(to.index()) == 16 {
            let ep = Square::from_index((from.index() + to.index()) / 2);
            self.en_passant = Some(ep);
            self.zobrist ^= zobrist_keys().ep_file[ep.file() as usize];
        }

        // clocks and side to move
        self.halfmove_clock = if piece == Piece::Pawn || captured.is_some() {
            0
        } else {
            self.halfmove_clock + 1
        };
        self.side_to_move = enemy;
        self.zobrist ^= zobrist_keys().side_to_move;
        if self.side_to_move == Color::White {
            self.fullmove_number += 1;
        }

        #[cfg(debug_assertions)]
        self.assert_hash();

        Ok(())
    }

    /// Undo the most recent `make`. A no-op on an empty history.
    pub fn unmake(&mut self) {
        let Some(undo) = self.history.pop() else {
            debug_assert!(false, "unmake with no history");
            return;
        };

        let color = self.side_to_move.opposite(); // the side that moved
        let mv = undo.mv;
        let from = mv.from();
        let to = mv.to();

        match mv.flag() {
            FLAG_NONE => {
                let piece = self
                    .piece_on(color, to)
                    .expect("moved piece missing during unmake");
                self.remove_piece(color, piece, to);
                self.place_piece(color, piece, from);
                if let Some(victim) = undo.captured {
                    self.place_piece(color.opposite(), victim, to);
                }
            }
            FLAG_EN_PASSANT => {
                self.remove_piece(color, Piece::Pawn, to);
                self.place_piece(color, Piece::Pawn, from);
                let behind = match color {
                    Color::White => Square::from_index(to.index() - 8),
                    Color::Black => Square::from_index(to.index() + 8),
                };
                self.place_piece(color.opposite(), Piece::Pawn, behind);
            }
            FLAG_PROMOTION => {
                let promoted = mv.promoted_piece().unwrap_or(Piece::Queen);
                self.remove_piece(color, promoted, to);
                self.place_piece(color, Piece::Pawn, from);
                if let Some(victim) = undo.captured {
                    self.place_piece(color.opposite(), victim, to);
                }
            }
            _ => {
                self.remove_piece(color, Piece::King, to);
                self.place_piece(color, Piece::King, from);
                let (rook_from, rook_to) = castle_rook_squares(to);
                self.remove_piece(color, Piece::Rook, rook_to);
                self.place_piece(color, Piece::Rook, rook_from);
            }
        }

        self.side_to_move = color;
        if color == Color::Black {
            self.fullmove_number -= 1;
        }
        self.en_passant = undo.prev_en_passant;
        self.castling_rights = undo.prev_castling_rights;
        self.halfmove_clock = undo.prev_halfmove_clock;
        // piece toggles XORed their keys; the snapshot is authoritative
        self.zobrist = undo.prev_zobrist;

        #[cfg(debug_assertions)]
        self.assert_hash();
    }
}
