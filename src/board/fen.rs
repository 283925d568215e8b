use super::{Board, CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ, Color, Piece};
use crate::square::Square;
use std::error::Error;
use std::fmt;
use std::str::FromStr;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Everything that can go wrong while reading a FEN string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    MissingPlacement,
    BadPieceChar(char),
    BadRankCount(usize),
    BadRankLength { rank: u8, squares: u8 },
    BadColor(String),
    BadCastling(char),
    BadEnPassant(String),
    BadCounter(String),
    KingCount { color: Color, count: u32 },
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::MissingPlacement => write!(f, "missing piece placement field"),
            FenError::BadPieceChar(c) => write!(f, "bad piece character {:?}", c),
            FenError::BadRankCount(n) => write!(f, "expected 8 ranks, found {}", n),
            FenError::BadRankLength { rank, squares } => {
                write!(f, "rank {} covers {} squares, expected 8", rank + 1, squares)
            }
            FenError::BadColor(s) => write!(f, "bad active colour {:?}", s),
            FenError::BadCastling(c) => write!(f, "bad castling character {:?}", c),
            FenError::BadEnPassant(s) => write!(f, "bad en-passant square {:?}", s),
            FenError::BadCounter(s) => write!(f, "bad move counter {:?}", s),
            FenError::KingCount { color, count } => {
                write!(f, "{:?} has {} kings, expected 1", color, count)
            }
        }
    }
}

impl Error for FenError {}

fn piece_from_char(c: char) -> Option<(Color, Piece)> {
    let piece = match c.to_ascii_lowercase() {
        'p' => Piece::Pawn,
        'n' => Piece::Knight,
        'b' => Piece::Bishop,
        'r' => Piece::Rook,
        'q' => Piece::Queen,
        'k' => Piece::King,
        _ => return None,
    };
    let color = if c.is_ascii_uppercase() {
        Color::White
    } else {
        Color::Black
    };
    Some((color, piece))
}

impl Board {
    /// Parse a FEN string into a fresh position.
    ///
    /// The halfmove clock and fullmove number may each be `-` or
    /// absent; everything else is required, and each side must have
    /// exactly one king.
    pub fn from_fen(fen: &str) -> Result<Board, FenError> {
        let mut board = Board::empty();
        board.set_fen(fen)?;
        Ok(board)
    }

    /// Reset this board from a FEN string, rebuilding every derived
    /// field (occupancy, Zobrist) from scratch and clearing history.
    pub fn set_fen(&mut self, fen: &str) -> Result<(), FenError> {
        let mut fields = fen.split_whitespace();

        let placement = fields.next().ok_or(FenError::MissingPlacement)?;
        let color = fields.next().unwrap_or("w");
        let castling = fields.next().unwrap_or("-");
        let en_passant = fields.next().unwrap_or("-");
        let halfmove = fields.next().unwrap_or("-");
        let fullmove = fields.next().unwrap_or("-");

        // 1) placement, rank 8 down to rank 1
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::BadRankCount(ranks.len()));
        }

        let mut piece_bb = [[0u64; 6]; 2];
        for (row, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - row as u8;
            let mut file: u8 = 0;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10) {
                    if skip == 0 || skip > 8 {
                        return Err(FenError::BadPieceChar(c));
                    }
                    file += skip as u8;
                } else {
                    let (color, piece) =
                        piece_from_char(c).ok_or(FenError::BadPieceChar(c))?;
                    if file >= 8 {
                        return Err(FenError::BadRankLength {
                            rank,
                            squares: file + 1,
                        });
                    }
                    piece_bb[color as usize][piece as usize] |=
                        Square::from_file_rank(file, rank).bit();
                    file += 1;
                }
            }
            if file != 8 {
                return Err(FenError::BadRankLength { rank, squares: file });
            }
        }

        for color in [Color::White, Color::Black] {
            let count = piece_bb[color as usize][Piece::King as usize].count_ones();
            if count != 1 {
                return Err(FenError::KingCount { color, count });
            }
        }

        // 2) active colour
        let side_to_move = match color {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::BadColor(other.to_string())),
        };

        // 3) castling availability
        let mut rights = 0u8;
        if castling != "-" {
            for c in castling.chars() {
                rights |= match c {
                    'K' => CASTLE_WK,
                    'Q' => CASTLE_WQ,
                    'k' => CASTLE_BK,
                    'q' => CASTLE_BQ,
                    other => return Err(FenError::BadCastling(other)),
                };
            }
        }

        // 4) en-passant target
        let ep = if en_passant == "-" {
            None
        } else {
            Some(
                Square::from_str(en_passant)
                    .map_err(|_| FenError::BadEnPassant(en_passant.to_string()))?,
            )
        };

        // 5) clocks; `-` means unknown
        let halfmove_clock = if halfmove == "-" {
            0
        } else {
            halfmove
                .parse::<u32>()
                .map_err(|_| FenError::BadCounter(halfmove.to_string()))?
        };
        let fullmove_number = if fullmove == "-" {
            1
        } else {
            fullmove
                .parse::<u32>()
                .map_err(|_| FenError::BadCounter(fullmove.to_string()))?
        };

        self.piece_bb = piece_bb;
        self.side_to_move = side_to_move;
        self.castling_rights = rights;
        self.en_passant = ep;
        self.halfmove_clock = halfmove_clock;
        self.fullmove_number = fullmove_number.max(1);
        self.history.clear();
        self.rebuild_occupancy();
        self.refresh_zobrist();
        Ok(())
    }

    /// Serialise the position as a FEN string.
    pub fn to_fen(&self) -> String {
        let mut out = String::with_capacity(80);

        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                let sq = Square::from_file_rank(file, rank);
                match self.piece_at(sq) {
                    Some((color, piece)) => {
                        if empty > 0 {
                            out.push((b'0' + empty) as char);
                            empty = 0;
                        }
                        out.push(piece.to_char(color));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push((b'0' + empty) as char);
            }
            if rank > 0 {
                out.push('/');
            }
        }

        out.push(' ');
        out.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        out.push(' ');
        if self.castling_rights == 0 {
            out.push('-');
        } else {
            if self.has_castling(CASTLE_WK) {
                out.push('K');
            }
            if self.has_castling(CASTLE_WQ) {
                out.push('Q');
            }
            if self.has_castling(CASTLE_BK) {
                out.push('k');
            }
            if self.has_castling(CASTLE_BQ) {
                out.push('q');
            }
        }

        out.push(' ');
        match self.en_passant {
            Some(sq) => out.push_str(&sq.to_string()),
            None => out.push('-'),
        }

        out.push_str(&format!(" {} {}", self.halfmove_clock, self.fullmove_number));
        out
    }
}
