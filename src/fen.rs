//! FEN import and export.

use crate::castling::CastlingRights;
use crate::error::{EngineError, EngineResult};
use crate::position::Position;
use crate::square::Square;
use crate::types::{Color, PieceType};

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl Position {
    /// Sets up a position from a FEN string and computes the legal moves.
    ///
    /// Castling, en-passant and counter fields may be omitted; they default to
    /// `-`, `-`, `0` and `1`.
    pub fn from_fen(fen: &str) -> EngineResult<Self> {
        let invalid = |reason: &str| EngineError::InvalidFen(format!("{reason} in {fen:?}"));

        let mut parts = fen.split_whitespace();
        let board_part = parts.next().ok_or_else(|| invalid("missing board part"))?;
        let side_part = parts.next().ok_or_else(|| invalid("missing side to move"))?;
        let castling_part = parts.next().unwrap_or("-");
        let en_passant_part = parts.next().unwrap_or("-");
        let halfmove_part = parts.next().unwrap_or("0");
        let fullmove_part = parts.next().unwrap_or("1");

        let mut pos = Position::empty();

        // ===== Parse board squares =====
        let ranks: Vec<&str> = board_part.split('/').collect();
        if ranks.len() != 8 {
            return Err(invalid("expected 8 ranks"));
        }
        for (rank_idx, rank) in ranks.iter().enumerate() {
            let rank_num = 7 - rank_idx as u8; // FEN top rank = 7
            let mut file = 0u8;

            for ch in rank.chars() {
                if let Some(skip) = ch.to_digit(10) {
                    file = file.saturating_add(skip as u8);
                } else {
                    let (color, kind) =
                        PieceType::from_char(ch).ok_or_else(|| invalid("invalid piece letter"))?;
                    let sq = Square::from_file_rank(file, rank_num)
                        .ok_or_else(|| invalid("rank too long"))?;
                    pos.place(sq, color, kind).map_err(|e| invalid(&e.to_string()))?;
                    file += 1;
                }
            }
            if file != 8 {
                return Err(invalid("invalid rank length"));
            }
        }

        // ===== Parse side to move =====
        let turn = match side_part {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err(invalid("invalid side to move")),
        };

        // ===== Parse castling rights =====
        let mut castling = CastlingRights::NONE;
        for ch in castling_part.chars() {
            match ch {
                'K' => castling.white_short = true,
                'Q' => castling.white_long = true,
                'k' => castling.black_short = true,
                'q' => castling.black_long = true,
                '-' => {}
                _ => return Err(invalid("invalid castling")),
            }
        }

        // ===== Parse en passant square =====
        let en_passant = match en_passant_part {
            "-" => None,
            name => Some(name.parse::<Square>().map_err(|_| invalid("invalid en passant square"))?),
        };

        let half_move = halfmove_part.parse().map_err(|_| invalid("invalid half-move clock"))?;
        let full_move = fullmove_part.parse().map_err(|_| invalid("invalid full-move counter"))?;

        pos.set_state(turn, castling, en_passant, half_move, full_move);
        pos.finish_setup()
    }

    /// Exports the position in Forsyth-Edwards Notation.
    pub fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(90);

        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                let piece = Square::from_file_rank(file, rank).and_then(|sq| self.piece_at(sq));
                match piece {
                    Some(piece) => {
                        if empty > 0 {
                            fen.push_str(&empty.to_string());
                            empty = 0;
                        }
                        fen.push(piece.to_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push_str(&empty.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push_str(if self.turn() == Color::White { " w " } else { " b " });

        let rights = self.castling();
        if rights.any() {
            for (set, ch) in [
                (rights.white_short, 'K'),
                (rights.white_long, 'Q'),
                (rights.black_short, 'k'),
                (rights.black_long, 'q'),
            ] {
                if set {
                    fen.push(ch);
                }
            }
        } else {
            fen.push('-');
        }

        match self.en_passant() {
            Some(sq) => fen.push_str(&format!(" {}", sq.to_string().to_lowercase())),
            None => fen.push_str(" -"),
        }

        let counters = self.counters();
        fen.push_str(&format!(" {} {}", counters.half_move, counters.full_move));
        fen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_position_matches_start_fen() {
        assert_eq!(Position::new().to_fen(), START_FEN);
        assert_eq!(Position::from_fen(START_FEN).unwrap().to_fen(), START_FEN);
    }

    #[test]
    fn reads_every_field() {
        let fen = "r3k2r/8/8/3pP3/8/8/8/R3K2R w Kq d6 3 17";
        let pos = Position::from_fen(fen).unwrap();
        assert_eq!(pos.turn(), Color::White);
        assert!(pos.castling().white_short && !pos.castling().white_long);
        assert!(!pos.castling().black_short && pos.castling().black_long);
        assert_eq!(pos.en_passant(), Some(Square::D6));
        assert_eq!(pos.counters().half_move, 3);
        assert_eq!(pos.counters().full_move, 17);
        assert_eq!(pos.to_fen(), fen);
    }

    #[test]
    fn no_rights_marker() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K3 b - - 0 40").unwrap();
        assert_eq!(pos.to_fen(), "4k3/8/8/8/8/8/8/4K3 b - - 0 40");
    }

    #[test]
    fn rejects_malformed_fen() {
        for fen in [
            "",
            "8/8/8/8/8/8/8/8",
            "4k3/8/8/8/8/8/8/4K3 x - - 0 1",
            "4k3/8/8/8/8/8/8/4K2 w - - 0 1",
            "4k3/8/8/8/8/8/4K3 w - - 0 1",
            "4k3/8/8/8/8/8/8/4K3 w X - 0 1",
            "4k3/8/8/8/8/8/8/4X3 w - - 0 1",
            "4k3/8/8/8/8/8/8/8 w - - 0 1",
        ] {
            assert!(
                matches!(
                    Position::from_fen(fen),
                    Err(EngineError::InvalidFen(_)) | Err(EngineError::InvalidPosition(_))
                ),
                "{fen}"
            );
        }
    }
}
