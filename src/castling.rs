//! Castling rights and castling geometry.

use serde::{Deserialize, Serialize};

use crate::square::Square;
use crate::types::Color;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum CastleSide {
    /// Kingside, O-O
    Short,
    /// Queenside, O-O-O
    Long,
}

impl CastleSide {
    pub const ALL: [CastleSide; 2] = [CastleSide::Short, CastleSide::Long];
}

/// Squares involved in one castling move.
#[derive(Copy, Clone, Debug)]
pub struct CastlePath {
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
    /// Square the king crosses, it must not be attacked.
    pub transit: Square,
    /// Squares between king and rook, they must be empty.
    pub between: &'static [Square],
}

#[rustfmt::skip]
const PATHS: [[CastlePath; 2]; 2] = [
    [
        CastlePath { king_from: Square::E1, king_to: Square::G1, rook_from: Square::H1, rook_to: Square::F1, transit: Square::F1, between: &[Square::F1, Square::G1] },
        CastlePath { king_from: Square::E1, king_to: Square::C1, rook_from: Square::A1, rook_to: Square::D1, transit: Square::D1, between: &[Square::D1, Square::C1, Square::B1] },
    ],
    [
        CastlePath { king_from: Square::E8, king_to: Square::G8, rook_from: Square::H8, rook_to: Square::F8, transit: Square::F8, between: &[Square::F8, Square::G8] },
        CastlePath { king_from: Square::E8, king_to: Square::C8, rook_from: Square::A8, rook_to: Square::D8, transit: Square::D8, between: &[Square::D8, Square::C8, Square::B8] },
    ],
];

impl CastlePath {
    pub fn of(color: Color, side: CastleSide) -> &'static CastlePath {
        &PATHS[color as usize][side as usize]
    }

    /// Finds the castling move a king makes from `from` to `to`, if any.
    pub fn for_king_move(color: Color, from: Square, to: Square) -> Option<&'static CastlePath> {
        CastleSide::ALL
            .into_iter()
            .map(|side| Self::of(color, side))
            .find(|path| path.king_from == from && path.king_to == to)
    }
}

/// The four castling flags. They only ever go from `true` to `false`.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastlingRights {
    pub white_short: bool,
    pub white_long: bool,
    pub black_short: bool,
    pub black_long: bool,
}

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights {
        white_short: false,
        white_long: false,
        black_short: false,
        black_long: false,
    };

    pub fn allows(&self, color: Color, side: CastleSide) -> bool {
        match (color, side) {
            (Color::White, CastleSide::Short) => self.white_short,
            (Color::White, CastleSide::Long) => self.white_long,
            (Color::Black, CastleSide::Short) => self.black_short,
            (Color::Black, CastleSide::Long) => self.black_long,
        }
    }

    /// Clears the rights tied to a home square once a piece leaves it or is captured on it.
    pub fn revoke_for_square(&mut self, sq: Square) {
        match sq {
            Square::E1 => {
                self.white_short = false;
                self.white_long = false;
            }
            Square::E8 => {
                self.black_short = false;
                self.black_long = false;
            }
            Square::H1 => self.white_short = false,
            Square::A1 => self.white_long = false,
            Square::H8 => self.black_short = false,
            Square::A8 => self.black_long = false,
            _ => {}
        }
    }

    /// True when every right set here is also set in `other`.
    pub fn is_subset_of(&self, other: &CastlingRights) -> bool {
        (!self.white_short || other.white_short)
            && (!self.white_long || other.white_long)
            && (!self.black_short || other.black_short)
            && (!self.black_long || other.black_long)
    }

    pub fn any(&self) -> bool {
        self.white_short || self.white_long || self.black_short || self.black_long
    }
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self { white_short: true, white_long: true, black_short: true, black_long: true }
    }
}
