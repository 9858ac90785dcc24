use std::fmt;
use std::ops::{Index, IndexMut, Not};

use serde::{Deserialize, Serialize};

#[repr(u8)]
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    /// Rank index (0..8) where this color's pawns start.
    #[inline(always)]
    pub const fn pawn_rank(self) -> u8 {
        match self {
            Self::White => 1,
            Self::Black => 6,
        }
    }

    /// Rank index (0..8) where this color's pawns promote.
    #[inline(always)]
    pub const fn promotion_rank(self) -> u8 {
        match self {
            Self::White => 7,
            Self::Black => 0,
        }
    }

    /// Rank index (0..8) of the back rank.
    #[inline(always)]
    pub const fn home_rank(self) -> u8 {
        match self {
            Self::White => 0,
            Self::Black => 7,
        }
    }
}

/// Allows for array indexing without explicit conversion of Color to usize.
/// Example: `sides[Color::White]`
impl<T> Index<Color> for [T] {
    type Output = T;
    fn index(&self, index: Color) -> &Self::Output {
        &self[index as usize]
    }
}

impl<T> IndexMut<Color> for [T] {
    fn index_mut(&mut self, index: Color) -> &mut Self::Output {
        &mut self[index as usize]
    }
}

impl Not for Color {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::White => write!(f, "white"),
            Self::Black => write!(f, "black"),
        }
    }
}

#[repr(u8)]
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum PieceType {
    Pawn = 0,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    /// Material value used by the evaluation, in pawns.
    #[inline(always)]
    pub const fn value(self) -> i32 {
        match self {
            Self::Pawn => 1,
            Self::Knight => 3,
            Self::Bishop => 3,
            Self::Rook => 5,
            Self::Queen => 9,
            Self::King => 10,
        }
    }

    /// Converts the piece type to its letter, upper case for White.
    #[rustfmt::skip]
    pub const fn to_char(self, color: Color) -> char {
        let ch = match self {
            Self::Pawn   => 'p',
            Self::Knight => 'n',
            Self::Bishop => 'b',
            Self::Rook   => 'r',
            Self::Queen  => 'q',
            Self::King   => 'k',
        };
        match color {
            Color::White => ch.to_ascii_uppercase(),
            Color::Black => ch,
        }
    }

    /// Reads a piece letter, returning its color and type.
    #[rustfmt::skip]
    pub const fn from_char(ch: char) -> Option<(Color, Self)> {
        let color = if ch.is_ascii_uppercase() { Color::White } else { Color::Black };
        let piece_type = match ch.to_ascii_lowercase() {
            'p' => Self::Pawn,
            'n' => Self::Knight,
            'b' => Self::Bishop,
            'r' => Self::Rook,
            'q' => Self::Queen,
            'k' => Self::King,
            _   => return None,
        };
        Some((color, piece_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piece_letters_carry_color() {
        assert_eq!(PieceType::Queen.to_char(Color::White), 'Q');
        assert_eq!(PieceType::Knight.to_char(Color::Black), 'n');
        assert_eq!(PieceType::from_char('K'), Some((Color::White, PieceType::King)));
        assert_eq!(PieceType::from_char('p'), Some((Color::Black, PieceType::Pawn)));
        assert_eq!(PieceType::from_char('x'), None);
    }

    #[test]
    fn color_indexes_pairs() {
        let mut pair = [1, 2];
        pair[Color::Black] += 10;
        assert_eq!(pair[Color::White], 1);
        assert_eq!(pair[!Color::White], 12);
    }
}
