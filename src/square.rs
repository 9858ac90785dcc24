//! Square identities.
//!
//! A `Square` names one cell by file and rank; A1 = 0, H1 = 7, A8 = 56, H8 = 63.
//! Names are read case-insensitively ("e4" and "E4") and always printed upper case.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

#[repr(u8)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
#[rustfmt::skip]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8,
}

impl Square {
    #[rustfmt::skip]
    pub const ALL: [Square; 64] = [
        Square::A1, Square::B1, Square::C1, Square::D1, Square::E1, Square::F1, Square::G1, Square::H1,
        Square::A2, Square::B2, Square::C2, Square::D2, Square::E2, Square::F2, Square::G2, Square::H2,
        Square::A3, Square::B3, Square::C3, Square::D3, Square::E3, Square::F3, Square::G3, Square::H3,
        Square::A4, Square::B4, Square::C4, Square::D4, Square::E4, Square::F4, Square::G4, Square::H4,
        Square::A5, Square::B5, Square::C5, Square::D5, Square::E5, Square::F5, Square::G5, Square::H5,
        Square::A6, Square::B6, Square::C6, Square::D6, Square::E6, Square::F6, Square::G6, Square::H6,
        Square::A7, Square::B7, Square::C7, Square::D7, Square::E7, Square::F7, Square::G7, Square::H7,
        Square::A8, Square::B8, Square::C8, Square::D8, Square::E8, Square::F8, Square::G8, Square::H8,
    ];

    pub const fn new(index: u8) -> Self {
        debug_assert!(index < 64);
        Self::ALL[(index & 63) as usize]
    }

    /// Create a square from file and rank (0..8). Returns `None` if out of range.
    pub const fn from_file_rank(file: u8, rank: u8) -> Option<Square> {
        if file > 7 || rank > 7 { None } else { Some(Self::new(rank * 8 + file)) }
    }

    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the rank index of the square
    #[inline(always)]
    pub const fn rank(self) -> u8 {
        self as u8 >> 3 // Same as /8
    }

    /// Returns the file index of the square
    #[inline(always)]
    pub const fn file(self) -> u8 {
        self as u8 & 0b0000_0111 // Same as %8
    }

    /// Upper-case file letter, 'A'..='H'.
    pub const fn file_char(self) -> char {
        (b'A' + self.file()) as char
    }

    /// Rank digit, '1'..='8'.
    pub const fn rank_char(self) -> char {
        (b'1' + self.rank()) as char
    }
}

impl FromStr for Square {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidLocation(s.to_string());
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(invalid());
        }
        let file = bytes[0].to_ascii_uppercase().wrapping_sub(b'A');
        let rank = bytes[1].wrapping_sub(b'1');
        Square::from_file_rank(file, rank).ok_or_else(invalid)
    }
}

impl TryFrom<String> for Square {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Square> for String {
    fn from(square: Square) -> Self {
        square.to_string()
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}
