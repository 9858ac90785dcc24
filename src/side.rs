//! One color's roster of pieces.

use std::collections::BTreeMap;

use crate::bitboard::Bitboard;
use crate::piece::Piece;
use crate::position::Position;
use crate::square::Square;
use crate::types::{Color, PieceType};

/// Origin square → destination squares.
pub type MoveMap = BTreeMap<Square, Vec<Square>>;

#[derive(Clone, Debug)]
pub struct Side {
    pub color: Color,
    /// Creation order; captured pieces keep their slot.
    pieces: Vec<Piece>,
    king: Option<usize>,
    /// Legal moves, only meaningful for the side to move after a recalculation.
    pub(crate) moves: MoveMap,
}

impl Side {
    pub fn new(color: Color) -> Self {
        Self { color, pieces: Vec::with_capacity(16), king: None, moves: MoveMap::new() }
    }

    /// Adds a piece to the roster and returns its slot. Board placement is left to the caller.
    pub(crate) fn add(&mut self, kind: PieceType, square: Square) -> usize {
        let index = self.pieces.len();
        self.pieces.push(Piece::new(self.color, kind, square));
        if kind == PieceType::King {
            self.king = Some(index);
        }
        index
    }

    #[inline(always)]
    pub fn piece(&self, index: usize) -> &Piece {
        &self.pieces[index]
    }

    #[inline(always)]
    pub(crate) fn piece_mut(&mut self, index: usize) -> &mut Piece {
        &mut self.pieces[index]
    }

    pub fn live_pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter().filter(|p| p.is_in_game())
    }

    pub fn has_king(&self) -> bool {
        self.king.is_some()
    }

    /// Square of this side's king, `None` if it has been taken off the board.
    pub fn king_square(&self) -> Option<Square> {
        self.king.and_then(|index| self.pieces[index].square())
    }

    /// Cached legal moves from the last recalculation.
    pub fn moves(&self) -> &MoveMap {
        &self.moves
    }

    /// Union of every square a live piece controls.
    pub fn attacking_squares(&self, pos: &Position) -> Bitboard {
        let mut attacked = Bitboard::EMPTY;
        for piece in self.live_pieces() {
            attacked |= piece.attacks(pos);
        }
        attacked
    }

    /// Squares occupied by live pieces.
    pub fn occupancy(&self) -> Bitboard {
        self.live_pieces().filter_map(Piece::square).collect()
    }

    /// Pseudo-legal moves for every live piece.
    pub fn pseudo_moves(&self, pos: &Position) -> MoveMap {
        let mut moves = MoveMap::new();
        for piece in self.live_pieces() {
            let targets = piece.candidate_moves(pos);
            if let (Some(from), false) = (piece.square(), targets.is_empty()) {
                moves.insert(from, targets);
            }
        }
        moves
    }
}
