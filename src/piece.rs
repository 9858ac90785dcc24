//! Pieces and their pseudo-legal move patterns.
//!
//! Candidate moves ignore whether the mover's own king ends up attacked; that is
//! settled by the legality filter in `position.rs`.

use crate::bitboard::Bitboard;
use crate::castling::{CastlePath, CastleSide};
use crate::grid::Direction::{self, Down, Left, Right, Up};
use crate::position::Position;
use crate::square::Square;
use crate::types::{Color, PieceType};

const ROOK_RAYS: [&[Direction]; 4] = [&[Up], &[Down], &[Left], &[Right]];
const BISHOP_RAYS: [&[Direction]; 4] = [&[Up, Left], &[Up, Right], &[Down, Left], &[Down, Right]];
const KING_STEPS: [&[Direction]; 8] =
    [&[Up], &[Down], &[Left], &[Right], &[Up, Left], &[Up, Right], &[Down, Left], &[Down, Right]];
#[rustfmt::skip]
const KNIGHT_STEPS: [&[Direction]; 8] = [
    &[Up, Up, Left], &[Up, Up, Right], &[Down, Down, Left], &[Down, Down, Right],
    &[Left, Left, Up], &[Left, Left, Down], &[Right, Right, Up], &[Right, Right, Down],
];

#[derive(Clone, Debug)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceType,
    /// Set once the piece has left its starting square.
    pub moved: bool,
    /// `None` once captured or promoted away.
    pub(crate) square: Option<Square>,
}

impl Piece {
    pub fn new(color: Color, kind: PieceType, square: Square) -> Self {
        Self { color, kind, moved: false, square: Some(square) }
    }

    #[inline(always)]
    pub fn square(&self) -> Option<Square> {
        self.square
    }

    #[inline(always)]
    pub fn is_in_game(&self) -> bool {
        self.square.is_some()
    }

    pub fn to_char(&self) -> char {
        self.kind.to_char(self.color)
    }

    /// Pseudo-legal destinations from the piece's current square.
    pub fn candidate_moves(&self, pos: &Position) -> Vec<Square> {
        let Some(from) = self.square else {
            return Vec::new();
        };
        let mut moves = Vec::new();
        match self.kind {
            PieceType::King => {
                self.steps(pos, from, &KING_STEPS, &mut moves);
                self.castling_targets(pos, from, &mut moves);
            }
            PieceType::Queen => {
                self.rays(pos, from, &ROOK_RAYS, &mut moves);
                self.rays(pos, from, &BISHOP_RAYS, &mut moves);
            }
            PieceType::Rook => self.rays(pos, from, &ROOK_RAYS, &mut moves),
            PieceType::Bishop => self.rays(pos, from, &BISHOP_RAYS, &mut moves),
            PieceType::Knight => self.steps(pos, from, &KNIGHT_STEPS, &mut moves),
            PieceType::Pawn => self.pawn_moves(pos, from, &mut moves),
        }
        moves
    }

    /// Squares this piece controls, used for check detection.
    ///
    /// Pawns control both forward diagonals whether or not anything stands there,
    /// and kings never control their castling squares.
    pub fn attacks(&self, pos: &Position) -> Bitboard {
        let Some(from) = self.square else {
            return Bitboard::EMPTY;
        };
        match self.kind {
            PieceType::Pawn => {
                let forward = forward(self.color);
                [Left, Right]
                    .into_iter()
                    .filter_map(|side| pos.grid().walk(from, &[forward, side]))
                    .collect()
            }
            PieceType::King => {
                KING_STEPS.iter().filter_map(|path| pos.grid().walk(from, path)).collect()
            }
            _ => self.candidate_moves(pos).into_iter().collect(),
        }
    }

    fn steps(&self, pos: &Position, from: Square, paths: &[&[Direction]], moves: &mut Vec<Square>) {
        for path in paths {
            if let Some(to) = pos.grid().walk(from, path) {
                if pos.color_at(to) != Some(self.color) {
                    moves.push(to);
                }
            }
        }
    }

    fn rays(&self, pos: &Position, from: Square, rays: &[&[Direction]], moves: &mut Vec<Square>) {
        for ray in rays {
            let mut current = from;
            while let Some(to) = pos.grid().walk(current, ray) {
                match pos.color_at(to) {
                    None => moves.push(to),
                    Some(color) => {
                        if color != self.color {
                            moves.push(to);
                        }
                        break;
                    }
                }
                current = to;
            }
        }
    }

    fn castling_targets(&self, pos: &Position, from: Square, moves: &mut Vec<Square>) {
        if self.moved {
            return;
        }
        for side in CastleSide::ALL {
            let path = CastlePath::of(self.color, side);
            if path.king_from == from && pos.castling().allows(self.color, side) {
                moves.push(path.king_to);
            }
        }
    }

    fn pawn_moves(&self, pos: &Position, from: Square, moves: &mut Vec<Square>) {
        let grid = pos.grid();
        let forward = forward(self.color);

        if let Some(one) = grid[from].neighbour(forward).filter(|&sq| pos.color_at(sq).is_none()) {
            moves.push(one);
            if from.rank() == self.color.pawn_rank() {
                let two = grid[one].neighbour(forward).filter(|&sq| pos.color_at(sq).is_none());
                if let Some(two) = two {
                    moves.push(two);
                }
            }
        }

        // The en-passant target sits right behind the enemy pawn's double step.
        let en_passant_rank = match self.color {
            Color::White => 5,
            Color::Black => 2,
        };
        for side in [Left, Right] {
            let Some(to) = grid.walk(from, &[forward, side]) else {
                continue;
            };
            let takes_piece = pos.color_at(to) == Some(!self.color);
            let takes_en_passant = pos.en_passant() == Some(to) && to.rank() == en_passant_rank;
            if takes_piece || takes_en_passant {
                moves.push(to);
            }
        }
    }
}

#[inline(always)]
pub(crate) fn forward(color: Color) -> Direction {
    match color {
        Color::White => Up,
        Color::Black => Down,
    }
}
