//! Chessboard representation
//!
//! This module contains the `Position`: the square graph, both sides and the game
//! state flags, together with move application and legality filtering.
//!
//! There is no make/unmake stack. Whenever a move has to be tried without
//! touching the real game, the whole position is cloned and the copy is mutated.

use std::fmt;

use tracing::{debug, trace};

use crate::bitboard::Bitboard;
use crate::castling::{CastlePath, CastlingRights};
use crate::error::{EngineError, EngineResult};
use crate::grid::{Grid, PieceRef};
use crate::piece::Piece;
use crate::side::{MoveMap, Side};
use crate::square::Square;
use crate::state::{Counters, ExportedState, PositionDescriptor};
use crate::types::{Color, PieceType};

#[rustfmt::skip]
const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook, PieceType::Knight, PieceType::Bishop, PieceType::Queen,
    PieceType::King, PieceType::Bishop, PieceType::Knight, PieceType::Rook,
];

/// Chess position.
///
/// Pieces are owned by their `Side`; grid cells only hold `PieceRef`s into the
/// rosters, and the two views are kept in agreement by every mutation.
#[derive(Clone, Debug)]
pub struct Position {
    grid: Grid,
    sides: [Side; 2],
    turn: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,
    counters: Counters,
    finished: bool,
    checkmate: bool,
}

/// What a relocation did, needed for the half-move clock.
#[derive(Copy, Clone, Default)]
struct MoveEffects {
    captured: bool,
    pawn: bool,
}

impl Position {
    /// Standard starting position with White to move.
    pub fn new() -> Self {
        let mut pos = Self::empty();
        for (file, &kind) in BACK_RANK.iter().enumerate() {
            let file = file as u8;
            for color in Color::ALL {
                let home = Square::from_file_rank(file, color.home_rank());
                let pawn = Square::from_file_rank(file, color.pawn_rank());
                if let (Some(home), Some(pawn)) = (home, pawn) {
                    pos.put(color, kind, home);
                    pos.put(color, PieceType::Pawn, pawn);
                }
            }
        }
        pos.recalculate();
        pos
    }

    /// Board without pieces. Castling rights start granted, as they do for a descriptor.
    pub fn empty() -> Self {
        Self {
            grid: Grid::new(),
            sides: [Side::new(Color::White), Side::new(Color::Black)],
            turn: Color::White,
            castling: CastlingRights::default(),
            en_passant: None,
            counters: Counters::default(),
            finished: false,
            checkmate: false,
        }
    }

    /// Builds a position from a loader's descriptor and computes the legal moves.
    pub fn from_descriptor(descriptor: &PositionDescriptor) -> EngineResult<Self> {
        let mut pos = Self::empty();
        for (name, &code) in &descriptor.pieces {
            let square: Square = name.parse()?;
            let (color, kind) = PieceType::from_char(code).ok_or_else(|| {
                EngineError::InvalidPosition(format!("unknown piece code {code:?} at {square}"))
            })?;
            pos.place(square, color, kind)?;
        }
        if let Some(turn) = descriptor.turn {
            pos.turn = turn;
        }
        if let Some(overrides) = &descriptor.castling {
            overrides.apply(&mut pos.castling);
        }
        if let Some(counters) = &descriptor.counters {
            pos.counters.half_move = counters.half_move.unwrap_or(pos.counters.half_move);
            pos.counters.full_move = counters.full_move.unwrap_or(pos.counters.full_move);
        }
        pos.en_passant = descriptor.en_passant.as_deref().map(str::parse::<Square>).transpose()?;
        pos.finish_setup()
    }

    /// Checks the king invariant and computes legal moves for the side to move.
    pub(crate) fn finish_setup(mut self) -> EngineResult<Self> {
        for color in Color::ALL {
            if !self.sides[color].has_king() {
                return Err(EngineError::InvalidPosition(format!("{color} has no king")));
            }
        }
        self.recalculate();
        Ok(self)
    }

    /// Puts a new piece on an empty square.
    pub fn place(&mut self, square: Square, color: Color, kind: PieceType) -> EngineResult<()> {
        if self.grid.occupant(square).is_some() {
            return Err(EngineError::InvalidPosition(format!("{square} is already occupied")));
        }
        if kind == PieceType::King && self.sides[color].has_king() {
            return Err(EngineError::InvalidPosition(format!("{color} already has a king")));
        }
        self.put(color, kind, square);
        Ok(())
    }

    pub(crate) fn set_state(
        &mut self,
        turn: Color,
        castling: CastlingRights,
        en_passant: Option<Square>,
        half_move: u32,
        full_move: u32,
    ) {
        self.turn = turn;
        self.castling = castling;
        self.en_passant = en_passant;
        self.counters = Counters { half_move, full_move };
    }

    fn put(&mut self, color: Color, kind: PieceType, square: Square) {
        let index = self.sides[color].add(kind, square);
        self.grid[square].occupant = Some(PieceRef { color, index });
    }

    #[inline(always)]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline(always)]
    pub fn side(&self, color: Color) -> &Side {
        &self.sides[color]
    }

    #[inline(always)]
    pub fn turn(&self) -> Color {
        self.turn
    }

    #[inline(always)]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    /// Returns the en-passant capture square, if existing.
    #[inline(always)]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline(always)]
    pub fn counters(&self) -> Counters {
        self.counters
    }

    /// True when the side to move has no legal move (checkmate or stalemate).
    #[inline(always)]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[inline(always)]
    pub fn is_checkmate(&self) -> bool {
        self.checkmate
    }

    /// Legal moves of the side to move.
    pub fn legal_moves(&self) -> &MoveMap {
        self.sides[self.turn].moves()
    }

    pub fn piece_at(&self, sq: Square) -> Option<&Piece> {
        self.grid.occupant(sq).map(|r| self.sides[r.color].piece(r.index))
    }

    #[inline(always)]
    pub fn color_at(&self, sq: Square) -> Option<Color> {
        self.grid.occupant(sq).map(|r| r.color)
    }

    /// Squares controlled by `color`.
    pub fn attacked_squares(&self, color: Color) -> Bitboard {
        self.sides[color].attacking_squares(self)
    }

    /// Whether `color`'s king stands on a square the opponent controls.
    pub fn is_in_check(&self, color: Color) -> bool {
        self.sides[color]
            .king_square()
            .is_some_and(|king| self.attacked_squares(!color).contains(king))
    }

    /// Plays a move given by square names, after checking it against the legal-move index.
    pub fn make_move(&mut self, from: &str, to: &str) -> EngineResult<()> {
        let from: Square = from.parse()?;
        let to: Square = to.parse()?;
        if self.grid.occupant(from).is_none() {
            return Err(EngineError::EmptyOriginSquare(from));
        }
        if !self.legal_moves().get(&from).is_some_and(|targets| targets.contains(&to)) {
            return Err(EngineError::IllegalMove { from, to });
        }
        self.apply_move(from, to, true)?;
        debug!(
            %from,
            %to,
            turn = %self.turn,
            finished = self.finished,
            checkmate = self.checkmate,
            "move played"
        );
        Ok(())
    }

    /// Applies a move without checking it for legality.
    ///
    /// With `recalc` the counters advance and the legal moves and terminal flags
    /// are recomputed for the new side to move; without it the cached moves are stale.
    pub fn apply_move(&mut self, from: Square, to: Square, recalc: bool) -> EngineResult<()> {
        if self.grid.occupant(from).is_none() {
            return Err(EngineError::EmptyOriginSquare(from));
        }
        if from == to {
            return Err(EngineError::IllegalMove { from, to });
        }

        let effects = self.relocate(from, to);
        self.turn = !self.turn;

        if recalc {
            if self.turn == Color::White {
                self.counters.full_move += 1;
            }
            self.counters.half_move += 1;
            if effects.captured || effects.pawn {
                self.counters.half_move = 0;
            }
            self.recalculate();
        }
        Ok(())
    }

    /// Moves the occupant of `from` to `to` with every cascading rule except the turn flip.
    /// `from` must be occupied.
    fn relocate(&mut self, from: Square, to: Square) -> MoveEffects {
        let Some(mover) = self.grid.occupant(from) else {
            return MoveEffects::default();
        };
        let color = mover.color;
        let kind = self.sides[color].piece(mover.index).kind;
        let is_pawn = kind == PieceType::Pawn;

        let mut captured = self.take(to);
        let diagonal = from.file() != to.file();
        if is_pawn && captured.is_none() && diagonal && self.en_passant == Some(to) {
            if let Some(behind) = Square::from_file_rank(to.file(), from.rank()) {
                captured = self.take(behind);
            }
        }

        self.grid[from].occupant = None;
        self.grid[to].occupant = Some(mover);
        let piece = self.sides[color].piece_mut(mover.index);
        piece.square = Some(to);
        piece.moved = true;

        if is_pawn && to.rank() == color.promotion_rank() {
            self.sides[color].piece_mut(mover.index).square = None;
            let index = self.sides[color].add(PieceType::Queen, to);
            self.sides[color].piece_mut(index).moved = true;
            self.grid[to].occupant = Some(PieceRef { color, index });
        }

        self.en_passant = if is_pawn && from.rank().abs_diff(to.rank()) == 2 {
            Square::from_file_rank(from.file(), (from.rank() + to.rank()) / 2)
        } else {
            None
        };

        self.castling.revoke_for_square(from);
        if captured.is_some() {
            self.castling.revoke_for_square(to);
        }

        if kind == PieceType::King {
            if let Some(path) = CastlePath::for_king_move(color, from, to) {
                if self.grid.occupant(path.rook_from).is_some() {
                    self.relocate(path.rook_from, path.rook_to);
                }
            }
        }

        MoveEffects { captured: captured.is_some(), pawn: is_pawn }
    }

    /// Detaches whatever stands on `sq`. The piece stays in its roster without a square.
    fn take(&mut self, sq: Square) -> Option<PieceRef> {
        let taken = self.grid[sq].occupant.take()?;
        self.sides[taken.color].piece_mut(taken.index).square = None;
        Some(taken)
    }

    /// Recomputes the legal moves and terminal flags for the side to move.
    pub fn recalculate(&mut self) {
        let moves = self.calculate_moves(self.turn);
        self.finished = moves.is_empty();
        self.checkmate = self.finished && self.is_in_check(self.turn);
        trace!(turn = %self.turn, origins = moves.len(), finished = self.finished, "recalculated");
        self.sides[!self.turn].moves.clear();
        self.sides[self.turn].moves = moves;
    }

    /// Legal moves for `color`: every pseudo-legal move that does not leave its king attacked.
    pub fn calculate_moves(&self, color: Color) -> MoveMap {
        let in_check = self.is_in_check(color);
        let mut legal = MoveMap::new();

        for (from, targets) in self.sides[color].pseudo_moves(self) {
            let mut kept = Vec::with_capacity(targets.len());
            for to in targets {
                if let Some(path) = self.castle_path(color, from, to) {
                    if in_check || !self.castling_clear(color, path) {
                        continue;
                    }
                }
                let mut trial = self.clone();
                if trial.apply_move(from, to, false).is_err() {
                    continue;
                }
                let safe = trial.sides[color]
                    .king_square()
                    .is_some_and(|king| !trial.attacked_squares(!color).contains(king));
                if safe {
                    kept.push(to);
                }
            }
            if !kept.is_empty() {
                legal.insert(from, kept);
            }
        }
        legal
    }

    fn castle_path(&self, color: Color, from: Square, to: Square) -> Option<&'static CastlePath> {
        match self.piece_at(from) {
            Some(piece) if piece.kind == PieceType::King => {
                CastlePath::for_king_move(color, from, to)
            }
            _ => None,
        }
    }

    /// Rook at home and unmoved, nothing in between, transit square not attacked.
    fn castling_clear(&self, color: Color, path: &CastlePath) -> bool {
        let rook_ready = self
            .piece_at(path.rook_from)
            .is_some_and(|rook| rook.color == color && rook.kind == PieceType::Rook && !rook.moved);
        let occupied = self.sides[Color::White].occupancy() | self.sides[Color::Black].occupancy();
        rook_ready
            && path.between.iter().all(|&sq| !occupied.contains(sq))
            && !self.attacked_squares(!color).contains(path.transit)
    }

    /// State handed to external serializers and printers.
    pub fn export(&self) -> ExportedState {
        let pieces = self
            .sides
            .iter()
            .flat_map(Side::live_pieces)
            .filter_map(|piece| piece.square().map(|sq| (sq, piece.to_char())))
            .collect();
        ExportedState {
            pieces,
            turn: self.turn,
            moves: self.legal_moves().clone(),
            is_finished: self.finished,
            check_mate: self.checkmate,
            castling: self.castling,
            counters: self.counters,
            en_passant: self.en_passant,
        }
    }

    pub fn to_descriptor(&self) -> PositionDescriptor {
        PositionDescriptor::from(&self.export())
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

/// Plain-text board for debugging, rank 8 on top.
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Side to move: {}", self.turn)?;
        writeln!(f, "  +------------------------+")?;
        for rank in (0..8).rev() {
            write!(f, "{} |", rank + 1)?;
            for file in 0..8 {
                let ch = Square::from_file_rank(file, rank)
                    .and_then(|sq| self.piece_at(sq))
                    .map_or('.', Piece::to_char);
                write!(f, " {ch} ")?;
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "  +------------------------+")?;
        writeln!(f, "    a  b  c  d  e  f  g  h")
    }
}
