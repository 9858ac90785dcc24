//! Board graph.
//!
//! The 64 cells are stored flat, indexed by `Square`. Each cell links to its
//! orthogonal neighbours; links are wired once in `Grid::new` and never change.
//! Diagonal and knight steps are compositions of orthogonal hops.

use std::ops::{Index, IndexMut};

use crate::square::Square;
use crate::types::Color;

#[repr(u8)]
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Direction {
    Up = 0,
    Down,
    Left,
    Right,
}

/// Non-owning reference to a piece: its color and its slot in that side's roster.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct PieceRef {
    pub color: Color,
    pub index: usize,
}

#[derive(Copy, Clone, Debug)]
pub struct Cell {
    /// Background color of the cell, A1 is dark.
    pub shade: Color,
    pub occupant: Option<PieceRef>,
    neighbours: [Option<Square>; 4],
}

impl Cell {
    #[inline(always)]
    pub fn neighbour(&self, dir: Direction) -> Option<Square> {
        self.neighbours[dir as usize]
    }
}

#[derive(Clone, Debug)]
pub struct Grid {
    cells: [Cell; 64],
}

impl Grid {
    pub fn new() -> Self {
        let cells = Square::ALL.map(|square| {
            let (file, rank) = (square.file(), square.rank());
            let shade = if (file + rank) % 2 == 0 { Color::Black } else { Color::White };
            let mut neighbours = [None; 4];
            if rank < 7 {
                neighbours[Direction::Up as usize] = Square::from_file_rank(file, rank + 1);
            }
            if rank > 0 {
                neighbours[Direction::Down as usize] = Square::from_file_rank(file, rank - 1);
            }
            if file > 0 {
                neighbours[Direction::Left as usize] = Square::from_file_rank(file - 1, rank);
            }
            if file < 7 {
                neighbours[Direction::Right as usize] = Square::from_file_rank(file + 1, rank);
            }
            Cell { shade, occupant: None, neighbours }
        });
        Self { cells }
    }

    /// Follows a chain of neighbour links, `None` once a link leaves the board.
    pub fn walk(&self, from: Square, path: &[Direction]) -> Option<Square> {
        path.iter().try_fold(from, |sq, &dir| self[sq].neighbour(dir))
    }

    #[inline(always)]
    pub fn occupant(&self, sq: Square) -> Option<PieceRef> {
        self[sq].occupant
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<Square> for Grid {
    type Output = Cell;

    fn index(&self, index: Square) -> &Self::Output {
        &self.cells[index.index()]
    }
}

impl IndexMut<Square> for Grid {
    fn index_mut(&mut self, index: Square) -> &mut Self::Output {
        &mut self.cells[index.index()]
    }
}
