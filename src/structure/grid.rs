//! 10×10 occupancy grid: placement, line detection, clears

use serde::{Deserialize, Serialize};

use crate::consts::{GRID_COLS, GRID_ROWS};

use super::piece::{Piece, Tint};

/// One grid cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub tint: Option<Tint>,
    /// Mid clear animation; stays occupied until the clear finishes
    pub clearing: bool,
}

impl Cell {
    pub fn occupied(&self) -> bool {
        self.tint.is_some()
    }
}

/// Completed rows and columns from one detection pass. A cell can sit in
/// both sets at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletedLines {
    pub rows: Vec<usize>,
    pub cols: Vec<usize>,
}

impl CompletedLines {
    pub fn total(&self) -> usize {
        self.rows.len() + self.cols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.cols.is_empty()
    }
}

/// Fixed 10×10 grid, row-major
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    cells: Vec<Cell>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    pub fn new() -> Self {
        Self {
            cells: vec![Cell::default(); GRID_ROWS * GRID_COLS],
        }
    }

    #[inline]
    fn idx(row: usize, col: usize) -> usize {
        row * GRID_COLS + col
    }

    /// Cell at (row, col), None when out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        if row < GRID_ROWS && col < GRID_COLS {
            Some(&self.cells[Self::idx(row, col)])
        } else {
            None
        }
    }

    /// Direct write for tests and puzzle setup
    pub fn set(&mut self, row: usize, col: usize, tint: Option<Tint>) {
        if row < GRID_ROWS && col < GRID_COLS {
            self.cells[Self::idx(row, col)] = Cell {
                tint,
                clearing: false,
            };
        }
    }

    /// True iff every filled cell of the piece, anchored at (row, col),
    /// lands in bounds on an unoccupied cell
    pub fn can_place(&self, piece: &Piece, row: usize, col: usize) -> bool {
        for (r, c) in piece.filled() {
            let (gr, gc) = (row + r, col + c);
            if gr >= GRID_ROWS || gc >= GRID_COLS {
                return false;
            }
            if self.cells[Self::idx(gr, gc)].occupied() {
                return false;
            }
        }
        true
    }

    /// Occupy the piece's cells. Caller checks `can_place` first; out of
    /// bounds or occupied cells are left untouched.
    pub fn place(&mut self, piece: &Piece, row: usize, col: usize) {
        for (r, c) in piece.filled() {
            let (gr, gc) = (row + r, col + c);
            if gr < GRID_ROWS && gc < GRID_COLS && !self.cells[Self::idx(gr, gc)].occupied() {
                self.cells[Self::idx(gr, gc)] = Cell {
                    tint: Some(piece.tint),
                    clearing: false,
                };
            }
        }
    }

    /// Independently detect fully occupied rows and columns
    pub fn completed_lines(&self) -> CompletedLines {
        let rows = (0..GRID_ROWS)
            .filter(|&r| (0..GRID_COLS).all(|c| self.cells[Self::idx(r, c)].occupied()))
            .collect();
        let cols = (0..GRID_COLS)
            .filter(|&c| (0..GRID_ROWS).all(|r| self.cells[Self::idx(r, c)].occupied()))
            .collect();
        CompletedLines { rows, cols }
    }

    /// Flag every cell of the given lines as clearing
    pub fn begin_clear(&mut self, lines: &CompletedLines) {
        for &r in &lines.rows {
            for c in 0..GRID_COLS {
                self.cells[Self::idx(r, c)].clearing = true;
            }
        }
        for &c in &lines.cols {
            for r in 0..GRID_ROWS {
                self.cells[Self::idx(r, c)].clearing = true;
            }
        }
    }

    /// Empty every clearing cell. No gravity; nothing shifts.
    pub fn finish_clear(&mut self) {
        for cell in &mut self.cells {
            if cell.clearing {
                *cell = Cell::default();
            }
        }
    }

    pub fn has_clearing(&self) -> bool {
        self.cells.iter().any(|c| c.clearing)
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.occupied()).count()
    }

    /// Occupied fraction in [0, 1]
    pub fn density(&self) -> f32 {
        self.occupied_count() as f32 / (GRID_ROWS * GRID_COLS) as f32
    }

    pub fn is_empty(&self) -> bool {
        self.occupied_count() == 0
    }
}
