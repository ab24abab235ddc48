//! Board module - manages the game grid
//!
//! The board is a width x height grid of cell values; dimensions come
//! from the session config. Coordinates: (x, y) with x growing right
//! and y growing down. Rows above the visible top (y < 0) read as
//! empty so freshly spawned pieces may overhang the board edge.

use crate::catalog::Shape;
use blockfall_types::{CellValue, Pos, EMPTY_CELL};

/// The locked-cell grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    rows: Vec<Vec<CellValue>>,
}

impl Board {
    /// Create a new empty board.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rows: vec![vec![EMPTY_CELL; width]; height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Read the cell at (x, y).
    ///
    /// Returns `None` outside the hard bounds: sideways out of
    /// `[0, width)` or at/below the bottom. Coordinates above the top
    /// (`y < 0`) are in-bounds-empty, never an error.
    pub fn get(&self, x: i32, y: i32) -> Option<CellValue> {
        if x < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        if y < 0 {
            return Some(EMPTY_CELL);
        }
        Some(self.rows[y as usize][x as usize])
    }

    /// Set a cell, ignoring writes outside the visible grid.
    pub fn set(&mut self, x: i32, y: i32, value: CellValue) -> bool {
        if x < 0 || x >= self.width as i32 || y < 0 || y >= self.height as i32 {
            return false;
        }
        self.rows[y as usize][x as usize] = value;
        true
    }

    /// Write every occupied cell of `shape` into the grid at `pos`.
    ///
    /// Callers guarantee the placement was collision-checked; cells that
    /// still fall above the top are dropped silently.
    pub fn merge(&mut self, shape: &Shape, pos: Pos) {
        for (dx, dy, v) in shape.occupied() {
            self.set(pos.x + dx as i32, pos.y + dy as i32, v);
        }
    }

    /// Indices of completely filled rows, scanned bottom to top.
    pub fn full_rows(&self) -> Vec<usize> {
        (0..self.height)
            .rev()
            .filter(|&y| self.rows[y].iter().all(|&v| v != EMPTY_CELL))
            .collect()
    }

    /// Remove the given rows and insert empty rows at the top,
    /// preserving the height. Returns the number of rows removed.
    ///
    /// `rows` must be sorted bottom-to-top (as [`Board::full_rows`]
    /// returns them) so removals never shift a pending index.
    pub fn collapse_rows(&mut self, rows: &[usize]) -> usize {
        let mut removed = 0;
        for &y in rows {
            if y >= self.height {
                continue;
            }
            let mut row = self.rows.remove(y);
            row.fill(EMPTY_CELL);
            self.rows.insert(0, row);
            removed += 1;
        }
        removed
    }

    /// Paint whole rows with a value (the flash highlight).
    pub fn mark_rows(&mut self, rows: &[usize], value: CellValue) {
        for &y in rows {
            if y < self.height {
                self.rows[y].fill(value);
            }
        }
    }

    /// Reset every cell to empty.
    pub fn clear(&mut self) {
        for row in &mut self.rows {
            row.fill(EMPTY_CELL);
        }
    }
}
