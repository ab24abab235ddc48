//! Shape catalog - canonical matrices for the 7 piece kinds
//!
//! Each shape is a small square matrix of cell values with the kind's
//! color value baked into the occupied cells (I=1 .. Z=7). Rotation
//! works on whole matrices, so the I piece lives in a 4x4, J/L/S/T/Z
//! in a 3x3, and O in a 2x2.
//!
//! The canonical definitions are never handed out by reference: callers
//! always get their own copy, which they are free to rotate.

use crate::rng::SimpleRng;
use blockfall_types::{CellValue, PieceKind, EMPTY_CELL};

/// A piece shape: a square matrix of cell values in some orientation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    kind: PieceKind,
    cells: Vec<Vec<CellValue>>,
}

impl Shape {
    /// The canonical (spawn) orientation for a kind. Returns a fresh copy.
    pub fn canonical(kind: PieceKind) -> Self {
        let cells: Vec<Vec<CellValue>> = match kind {
            PieceKind::I => vec![
                vec![0, 1, 0, 0],
                vec![0, 1, 0, 0],
                vec![0, 1, 0, 0],
                vec![0, 1, 0, 0],
            ],
            PieceKind::J => vec![
                vec![0, 2, 0],
                vec![0, 2, 0],
                vec![2, 2, 0],
            ],
            PieceKind::L => vec![
                vec![0, 3, 0],
                vec![0, 3, 0],
                vec![0, 3, 3],
            ],
            PieceKind::O => vec![
                vec![4, 4],
                vec![4, 4],
            ],
            PieceKind::S => vec![
                vec![0, 5, 5],
                vec![5, 5, 0],
                vec![0, 0, 0],
            ],
            PieceKind::T => vec![
                vec![0, 0, 0],
                vec![6, 6, 6],
                vec![0, 6, 0],
            ],
            PieceKind::Z => vec![
                vec![7, 7, 0],
                vec![0, 7, 7],
                vec![0, 0, 0],
            ],
        };
        Self { kind, cells }
    }

    /// Draw a uniformly random kind and return its canonical shape.
    pub fn random(rng: &mut SimpleRng) -> Self {
        Self::canonical(rng.next_kind())
    }

    /// Build a shape from an existing matrix (used by rotation).
    pub(crate) fn from_cells(kind: PieceKind, cells: Vec<Vec<CellValue>>) -> Self {
        Self { kind, cells }
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Matrix width in cells. All catalog shapes are square.
    pub fn width(&self) -> usize {
        self.cells.first().map_or(0, |row| row.len())
    }

    /// Matrix height in cells.
    pub fn height(&self) -> usize {
        self.cells.len()
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.cells
    }

    /// Iterate the occupied cells as `(x, y, value)` matrix offsets.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, CellValue)> + '_ {
        self.cells.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|&(_, &v)| v != EMPTY_CELL)
                .map(move |(x, &v)| (x, y, v))
        })
    }
}
