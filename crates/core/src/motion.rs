//! Motion module - pure collision and rotation transforms
//!
//! [`collides`] is the single source of truth for placement legality;
//! every move, rotation, and spawn check routes through it. No other
//! code indexes the board with unchecked piece coordinates.

use crate::board::Board;
use crate::catalog::Shape;
use blockfall_types::{Pos, Spin, EMPTY_CELL};

/// True iff placing `shape` at `pos` is illegal: some occupied cell maps
/// sideways out of the board, at or below the bottom, or onto a filled
/// cell. Cells above the top row never collide.
pub fn collides(board: &Board, shape: &Shape, pos: Pos) -> bool {
    shape.occupied().any(|(dx, dy, _)| {
        let x = pos.x + dx as i32;
        let y = pos.y + dy as i32;
        match board.get(x, y) {
            None => true,
            Some(v) => v != EMPTY_CELL,
        }
    })
}

/// Rotate a shape matrix, returning a new shape.
///
/// Clockwise is a transpose followed by reversing each row;
/// counter-clockwise is a transpose followed by reversing the row
/// order. Defined for the square matrices the catalog produces.
pub fn rotated(shape: &Shape, spin: Spin) -> Shape {
    let n = shape.height();
    let src = shape.rows();

    // Transpose.
    let mut cells: Vec<Vec<_>> = (0..n)
        .map(|y| (0..n).map(|x| src[x][y]).collect())
        .collect();

    match spin {
        Spin::Cw => {
            for row in &mut cells {
                row.reverse();
            }
        }
        Spin::Ccw => cells.reverse(),
    }

    Shape::from_cells(shape.kind(), cells)
}
