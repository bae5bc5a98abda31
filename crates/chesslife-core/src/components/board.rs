//! The board - a fixed-size grid of addressable squares.

use serde::{Deserialize, Serialize};

/// One grid square, with the screen-space rectangle a renderer would draw
/// it into.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Square {
    pub x: i32,
    pub y: i32,
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// An N×N grid of squares, immutable after construction. Squares are stored
/// row-major: index = y * N + x.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    size: i32,
    squares: Vec<Square>,
}

impl Board {
    /// Build the full grid of `size * size` squares, precomputing each
    /// square's screen rectangle from `square_size`.
    pub fn create(size: i32, square_size: f32) -> Self {
        let side = size.max(0);
        let mut squares = Vec::with_capacity((side * side) as usize);
        for y in 0..side {
            for x in 0..side {
                squares.push(Square {
                    x,
                    y,
                    left: x as f32 * square_size,
                    top: y as f32 * square_size,
                    width: square_size,
                    height: square_size,
                });
            }
        }
        Self { size: side, squares }
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    /// The square at (x, y), or `None` when either coordinate is off the
    /// grid. Negative coordinates are rejected outright rather than folded
    /// into a neighboring row by the row-major index.
    pub fn square(&self, x: i32, y: i32) -> Option<&Square> {
        if x < 0 || y < 0 || x >= self.size || y >= self.size {
            return None;
        }
        self.squares.get((y * self.size + x) as usize)
    }
}
