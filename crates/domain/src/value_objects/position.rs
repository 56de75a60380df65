//! World-space position and knockback vectors.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A 2D world position (or displacement).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const ZERO: Position = Position { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Shift by a fixed offset.
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_moves_both_axes() {
        let p = Position::new(10.0, 20.0).offset(0.0, -5.0);
        assert_eq!(p, Position::new(10.0, 15.0));
    }

    #[test]
    fn subtraction_gives_displacement() {
        let d = Position::new(4.0, 1.0) - Position::new(1.0, 1.0);
        assert_eq!(d, Position::new(3.0, 0.0));
    }
}
